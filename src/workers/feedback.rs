//! Feedback Generation Agent：根据评估结论与学习者状态生成反馈

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::WorkerFailure;
use crate::llm::{ChatMessage, LlmClient};
use crate::session::{WorkerRole, FRUSTRATION_ALERT_THRESHOLD};
use crate::workers::parse::complete_report;
use crate::workers::types::schema_json;
use crate::workers::{FeedbackInput, FeedbackReport, Worker};

pub struct FeedbackAgent {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
}

impl FeedbackAgent {
    pub fn new(llm: Arc<dyn LlmClient>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    fn build_prompt(&self, input: &FeedbackInput) -> Vec<ChatMessage> {
        let system = format!(
            "You are the Feedback Generation Agent (FGA).\n\
             Task: Generate helpful, encouraging feedback. \
             If frustration is high (>{threshold}), be very supportive.\n\
             Provide a meta-evaluation of why this feedback will work.\n\n\
             Respond with a single JSON object matching this JSON schema:\n{schema}",
            threshold = FRUSTRATION_ALERT_THRESHOLD,
            schema = schema_json::<FeedbackReport>(),
        );
        let user = format!(
            "Assessment from LAA: \"{}\".\nLearner State: Mastery {}%, Frustration {}%.",
            input.assessment_summary,
            input.learner.mastery(),
            input.learner.frustration(),
        );
        vec![ChatMessage::system(system), ChatMessage::user(user)]
    }
}

#[async_trait]
impl Worker for FeedbackAgent {
    type Input = FeedbackInput;
    type Output = FeedbackReport;

    fn role(&self) -> WorkerRole {
        WorkerRole::Feedback
    }

    async fn run(&self, input: FeedbackInput) -> Result<FeedbackReport, WorkerFailure> {
        let messages = self.build_prompt(&input);
        complete_report(self.llm.as_ref(), self.role(), &messages, self.temperature).await
    }
}
