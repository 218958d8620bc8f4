//! Content Delivery Agent：按主题与掌握度生成下一段课程内容或问题

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::WorkerFailure;
use crate::llm::{ChatMessage, LlmClient};
use crate::session::WorkerRole;
use crate::workers::parse::complete_report;
use crate::workers::types::schema_json;
use crate::workers::{ContentInput, ContentReport, Worker};

pub struct ContentAgent {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
}

impl ContentAgent {
    pub fn new(llm: Arc<dyn LlmClient>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    fn build_prompt(&self, input: &ContentInput) -> Vec<ChatMessage> {
        let system = format!(
            "You are the Content Delivery Agent (CDA).\n\
             Task: Generate the next short lesson segment or question.\n\
             - If mastery is low, make it simple.\n\
             - If mastery is high, make it challenging.\n\
             Provide a rationale for your choice.\n\n\
             Respond with a single JSON object matching this JSON schema:\n{schema}",
            schema = schema_json::<ContentReport>(),
        );
        let user = format!(
            "Topic: \"{}\".\nCurrent Mastery: {}%.\nRecent Feedback: \"{}\".",
            input.learner.topic(),
            input.learner.mastery(),
            input.context,
        );
        vec![ChatMessage::system(system), ChatMessage::user(user)]
    }
}

#[async_trait]
impl Worker for ContentAgent {
    type Input = ContentInput;
    type Output = ContentReport;

    fn role(&self) -> WorkerRole {
        WorkerRole::Content
    }

    async fn run(&self, input: ContentInput) -> Result<ContentReport, WorkerFailure> {
        let messages = self.build_prompt(&input);
        complete_report(self.llm.as_ref(), self.role(), &messages, self.temperature).await
    }
}
