//! Learner Assessment Agent：判断学习者回答并估计 mastery / frustration 的变化

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::WorkerFailure;
use crate::llm::{ChatMessage, LlmClient};
use crate::session::WorkerRole;
use crate::workers::parse::complete_report;
use crate::workers::types::schema_json;
use crate::workers::{AssessmentInput, AssessmentReport, Worker};

/// prompt 中默认附带的最近历史条数
pub const DEFAULT_CONTEXT_MESSAGES: usize = 3;

pub struct AssessmentAgent {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
    context_messages: usize,
}

impl AssessmentAgent {
    pub fn new(llm: Arc<dyn LlmClient>, temperature: f32) -> Self {
        Self {
            llm,
            temperature,
            context_messages: DEFAULT_CONTEXT_MESSAGES,
        }
    }

    pub fn with_context_messages(mut self, n: usize) -> Self {
        self.context_messages = n;
        self
    }

    fn build_prompt(&self, input: &AssessmentInput) -> Vec<ChatMessage> {
        let start = input.recent_history.len().saturating_sub(self.context_messages);
        let history: Vec<serde_json::Value> = input.recent_history[start..]
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.label(), "content": m.body }))
            .collect();
        let history = serde_json::to_string(&history).unwrap_or_else(|_| "[]".to_string());

        let system = format!(
            "You are the Learner Assessment Agent (LAA).\n\
             Context: Topic is \"{topic}\".\n\
             Determine if the learner's answer is correct or incorrect.\n\
             Estimate changes to mastery and frustration, each between -10 and +10.\n\
             Provide a meta-critique of your own assessment logic.\n\n\
             Respond with a single JSON object matching this JSON schema:\n{schema}",
            topic = input.topic,
            schema = schema_json::<AssessmentReport>(),
        );
        let user = format!(
            "Analyze the learner's input: \"{}\"\nHistory: {}",
            input.participant_text, history
        );
        vec![ChatMessage::system(system), ChatMessage::user(user)]
    }
}

#[async_trait]
impl Worker for AssessmentAgent {
    type Input = AssessmentInput;
    type Output = AssessmentReport;

    fn role(&self) -> WorkerRole {
        WorkerRole::Assessment
    }

    async fn run(&self, input: AssessmentInput) -> Result<AssessmentReport, WorkerFailure> {
        let messages = self.build_prompt(&input);
        let report: AssessmentReport =
            complete_report(self.llm.as_ref(), self.role(), &messages, self.temperature).await?;
        Ok(report.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionOptions, MockLlmClient};
    use crate::session::Message;

    struct FixedLlm(&'static str);

    #[async_trait]
    impl LlmClient for FixedLlm {
        async fn complete(&self, _messages: &[ChatMessage], _options: CompletionOptions) -> Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    fn input(history: usize) -> AssessmentInput {
        AssessmentInput {
            participant_text: "42".to_string(),
            recent_history: (0..history).map(|i| Message::participant(format!("h{i}"))).collect(),
            topic: "Arithmetic".to_string(),
        }
    }

    #[test]
    fn test_prompt_includes_only_recent_history() {
        let agent = AssessmentAgent::new(Arc::new(MockLlmClient), 0.2);
        let prompt = agent.build_prompt(&input(6));
        assert!(prompt[0].content.contains("\"Arithmetic\""));
        assert!(prompt[1].content.contains("\"42\""));
        assert!(!prompt[1].content.contains("h2"));
        assert!(prompt[1].content.contains("h3"));
        assert!(prompt[1].content.contains("h5"));
    }

    #[tokio::test]
    async fn test_out_of_range_deltas_are_clamped() {
        let llm = FixedLlm(r#"{"analysis": "wow", "masteryDelta": 50, "frustrationDelta": -11, "critique": "c"}"#);
        let agent = AssessmentAgent::new(Arc::new(llm), 0.2);
        let report = agent.run(input(0)).await.unwrap();
        assert_eq!(report.mastery_delta, 10);
        assert_eq!(report.frustration_delta, -10);
    }

    #[tokio::test]
    async fn test_llm_error_becomes_worker_failure() {
        struct Down;
        #[async_trait]
        impl LlmClient for Down {
            async fn complete(&self, _: &[ChatMessage], _: CompletionOptions) -> Result<String, String> {
                Err("connection refused".to_string())
            }
        }
        let agent = AssessmentAgent::new(Arc::new(Down), 0.2);
        let err = agent.run(input(0)).await.unwrap_err();
        assert_eq!(err.role, WorkerRole::Assessment);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_runs_against_mock_client() {
        let agent = AssessmentAgent::new(Arc::new(MockLlmClient), 0.2);
        let report = agent.run(input(1)).await.unwrap();
        assert!(report.analysis.contains("42"));
    }
}
