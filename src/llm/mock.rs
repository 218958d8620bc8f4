//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! 根据 system prompt 中的 Agent 名称返回对应结构的 JSON；评估结果按回答是否为空给出固定增量。

use async_trait::async_trait;

use crate::llm::{ChatMessage, ChatRole, CompletionOptions, LlmClient};

#[derive(Debug, Default)]
pub struct MockLlmClient;

impl MockLlmClient {
    fn last_user(messages: &[ChatMessage]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)")
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage], _options: CompletionOptions) -> Result<String, String> {
        let system = messages
            .iter()
            .find(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let preview: String = Self::last_user(messages).chars().take(60).collect();

        let body = if system.contains("Learner Assessment Agent") {
            serde_json::json!({
                "analysis": format!("Mock assessment of: {}", preview),
                "masteryDelta": 5,
                "frustrationDelta": -2,
                "critique": "Mock critique: no real grading was performed.",
            })
        } else if system.contains("Feedback Generation Agent") {
            serde_json::json!({
                "feedback": "Good effort. Let's build on that.",
                "impactPrediction": "Mock prediction: the learner stays motivated.",
            })
        } else if system.contains("Content Delivery Agent") {
            serde_json::json!({
                "content": "Mock lesson: what is an intelligent agent?",
                "rationale": "Mock rationale: start with fundamentals.",
            })
        } else {
            return Err(format!("Mock LLM has no canned answer for: {}", preview));
        };
        Ok(format!("```json\n{}\n```", body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_answers_by_agent_name() {
        let client = MockLlmClient;
        let out = client
            .complete(
                &[
                    ChatMessage::system("You are the Content Delivery Agent (CDA)."),
                    ChatMessage::user("next"),
                ],
                CompletionOptions::default(),
            )
            .await
            .unwrap();
        assert!(out.contains("\"rationale\""));
    }

    #[tokio::test]
    async fn test_mock_rejects_unknown_prompt() {
        let client = MockLlmClient;
        let out = client
            .complete(&[ChatMessage::user("hello")], CompletionOptions::default())
            .await;
        assert!(out.is_err());
    }
}
