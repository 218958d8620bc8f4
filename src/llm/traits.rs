//! LLM 客户端抽象
//!
//! 具体 Worker 建立在 LlmClient 之上；后端（Gemini / OpenAI 兼容 / Mock）都实现 complete。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 提示消息角色（与 Chat Completions API 一致）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 发往模型的单条提示消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

}

/// 单次请求的采样参数
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成，返回首条回复的文本
    async fn complete(&self, messages: &[ChatMessage], options: CompletionOptions) -> Result<String, String>;
}
