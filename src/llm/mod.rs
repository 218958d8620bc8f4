//! LLM 层：客户端抽象与实现（Gemini / OpenAI 兼容 / Mock）

pub mod gemini;
pub mod mock;
pub mod openai;
pub mod traits;

pub use gemini::{create_gemini_client, GEMINI_BASE_URL, GEMINI_FLASH};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use traits::{ChatMessage, ChatRole, CompletionOptions, LlmClient};
