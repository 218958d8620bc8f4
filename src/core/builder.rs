//! 会话构建器：统一的会话初始化逻辑
//!
//! 按配置选择 LLM 后端、组装三个 Worker（可选超时装饰），并启动运行时。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{load_config, AppConfig};
use crate::core::{spawn_session, Coordinator, SessionHandle};
use crate::llm::{create_gemini_client, LlmClient, MockLlmClient, OpenAiClient};
use crate::workers::{AssessmentAgent, ContentAgent, FeedbackAgent, TimeoutWorker, WorkerSet};

/// 按 provider 与环境中的 API Key 选择后端；缺少 Key 时回退到 Mock
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let has_gemini_key =
        std::env::var("GEMINI_API_KEY").is_ok() || std::env::var("GOOGLE_API_KEY").is_ok();
    let has_openai_key = std::env::var("OPENAI_API_KEY").is_ok();

    match provider.as_str() {
        "gemini" if has_gemini_key => {
            tracing::info!("Using Gemini LLM ({})", cfg.llm.model);
            Arc::new(create_gemini_client(Some(&cfg.llm.model)))
        }
        "openai" if has_openai_key => {
            tracing::info!("Using OpenAI LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                std::env::var("OPENAI_API_KEY").ok().as_deref(),
            ))
        }
        "mock" => {
            tracing::info!("Using Mock LLM");
            Arc::new(MockLlmClient)
        }
        other => {
            tracing::warn!(provider = other, "No API key set or provider unknown, using Mock LLM");
            Arc::new(MockLlmClient)
        }
    }
}

pub struct SessionBuilder {
    config: AppConfig,
    llm: Option<Arc<dyn LlmClient>>,
}

impl SessionBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config, llm: None }
    }

    /// 指定 LLM 客户端，跳过按配置选择
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn build_llm(&self) -> Arc<dyn LlmClient> {
        match &self.llm {
            Some(llm) => Arc::clone(llm),
            None => create_llm_from_config(&self.config),
        }
    }

    /// 三个 Worker 共享同一个 LLM 客户端；timeouts.request 为 0 时不加超时
    pub fn build_workers(&self, llm: Arc<dyn LlmClient>) -> WorkerSet {
        let temps = &self.config.llm.temperature;
        let assessment = AssessmentAgent::new(Arc::clone(&llm), temps.assessment)
            .with_context_messages(self.config.session.assessment_context_messages);
        let feedback = FeedbackAgent::new(Arc::clone(&llm), temps.feedback);
        let content = ContentAgent::new(llm, temps.content);

        match self.config.llm.timeouts.request {
            0 => WorkerSet::new(assessment, feedback, content),
            secs => {
                let limit = Duration::from_secs(secs);
                WorkerSet::new(
                    TimeoutWorker::new(assessment, limit),
                    TimeoutWorker::new(feedback, limit),
                    TimeoutWorker::new(content, limit),
                )
            }
        }
    }

    pub fn build_coordinator(&self) -> Coordinator {
        Coordinator::from_config(&self.config.session)
    }

    /// 组装并启动会话运行时（需在 tokio 运行时内调用）
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let llm = self.build_llm();
        let workers = self.build_workers(llm);
        let coordinator = self.build_coordinator();
        tracing::info!(topic = %self.config.session.topic, "Session created");
        spawn_session(coordinator, workers)
    }
}

/// 加载配置并启动会话；配置加载失败时使用默认值
pub fn create_session(config_path: Option<PathBuf>) -> (SessionHandle, JoinHandle<()>) {
    let cfg = load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    SessionBuilder::new(cfg).spawn()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemPhase;
    use crate::llm::{ChatMessage, CompletionOptions};

    fn mock_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "mock".to_string();
        cfg.session.topic = "Ownership".to_string();
        cfg
    }

    #[tokio::test]
    async fn test_mock_provider_selected_explicitly() {
        let llm = create_llm_from_config(&mock_config());
        let reply = llm
            .complete(
                &[
                    ChatMessage::system("You are the Content Delivery Agent (CDA)."),
                    ChatMessage::user("start"),
                ],
                CompletionOptions::default(),
            )
            .await
            .unwrap();
        assert!(reply.contains("\"rationale\""));
    }

    #[test]
    fn test_coordinator_uses_session_section() {
        let builder = SessionBuilder::new(mock_config());
        let coordinator = builder.build_coordinator();
        assert_eq!(coordinator.phase(), SystemPhase::Idle);
        assert_eq!(coordinator.learner().topic(), "Ownership");
        assert_eq!(coordinator.learner().mastery(), 10);
    }

    #[tokio::test]
    async fn test_spawned_session_delivers_first_content() {
        let (mut handle, _task) = SessionBuilder::new(mock_config())
            .with_llm(Arc::new(MockLlmClient))
            .spawn();
        handle.start().unwrap();
        let snap = handle
            .wait_until(|s| s.phase == SystemPhase::WaitingForParticipant)
            .await
            .unwrap();
        assert_eq!(snap.transcript.len(), 1);
    }
}
