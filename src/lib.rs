//! Tutor - 多 Agent 辅导会话编排
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: Coordinator 状态机、运行时、错误与快照、会话构建
//! - **event_log**: 只追加的编排事件日志
//! - **llm**: LLM 客户端抽象与实现（Gemini / OpenAI 兼容 / Mock）
//! - **observability**: tracing 初始化
//! - **session**: 学习者状态、有界历史、对话记录
//! - **workers**: 评估 / 反馈 / 内容三个 Worker 及其 prompt 与解析

pub mod config;
pub mod core;
pub mod event_log;
pub mod llm;
pub mod observability;
pub mod session;
pub mod workers;
