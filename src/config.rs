//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `TUTOR__*` 覆盖（双下划线表示嵌套，如 `TUTOR__LLM__PROVIDER=mock`）。
//! API Key 不在配置中，由各客户端从环境变量读取。

use std::path::PathBuf;

use serde::Deserialize;

use crate::session::DEFAULT_HISTORY_CAPACITY;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionSection,
    pub llm: LlmSection,
}

/// [session] 段：主题、起始上下文与学习者初值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub topic: String,
    /// Start 时交给 Content Worker 的初始上下文
    pub seed_context: String,
    pub initial_mastery: i32,
    pub initial_frustration: i32,
    pub history_capacity: usize,
    /// 评估 prompt 中附带的最近历史条数
    pub assessment_context_messages: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            topic: "Grundlagen der künstlichen Intelligenz".to_string(),
            seed_context: "Beginner introduction".to_string(),
            initial_mastery: 10,
            initial_frustration: 0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            assessment_context_messages: 3,
        }
    }
}

/// [llm] 段：后端选择、超时与各角色采样温度
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：gemini / openai / mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeouts: LlmTimeoutsSection,
    pub temperature: TemperatureSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: crate::llm::GEMINI_FLASH.to_string(),
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
            temperature: TemperatureSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    /// 单次 Worker 请求超时（秒），0 表示不限
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemperatureSection {
    pub assessment: f32,
    pub feedback: f32,
    pub content: f32,
}

impl Default for TemperatureSection {
    fn default() -> Self {
        Self {
            assessment: 0.2,
            feedback: 0.7,
            content: 0.5,
        }
    }
}

/// 从 config 目录加载配置，环境变量 TUTOR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 TUTOR__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TUTOR")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_session() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.session.initial_mastery, 10);
        assert_eq!(cfg.session.initial_frustration, 0);
        assert_eq!(cfg.session.history_capacity, 10);
        assert_eq!(cfg.session.seed_context, "Beginner introduction");
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.timeouts.request, 60);
        assert!((cfg.llm.temperature.assessment - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[session]\ntopic = \"Ownership\"\n\n[llm]\nprovider = \"mock\"\n\n[llm.temperature]\nfeedback = 0.9"
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.session.topic, "Ownership");
        assert_eq!(cfg.session.seed_context, "Beginner introduction");
        assert_eq!(cfg.llm.provider, "mock");
        assert!((cfg.llm.temperature.feedback - 0.9).abs() < 1e-6);
        assert!((cfg.llm.temperature.content - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_env_overrides_nested_session_key() {
        // 其他测试不读取该键，可安全地在进程内设置
        std::env::set_var("TUTOR__SESSION__ASSESSMENT_CONTEXT_MESSAGES", "5");
        let cfg = load_config(None);
        std::env::remove_var("TUTOR__SESSION__ASSESSMENT_CONTEXT_MESSAGES");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.session.assessment_context_messages, 5);
        assert_eq!(cfg.session.history_capacity, 10);
    }
}
