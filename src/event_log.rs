//! 事件日志：记录每一次路由决策与状态转换
//!
//! 只追加、不修改、不删除；仅用于观测与事后校验，不参与控制流。
//! 每条记录同时以结构化 tracing 事件输出。

use std::fmt;

use serde::Serialize;

use crate::session::AgentRole;

/// 动作标签
pub mod action {
    pub const INIT: &str = "INIT";
    pub const REQUEST_CONTENT: &str = "REQUEST_CONTENT";
    pub const INPUT: &str = "INPUT";
    pub const REQUEST_ASSESSMENT: &str = "REQUEST_ASSESSMENT";
    pub const UPDATE_STATE: &str = "UPDATE_STATE";
    pub const REQUEST_FEEDBACK: &str = "REQUEST_FEEDBACK";
    pub const DELIVER: &str = "DELIVER";
    pub const ERROR: &str = "ERROR";
    pub const DISCARD_STALE: &str = "DISCARD_STALE";
    pub const META_CRITIQUE: &str = "META_CRITIQUE";
    pub const META_IMPACT: &str = "META_IMPACT";
    pub const META_RATIONALE: &str = "META_RATIONALE";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Meta,
    Error,
    Success,
}

/// 日志目标：某个角色，或字面量 "System"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LogTarget {
    Role(AgentRole),
    System,
}

impl From<AgentRole> for LogTarget {
    fn from(role: AgentRole) -> Self {
        LogTarget::Role(role)
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTarget::Role(role) => write!(f, "{}", role),
            LogTarget::System => f.write_str("System"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub id: String,
    /// Unix 毫秒
    pub timestamp: i64,
    pub source: AgentRole,
    pub target: LogTarget,
    pub action: String,
    pub detail: String,
    pub severity: Severity,
}

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录；按调用顺序排列，永不失败
    pub fn record(
        &mut self,
        source: AgentRole,
        target: impl Into<LogTarget>,
        action: &str,
        detail: impl Into<String>,
        severity: Severity,
    ) {
        let entry = LogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            source,
            target: target.into(),
            action: action.to_string(),
            detail: detail.into(),
            severity,
        };
        trace_entry(&entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn trace_entry(entry: &LogEntry) {
    let from = entry.source.label();
    let to = entry.target.to_string();
    match entry.severity {
        Severity::Error => tracing::error!(from, to = %to, action = %entry.action, "{}", entry.detail),
        Severity::Meta => tracing::debug!(from, to = %to, action = %entry.action, "{}", entry.detail),
        Severity::Info | Severity::Success => {
            tracing::info!(from, to = %to, action = %entry.action, "{}", entry.detail)
        }
    }
}
