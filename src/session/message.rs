//! 对话消息与角色
//!
//! Message 一旦创建即不再修改，同时追加到完整记录（transcript）与有界历史。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 会话中的参与方：Coordinator、三个 Worker 与人类学习者
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    Coordinator,
    Assessment,
    Feedback,
    Content,
    Participant,
}

impl AgentRole {
    /// 展示用名称（日志与控制台）
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::Coordinator => "Meta-Orchestrator",
            AgentRole::Assessment => "Learner Assessment Agent",
            AgentRole::Feedback => "Feedback Generation Agent",
            AgentRole::Content => "Content Delivery Agent",
            AgentRole::Participant => "Learner",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 三个专职 Worker 的角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerRole {
    Assessment,
    Feedback,
    Content,
}

impl WorkerRole {
    pub fn agent(&self) -> AgentRole {
        AgentRole::from(*self)
    }
}

impl From<WorkerRole> for AgentRole {
    fn from(role: WorkerRole) -> Self {
        match role {
            WorkerRole::Assessment => AgentRole::Assessment,
            WorkerRole::Feedback => AgentRole::Feedback,
            WorkerRole::Content => AgentRole::Content,
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.agent().label())
    }
}

/// 单条消息；reflection 为 Worker 的自我反思文本，仅用于观测
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: AgentRole,
    pub body: String,
    /// 创建时间（Unix 毫秒）
    pub timestamp: i64,
    pub reflection: Option<String>,
}

impl Message {
    pub fn new(role: AgentRole, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            body: body.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            reflection: None,
        }
    }

    pub fn participant(body: impl Into<String>) -> Self {
        Self::new(AgentRole::Participant, body)
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::participant("hi");
        let b = Message::participant("hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.role, AgentRole::Participant);
        assert!(a.reflection.is_none());
    }

    #[test]
    fn test_worker_role_maps_to_agent_role() {
        assert_eq!(AgentRole::from(WorkerRole::Feedback), AgentRole::Feedback);
        assert_eq!(WorkerRole::Content.to_string(), "Content Delivery Agent");
    }
}
