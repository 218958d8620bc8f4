//! 错误分类
//!
//! - WorkerFailure：任一 Worker 失败（传输、超时、输出无法解析），不自动重试，会话回到 Idle
//! - Rejection：守卫不成立的调用或过期的 Worker 结果；本地吞掉，不作为故障向外传播
//! - SessionError：运行时句柄层面的错误（协调任务已退出）

use std::time::Duration;

use thiserror::Error;

use crate::core::SystemPhase;
use crate::session::WorkerRole;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerFailureCause {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Malformed output: {0}")]
    Malformed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{role} failed: {cause}")]
pub struct WorkerFailure {
    pub role: WorkerRole,
    pub cause: WorkerFailureCause,
}

impl WorkerFailure {
    pub fn llm(role: WorkerRole, msg: impl Into<String>) -> Self {
        Self {
            role,
            cause: WorkerFailureCause::Llm(msg.into()),
        }
    }

    pub fn malformed(role: WorkerRole, msg: impl Into<String>) -> Self {
        Self {
            role,
            cause: WorkerFailureCause::Malformed(msg.into()),
        }
    }

    pub fn timeout(role: WorkerRole, after: Duration) -> Self {
        Self {
            role,
            cause: WorkerFailureCause::Timeout(after),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    /// 外部事件到达时守卫不成立（如 Worker 运行中提交输入），静默忽略
    #[error("{event} ignored in phase {phase:?}")]
    InvalidTransitionAttempt { event: &'static str, phase: SystemPhase },

    /// Worker 结果到达时状态机已离开触发它的阶段
    #[error("stale {role} result discarded in phase {phase:?}")]
    StaleWorkerResult { role: WorkerRole, phase: SystemPhase },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session coordinator has stopped")]
    Closed,
}
