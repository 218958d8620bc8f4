//! 编排阶段与只读快照
//!
//! SystemPhase 是编排状态的唯一判别量，只由 Coordinator 持有；外部通过 SessionSnapshot 拉取投影。

use serde::Serialize;

use crate::event_log::LogEntry;
use crate::session::{LearnerState, Message, WorkerRole};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default)]
pub enum SystemPhase {
    #[default]
    Idle,
    /// Assessment Worker 运行中
    Assessing,
    /// Feedback Worker 运行中
    GeneratingFeedback,
    /// Content Worker 运行中
    DeliveringContent,
    WaitingForParticipant,
}

impl SystemPhase {
    /// 该阶段对应正在运行的 Worker；Idle / WaitingForParticipant 没有
    pub fn worker_role(&self) -> Option<WorkerRole> {
        match self {
            SystemPhase::Assessing => Some(WorkerRole::Assessment),
            SystemPhase::GeneratingFeedback => Some(WorkerRole::Feedback),
            SystemPhase::DeliveringContent => Some(WorkerRole::Content),
            SystemPhase::Idle | SystemPhase::WaitingForParticipant => None,
        }
    }

    pub fn for_worker(role: WorkerRole) -> Self {
        match role {
            WorkerRole::Assessment => SystemPhase::Assessing,
            WorkerRole::Feedback => SystemPhase::GeneratingFeedback,
            WorkerRole::Content => SystemPhase::DeliveringContent,
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, SystemPhase::WaitingForParticipant)
    }
}

/// 会话快照：阶段、学习者状态、完整对话与事件日志
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub phase: SystemPhase,
    pub learner: LearnerState,
    pub transcript: Vec<Message>,
    pub log: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_role_mapping_round_trips() {
        for role in [WorkerRole::Assessment, WorkerRole::Feedback, WorkerRole::Content] {
            assert_eq!(SystemPhase::for_worker(role).worker_role(), Some(role));
        }
        assert_eq!(SystemPhase::Idle.worker_role(), None);
        assert!(SystemPhase::WaitingForParticipant.accepts_input());
        assert!(!SystemPhase::Assessing.accepts_input());
    }
}
