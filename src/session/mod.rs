//! 会话状态：学习者模型、有界历史与对话记录
//!
//! 只有 Coordinator 持有并修改 SessionStore；Worker 只会拿到状态的只读副本。

pub mod history;
pub mod learner;
pub mod message;
pub mod store;

pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use learner::{Engagement, LearnerState, FRUSTRATION_ALERT_THRESHOLD, SCORE_MAX, SCORE_MIN};
pub use message::{AgentRole, Message, WorkerRole};
pub use store::SessionStore;
