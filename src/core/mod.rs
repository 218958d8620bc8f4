//! 核心编排层：错误、阶段与快照、Coordinator 状态机、运行时、构建器

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod runtime;
pub mod state;

pub use builder::{create_llm_from_config, create_session, SessionBuilder};
pub use coordinator::{Coordinator, Step, Ticket, WorkerJob, WorkerOutcome};
pub use error::{Rejection, SessionError, WorkerFailure, WorkerFailureCause};
pub use runtime::{spawn_session, Command, SessionHandle};
pub use state::{SessionSnapshot, SystemPhase};
