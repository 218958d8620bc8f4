//! Worker 能力层：三个专职角色（评估 / 反馈 / 内容）共用一个泛型接口
//!
//! Coordinator 只依赖 Worker trait；具体实现基于 LlmClient，也可替换为静态查表或人工转发。

pub mod assessment;
pub mod content;
pub mod feedback;
pub mod parse;
pub mod timeout;
pub mod traits;
pub mod types;

pub use assessment::AssessmentAgent;
pub use content::ContentAgent;
pub use feedback::FeedbackAgent;
pub use parse::{extract_json, parse_report};
pub use timeout::TimeoutWorker;
pub use traits::{DynWorker, Worker, WorkerSet};
pub use types::{
    AssessmentInput, AssessmentReport, ContentInput, ContentReport, FeedbackInput, FeedbackReport,
    MAX_ABS_DELTA,
};
