//! Worker trait 与三角色集合

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::WorkerFailure;
use crate::session::WorkerRole;
use crate::workers::{
    AssessmentInput, AssessmentReport, ContentInput, ContentReport, FeedbackInput, FeedbackReport,
};

/// 异步能力：给定角色输入，产出一个类型化结果或一个 WorkerFailure。
///
/// 每次调用最多一个结果，不产生部分或重复结果，也不直接修改共享状态。
#[async_trait]
pub trait Worker: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    fn role(&self) -> WorkerRole;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, WorkerFailure>;
}

pub type DynWorker<I, O> = Arc<dyn Worker<Input = I, Output = O>>;

/// Coordinator 运行时使用的三个 Worker
#[derive(Clone)]
pub struct WorkerSet {
    pub assessment: DynWorker<AssessmentInput, AssessmentReport>,
    pub feedback: DynWorker<FeedbackInput, FeedbackReport>,
    pub content: DynWorker<ContentInput, ContentReport>,
}

impl WorkerSet {
    pub fn new(
        assessment: impl Worker<Input = AssessmentInput, Output = AssessmentReport> + 'static,
        feedback: impl Worker<Input = FeedbackInput, Output = FeedbackReport> + 'static,
        content: impl Worker<Input = ContentInput, Output = ContentReport> + 'static,
    ) -> Self {
        Self {
            assessment: Arc::new(assessment),
            feedback: Arc::new(feedback),
            content: Arc::new(content),
        }
    }
}
