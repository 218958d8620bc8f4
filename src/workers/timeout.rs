//! 超时装饰：对任意 Worker 施加请求超时，超时转为 WorkerFailure（Timeout）
//!
//! 状态机不感知超时，只看到一次普通的失败。

use std::time::Duration;

use async_trait::async_trait;

use crate::core::WorkerFailure;
use crate::session::WorkerRole;
use crate::workers::Worker;

pub struct TimeoutWorker<W> {
    inner: W,
    timeout: Duration,
}

impl<W: Worker> TimeoutWorker<W> {
    pub fn new(inner: W, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<W: Worker> Worker for TimeoutWorker<W> {
    type Input = W::Input;
    type Output = W::Output;

    fn role(&self) -> WorkerRole {
        self.inner.role()
    }

    async fn run(&self, input: W::Input) -> Result<W::Output, WorkerFailure> {
        match tokio::time::timeout(self.timeout, self.inner.run(input)).await {
            Ok(result) => result,
            Err(_) => Err(WorkerFailure::timeout(self.role(), self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkerFailureCause;

    struct Sleepy(Duration);

    #[async_trait]
    impl Worker for Sleepy {
        type Input = ();
        type Output = &'static str;

        fn role(&self) -> WorkerRole {
            WorkerRole::Feedback
        }

        async fn run(&self, _input: ()) -> Result<&'static str, WorkerFailure> {
            tokio::time::sleep(self.0).await;
            Ok("done")
        }
    }

    #[tokio::test]
    async fn test_slow_worker_times_out() {
        let worker = TimeoutWorker::new(Sleepy(Duration::from_millis(500)), Duration::from_millis(20));
        let err = worker.run(()).await.unwrap_err();
        assert_eq!(err.role, WorkerRole::Feedback);
        assert!(matches!(err.cause, WorkerFailureCause::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fast_worker_passes_through() {
        let worker = TimeoutWorker::new(Sleepy(Duration::from_millis(1)), Duration::from_secs(5));
        assert_eq!(worker.run(()).await.unwrap(), "done");
    }
}
