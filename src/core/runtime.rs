//! 会话运行时：Coordinator 的单一事件处理点
//!
//! 后台任务独占 Coordinator，依次消费两路事件：外部命令（Start / Submit / Shutdown）与 Worker 结果。
//! 每个 WorkerJob 在独立任务中执行，并且恰好回送一个 (Ticket, WorkerOutcome)。
//! 每处理完一个事件就把 SessionSnapshot 发布到 watch 通道，外部按需拉取。
//!
//! 快照整体克隆对话与日志，日志只增不减，长会话中每次发布的开销随之线性增长；
//! 被拒绝且未追加日志的事件不会触发发布。

use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::{
    Coordinator, SessionError, SessionSnapshot, SystemPhase, Ticket, WorkerFailure,
    WorkerFailureCause, WorkerJob, WorkerOutcome,
};
use crate::event_log::LogEntry;
use crate::session::{LearnerState, Message, WorkerRole};
use crate::workers::WorkerSet;

/// 从展示层发往 Coordinator 的命令
#[derive(Debug, Clone)]
pub enum Command {
    Start,
    /// 参与者输入
    Submit(String),
    /// 停止事件循环；在途的 Worker 结果将被丢弃
    Shutdown,
}

/// 展示层持有的控制面：发送命令、拉取快照
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// 已开始时为 no-op
    pub fn start(&self) -> Result<(), SessionError> {
        self.send(Command::Start)
    }

    /// 非 WaitingForParticipant 阶段时被忽略
    pub fn submit_participant_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::Submit(text.into()))
    }

    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.send(Command::Shutdown)
    }

    fn send(&self, cmd: Command) -> Result<(), SessionError> {
        self.cmd_tx.send(cmd).map_err(|_| SessionError::Closed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn phase(&self) -> SystemPhase {
        self.state_rx.borrow().phase
    }

    pub fn learner(&self) -> LearnerState {
        self.state_rx.borrow().learner.clone()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.state_rx.borrow().transcript.clone()
    }

    pub fn log(&self) -> Vec<LogEntry> {
        self.state_rx.borrow().log.clone()
    }

    /// 等待下一次快照更新
    pub async fn changed(&mut self) -> Result<(), SessionError> {
        self.state_rx.changed().await.map_err(|_| SessionError::Closed)
    }

    /// 等待直到快照满足条件，返回该快照
    pub async fn wait_until<F>(&mut self, mut pred: F) -> Result<SessionSnapshot, SessionError>
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        loop {
            {
                let snapshot = self.state_rx.borrow_and_update();
                if pred(&snapshot) {
                    return Ok(snapshot.clone());
                }
            }
            self.changed().await?;
        }
    }
}

/// 启动会话运行时：返回控制句柄与后台任务句柄
pub fn spawn_session(mut coordinator: Coordinator, workers: WorkerSet) -> (SessionHandle, JoinHandle<()>) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(coordinator.snapshot());
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<(Ticket, WorkerOutcome)>();

    let task = tokio::spawn(async move {
        loop {
            let step = tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Start) => coordinator.start(),
                    Some(Command::Submit(text)) => coordinator.submit_participant_input(&text),
                    Some(Command::Shutdown) | None => break,
                },
                Some((ticket, outcome)) = outcome_rx.recv() => coordinator.on_worker_outcome(ticket, outcome),
            };

            match step {
                Ok(job) => {
                    if let Some(job) = job {
                        dispatch(job, &workers, outcome_tx.clone());
                    }
                    let _ = state_tx.send(coordinator.snapshot());
                }
                Err(rejection) => {
                    tracing::debug!(%rejection, "coordinator rejected event");
                    // 过期结果会追加一条 DISCARD_STALE 日志
                    let log_len = coordinator.log().len();
                    state_tx.send_if_modified(|current| {
                        if current.log.len() == log_len {
                            return false;
                        }
                        *current = coordinator.snapshot();
                        true
                    });
                }
            }
        }
        tracing::info!("Session coordinator stopped");
    });

    (SessionHandle { cmd_tx, state_rx }, task)
}

/// 在独立任务中运行 Worker；Worker 任务 panic 时也回送一个失败结果
fn dispatch(job: WorkerJob, workers: &WorkerSet, outcome_tx: mpsc::UnboundedSender<(Ticket, WorkerOutcome)>) {
    let ticket = job.ticket();
    let workers = workers.clone();

    tokio::spawn(async move {
        let start = Instant::now();
        let run = tokio::spawn(async move {
            match job {
                WorkerJob::Assessment { input, .. } => WorkerOutcome::Assessment(workers.assessment.run(input).await),
                WorkerJob::Feedback { input, .. } => WorkerOutcome::Feedback(workers.feedback.run(input).await),
                WorkerJob::Content { input, .. } => WorkerOutcome::Content(workers.content.run(input).await),
            }
        });

        let outcome = match run.await {
            Ok(outcome) => outcome,
            Err(e) => panicked_outcome(ticket.role, e.to_string()),
        };

        let result = match &outcome {
            WorkerOutcome::Assessment(Err(f)) | WorkerOutcome::Feedback(Err(f)) | WorkerOutcome::Content(Err(f)) => {
                match f.cause {
                    WorkerFailureCause::Timeout(_) => "timeout",
                    _ => "error",
                }
            }
            _ => "ok",
        };
        let audit = serde_json::json!({
            "event": "worker_audit",
            "role": format!("{:?}", ticket.role),
            "seq": ticket.seq,
            "outcome": result,
            "duration_ms": start.elapsed().as_millis() as u64,
        });
        tracing::info!(audit = %audit, "worker");

        let _ = outcome_tx.send((ticket, outcome));
    });
}

fn panicked_outcome(role: WorkerRole, detail: String) -> WorkerOutcome {
    let failure = WorkerFailure::llm(role, format!("worker task aborted: {}", detail));
    match role {
        WorkerRole::Assessment => WorkerOutcome::Assessment(Err(failure)),
        WorkerRole::Feedback => WorkerOutcome::Feedback(Err(failure)),
        WorkerRole::Content => WorkerOutcome::Content(Err(failure)),
    }
}
