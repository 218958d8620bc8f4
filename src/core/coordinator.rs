//! Coordinator：编排状态机
//!
//! 纯同步状态机：每处理一个事件最多返回一个待执行的 WorkerJob，由运行时在后台执行，
//! 结果再以 (Ticket, WorkerOutcome) 送回。阶段转换：
//!
//! ```text
//! Idle --start--> DeliveringContent --content ok--> WaitingForParticipant
//! WaitingForParticipant --submit--> Assessing --assessment ok--> GeneratingFeedback
//! GeneratingFeedback --feedback ok--> DeliveringContent
//! 任一 Worker 失败 --> Idle
//! ```
//!
//! 三个 pending 槽各由唯一一个转换写入、由唯一一次 Worker 触发取走。Feedback 的输入只在
//! 评估结果合并之后写入，因此 Feedback Worker 不可能先于评估运行。

use crate::config::SessionSection;
use crate::core::{Rejection, SessionSnapshot, SystemPhase, WorkerFailure};
use crate::event_log::{action, EventLog, LogEntry, LogTarget, Severity};
use crate::session::{AgentRole, LearnerState, Message, SessionStore, WorkerRole};
use crate::workers::{
    AssessmentInput, AssessmentReport, ContentInput, ContentReport, FeedbackInput, FeedbackReport,
};

/// INPUT 日志中参与者文本的预览长度
const INPUT_PREVIEW_CHARS: usize = 30;

/// 一次 Worker 派发的凭据；只有与在途凭据一致的结果才会被接受
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub seq: u64,
    pub role: WorkerRole,
}

/// 待执行的 Worker 调用
#[derive(Debug)]
pub enum WorkerJob {
    Assessment { ticket: Ticket, input: AssessmentInput },
    Feedback { ticket: Ticket, input: FeedbackInput },
    Content { ticket: Ticket, input: ContentInput },
}

impl WorkerJob {
    pub fn ticket(&self) -> Ticket {
        match self {
            WorkerJob::Assessment { ticket, .. }
            | WorkerJob::Feedback { ticket, .. }
            | WorkerJob::Content { ticket, .. } => *ticket,
        }
    }
}

/// Worker 的结果（成功或失败）
#[derive(Debug)]
pub enum WorkerOutcome {
    Assessment(Result<AssessmentReport, WorkerFailure>),
    Feedback(Result<FeedbackReport, WorkerFailure>),
    Content(Result<ContentReport, WorkerFailure>),
}

impl WorkerOutcome {
    pub fn role(&self) -> WorkerRole {
        match self {
            WorkerOutcome::Assessment(_) => WorkerRole::Assessment,
            WorkerOutcome::Feedback(_) => WorkerRole::Feedback,
            WorkerOutcome::Content(_) => WorkerRole::Content,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            WorkerOutcome::Assessment(r) => r.is_ok(),
            WorkerOutcome::Feedback(r) => r.is_ok(),
            WorkerOutcome::Content(r) => r.is_ok(),
        }
    }
}

/// 处理一个事件的结果：可能需要派发的 Worker，或被拒绝的原因
pub type Step = Result<Option<WorkerJob>, Rejection>;

/// 跨阶段传递数据的单槽缓冲
#[derive(Debug, Default)]
struct PendingRoutes {
    participant_text: Option<String>,
    assessment_summary: Option<String>,
    delivery_context: Option<String>,
}

impl PendingRoutes {
    fn clear(&mut self) {
        self.participant_text = None;
        self.assessment_summary = None;
        self.delivery_context = None;
    }
}

pub struct Coordinator {
    phase: SystemPhase,
    started: bool,
    store: SessionStore,
    log: EventLog,
    pending: PendingRoutes,
    in_flight: Option<Ticket>,
    next_seq: u64,
    seed_context: String,
}

impl Coordinator {
    pub fn new(learner: LearnerState, seed_context: impl Into<String>) -> Self {
        Self {
            phase: SystemPhase::Idle,
            started: false,
            store: SessionStore::new(learner),
            log: EventLog::new(),
            pending: PendingRoutes::default(),
            in_flight: None,
            next_seq: 0,
            seed_context: seed_context.into(),
        }
    }

    pub fn from_config(cfg: &SessionSection) -> Self {
        let learner = LearnerState::new(
            cfg.topic.clone(),
            cfg.initial_mastery,
            cfg.initial_frustration,
            cfg.history_capacity,
        );
        Self::new(learner, cfg.seed_context.clone())
    }

    pub fn phase(&self) -> SystemPhase {
        self.phase
    }

    pub fn learner(&self) -> &LearnerState {
        self.store.learner()
    }

    pub fn transcript(&self) -> &[Message] {
        self.store.transcript()
    }

    pub fn log(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// 当前在途的 Worker 调用（至多一个）
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            learner: self.store.learner().clone(),
            transcript: self.store.transcript().to_vec(),
            log: self.log.entries().to_vec(),
        }
    }

    /// 开始会话：每个会话只生效一次，之后的调用被忽略
    pub fn start(&mut self) -> Step {
        if self.started || self.phase != SystemPhase::Idle {
            return Err(self.reject("start"));
        }
        self.started = true;
        self.log.record(
            AgentRole::Coordinator,
            LogTarget::System,
            action::INIT,
            "System initializing. Starting orchestration loop.",
            Severity::Info,
        );

        self.pending.delivery_context = Some(self.seed_context.clone());
        self.log.record(
            AgentRole::Coordinator,
            AgentRole::Content,
            action::REQUEST_CONTENT,
            format!("Requesting content for topic: {}.", self.store.learner().topic()),
            Severity::Info,
        );
        Ok(self.enter(SystemPhase::DeliveringContent))
    }

    /// 参与者提交输入；只在 WaitingForParticipant 且文本非空时生效
    pub fn submit_participant_input(&mut self, text: &str) -> Step {
        if !self.phase.accepts_input() || text.trim().is_empty() {
            return Err(self.reject("submit_participant_input"));
        }

        self.store.append_message(Message::participant(text));
        let preview: String = text.chars().take(INPUT_PREVIEW_CHARS).collect();
        self.log.record(
            AgentRole::Participant,
            AgentRole::Coordinator,
            action::INPUT,
            format!("User submitted: \"{}...\"", preview),
            Severity::Info,
        );

        self.pending.participant_text = Some(text.to_string());
        self.log.record(
            AgentRole::Coordinator,
            AgentRole::Assessment,
            action::REQUEST_ASSESSMENT,
            "Routing user input for assessment.",
            Severity::Info,
        );
        Ok(self.enter(SystemPhase::Assessing))
    }

    /// 合并 Worker 结果；过期结果（凭据或阶段不匹配）被丢弃并记一条 info
    pub fn on_worker_outcome(&mut self, ticket: Ticket, outcome: WorkerOutcome) -> Step {
        let current = self.in_flight == Some(ticket)
            && outcome.role() == ticket.role
            && self.phase == SystemPhase::for_worker(ticket.role);
        if !current {
            self.log.record(
                AgentRole::Coordinator,
                LogTarget::System,
                action::DISCARD_STALE,
                format!("Late {} result discarded (phase: {:?}).", outcome.role(), self.phase),
                Severity::Info,
            );
            return Err(Rejection::StaleWorkerResult {
                role: outcome.role(),
                phase: self.phase,
            });
        }
        self.in_flight = None;

        match outcome {
            WorkerOutcome::Assessment(Ok(report)) => Ok(self.merge_assessment(report)),
            WorkerOutcome::Feedback(Ok(report)) => Ok(self.merge_feedback(report)),
            WorkerOutcome::Content(Ok(report)) => Ok(self.merge_content(report)),
            WorkerOutcome::Assessment(Err(failure))
            | WorkerOutcome::Feedback(Err(failure))
            | WorkerOutcome::Content(Err(failure)) => {
                self.fail(failure);
                Ok(None)
            }
        }
    }

    fn merge_assessment(&mut self, report: AssessmentReport) -> Option<WorkerJob> {
        self.log.record(
            AgentRole::Assessment,
            AgentRole::Coordinator,
            action::META_CRITIQUE,
            report.critique,
            Severity::Meta,
        );

        self.store
            .apply_assessment_delta(report.mastery_delta, report.frustration_delta);
        self.log.record(
            AgentRole::Coordinator,
            LogTarget::System,
            action::UPDATE_STATE,
            format!(
                "Updating learner model: Mastery {:+}, Frustration {:+}",
                report.mastery_delta, report.frustration_delta
            ),
            Severity::Info,
        );

        self.pending.assessment_summary = Some(report.analysis);
        self.log.record(
            AgentRole::Coordinator,
            AgentRole::Feedback,
            action::REQUEST_FEEDBACK,
            "Constraint check: assessment merged. Requesting feedback.",
            Severity::Info,
        );
        self.enter(SystemPhase::GeneratingFeedback)
    }

    fn merge_feedback(&mut self, report: FeedbackReport) -> Option<WorkerJob> {
        self.log.record(
            AgentRole::Feedback,
            AgentRole::Coordinator,
            action::META_IMPACT,
            report.impact_prediction.clone(),
            Severity::Meta,
        );
        self.store.append_message(
            Message::new(AgentRole::Feedback, report.feedback.clone())
                .with_reflection(report.impact_prediction),
        );

        self.pending.delivery_context = Some(report.feedback);
        self.log.record(
            AgentRole::Coordinator,
            AgentRole::Content,
            action::REQUEST_CONTENT,
            "Feedback delivered. Requesting next curriculum block.",
            Severity::Info,
        );
        self.enter(SystemPhase::DeliveringContent)
    }

    fn merge_content(&mut self, report: ContentReport) -> Option<WorkerJob> {
        self.log.record(
            AgentRole::Content,
            AgentRole::Coordinator,
            action::META_RATIONALE,
            report.rationale.clone(),
            Severity::Meta,
        );
        self.store.append_message(
            Message::new(AgentRole::Content, report.content).with_reflection(report.rationale),
        );
        self.log.record(
            AgentRole::Content,
            AgentRole::Participant,
            action::DELIVER,
            "Delivering educational content.",
            Severity::Success,
        );
        self.enter(SystemPhase::WaitingForParticipant)
    }

    /// 记录错误并回到 Idle；已合并的学习者状态与对话保留，pending 槽清空
    fn fail(&mut self, failure: WorkerFailure) {
        self.log.record(
            AgentRole::Coordinator,
            LogTarget::System,
            action::ERROR,
            format!("{}. Resetting to IDLE.", failure),
            Severity::Error,
        );
        self.pending.clear();
        self.phase = SystemPhase::Idle;
    }

    /// 进入阶段；若为 Worker 阶段，立即取走对应 pending 槽并生成一次调用
    fn enter(&mut self, phase: SystemPhase) -> Option<WorkerJob> {
        self.phase = phase;
        let role = phase.worker_role()?;
        let job = self.take_job(role);
        if job.is_none() {
            tracing::warn!(?phase, "entered worker phase without a pending route");
        }
        job
    }

    fn take_job(&mut self, role: WorkerRole) -> Option<WorkerJob> {
        debug_assert!(self.in_flight.is_none(), "a worker is already in flight");
        let ticket = Ticket {
            seq: self.next_seq,
            role,
        };
        let learner = self.store.learner();
        let job = match role {
            WorkerRole::Assessment => WorkerJob::Assessment {
                ticket,
                input: AssessmentInput {
                    participant_text: self.pending.participant_text.take()?,
                    recent_history: learner.history().messages().to_vec(),
                    topic: learner.topic().to_string(),
                },
            },
            WorkerRole::Feedback => WorkerJob::Feedback {
                ticket,
                input: FeedbackInput {
                    assessment_summary: self.pending.assessment_summary.take()?,
                    learner: learner.clone(),
                },
            },
            WorkerRole::Content => WorkerJob::Content {
                ticket,
                input: ContentInput {
                    learner: learner.clone(),
                    context: self.pending.delivery_context.take()?,
                },
            },
        };
        self.next_seq += 1;
        self.in_flight = Some(ticket);
        Some(job)
    }

    fn reject(&self, event: &'static str) -> Rejection {
        tracing::debug!(event, phase = ?self.phase, "event ignored");
        Rejection::InvalidTransitionAttempt {
            event,
            phase: self.phase,
        }
    }
}
