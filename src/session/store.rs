//! 会话状态存储
//!
//! 两个修改入口：apply_assessment_delta（Worker 输出影响学习者模型的唯一途径）与 append_message。
//! 不发起任何网络或定时器活动。

use crate::session::{LearnerState, Message};

#[derive(Clone, Debug)]
pub struct SessionStore {
    learner: LearnerState,
    transcript: Vec<Message>,
}

impl SessionStore {
    pub fn new(learner: LearnerState) -> Self {
        Self {
            learner,
            transcript: Vec::new(),
        }
    }

    /// 叠加评估增量并 clamp 到 [0, 100]，返回更新后的学习者状态
    pub fn apply_assessment_delta(&mut self, mastery_delta: i32, frustration_delta: i32) -> &LearnerState {
        self.learner.apply_delta(mastery_delta, frustration_delta);
        &self.learner
    }

    /// 追加到完整记录与有界历史
    pub fn append_message(&mut self, message: Message) {
        self.learner.remember(message.clone());
        self.transcript.push(message);
    }

    pub fn learner(&self) -> &LearnerState {
        &self.learner
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SCORE_MAX, SCORE_MIN};

    fn store() -> SessionStore {
        SessionStore::new(LearnerState::new("Rust", 10, 0, 10))
    }

    #[test]
    fn test_mastery_saturates_at_upper_bound() {
        let mut store = SessionStore::new(LearnerState::new("Rust", 98, 0, 10));
        let learner = store.apply_assessment_delta(10, 0);
        assert_eq!(learner.mastery(), 100);
    }

    #[test]
    fn test_scores_stay_in_range_for_any_delta_sequence() {
        let mut store = store();
        // 线性同余序列，覆盖 [-10, 10] 内的各种增量组合
        let mut seed: u64 = 0x2545_f491;
        for _ in 0..5_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let dm = ((seed >> 33) % 21) as i32 - 10;
            let df = ((seed >> 17) % 21) as i32 - 10;
            let learner = store.apply_assessment_delta(dm, df);
            assert!((SCORE_MIN..=SCORE_MAX).contains(&learner.mastery()));
            assert!((SCORE_MIN..=SCORE_MAX).contains(&learner.frustration()));
        }
    }

    #[test]
    fn test_delta_does_not_touch_history_or_topic() {
        let mut store = store();
        store.append_message(Message::participant("a"));
        store.apply_assessment_delta(-10, 10);
        assert_eq!(store.learner().topic(), "Rust");
        assert_eq!(store.learner().history().len(), 1);
        assert_eq!(store.learner().mastery(), 0);
        assert_eq!(store.learner().frustration(), 10);
    }

    #[test]
    fn test_transcript_is_unbounded_history_is_not() {
        let mut store = store();
        for i in 0..13 {
            store.append_message(Message::participant(i.to_string()));
        }
        assert_eq!(store.transcript().len(), 13);
        assert_eq!(store.learner().history().len(), 10);
        assert_eq!(store.learner().history().messages()[0].body, "3");
        assert_eq!(store.learner().history().messages()[9].body, "12");
    }
}
