//! 学习者模型
//!
//! mastery / frustration 始终处于 [0, 100]：每次修改都做 clamp，而不是拒绝修改。
//! topic 在会话期间不可变。

use serde::Serialize;

use crate::session::{HistoryBuffer, Message};

pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;
/// frustration 超过此值视为受挫
pub const FRUSTRATION_ALERT_THRESHOLD: i32 = 60;

/// 学习者当前状态标签
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Engagement {
    Engaged,
    Frustrated,
}

#[derive(Clone, Debug, Serialize)]
pub struct LearnerState {
    mastery: i32,
    frustration: i32,
    topic: String,
    history: HistoryBuffer,
}

impl LearnerState {
    pub fn new(topic: impl Into<String>, mastery: i32, frustration: i32, history_capacity: usize) -> Self {
        Self {
            mastery: clamp_score(mastery),
            frustration: clamp_score(frustration),
            topic: topic.into(),
            history: HistoryBuffer::new(history_capacity),
        }
    }

    pub fn mastery(&self) -> i32 {
        self.mastery
    }

    pub fn frustration(&self) -> i32 {
        self.frustration
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn engagement(&self) -> Engagement {
        if self.frustration > FRUSTRATION_ALERT_THRESHOLD {
            Engagement::Frustrated
        } else {
            Engagement::Engaged
        }
    }

    pub(crate) fn apply_delta(&mut self, mastery_delta: i32, frustration_delta: i32) {
        self.mastery = clamp_score(self.mastery.saturating_add(mastery_delta));
        self.frustration = clamp_score(self.frustration.saturating_add(frustration_delta));
    }

    pub(crate) fn remember(&mut self, msg: Message) {
        self.history.push(msg);
    }
}

fn clamp_score(value: i32) -> i32 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values_are_clamped() {
        let state = LearnerState::new("t", 140, -5, 10);
        assert_eq!(state.mastery(), 100);
        assert_eq!(state.frustration(), 0);
    }

    #[test]
    fn test_engagement_threshold() {
        let mut state = LearnerState::new("t", 10, 60, 10);
        assert_eq!(state.engagement(), Engagement::Engaged);
        state.apply_delta(0, 1);
        assert_eq!(state.engagement(), Engagement::Frustrated);
    }
}
