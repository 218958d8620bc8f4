//! 有界交互历史
//!
//! 保留最近 N 条消息（默认 10），超出容量时丢弃最旧的消息；供评估 Worker 拼上下文使用。

use serde::Serialize;

use crate::session::Message;

/// 历史默认容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Clone, Debug, Serialize)]
pub struct HistoryBuffer {
    messages: Vec<Message>,
    capacity: usize,
}

impl HistoryBuffer {
    /// 容量至少为 1
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
        self.prune();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn prune(&mut self) {
        if self.messages.len() > self.capacity {
            let excess = self.messages.len() - self.capacity;
            self.messages.drain(..excess);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_most_recent_in_order() {
        let mut history = HistoryBuffer::default();
        for i in 0..25 {
            history.push(Message::participant(format!("m{i}")));
            assert!(history.len() <= DEFAULT_HISTORY_CAPACITY);
        }
        let bodies: Vec<&str> = history.messages().iter().map(|m| m.body.as_str()).collect();
        let expected: Vec<String> = (15..25).map(|i| format!("m{i}")).collect();
        assert_eq!(bodies, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut history = HistoryBuffer::new(0);
        history.push(Message::participant("a"));
        history.push(Message::participant("b"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].body, "b");
    }
}
