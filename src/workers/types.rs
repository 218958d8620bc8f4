//! 各角色的输入与结构化输出
//!
//! 输出类型派生 JsonSchema，schema 会拼进 system prompt，减少模型输出格式错误。

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::session::{LearnerState, Message};

/// 评估增量的绝对值上限
pub const MAX_ABS_DELTA: i32 = 10;

#[derive(Clone, Debug)]
pub struct AssessmentInput {
    pub participant_text: String,
    pub recent_history: Vec<Message>,
    pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    /// Detailed analysis of the learner's answer.
    pub analysis: String,
    /// Change in mastery score (-10 to +10).
    pub mastery_delta: i32,
    /// Change in frustration score (-10 to +10).
    pub frustration_delta: i32,
    /// Self-reflection: critique of the assessment accuracy.
    pub critique: String,
}

impl AssessmentReport {
    /// 把越界的增量收回到 [-10, 10]
    pub fn clamped(mut self) -> Self {
        self.mastery_delta = self.mastery_delta.clamp(-MAX_ABS_DELTA, MAX_ABS_DELTA);
        self.frustration_delta = self.frustration_delta.clamp(-MAX_ABS_DELTA, MAX_ABS_DELTA);
        self
    }
}

#[derive(Clone, Debug)]
pub struct FeedbackInput {
    pub assessment_summary: String,
    pub learner: LearnerState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    /// Constructive and motivational feedback for the learner.
    pub feedback: String,
    /// Self-reflection: predicted impact of this feedback.
    pub impact_prediction: String,
}

#[derive(Clone, Debug)]
pub struct ContentInput {
    pub learner: LearnerState,
    /// 选题依据：起始种子或最近一次反馈
    pub context: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    /// The educational content or question to present.
    pub content: String,
    /// Self-reflection: rationale for choosing this content based on state.
    pub rationale: String,
}

/// 输出类型的 JSON Schema 字符串，可拼入 system prompt
pub fn schema_json<T: JsonSchema>() -> String {
    let schema = schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_limits_deltas() {
        let report = AssessmentReport {
            analysis: String::new(),
            mastery_delta: 25,
            frustration_delta: -40,
            critique: String::new(),
        }
        .clamped();
        assert_eq!(report.mastery_delta, 10);
        assert_eq!(report.frustration_delta, -10);
    }

    #[test]
    fn test_schema_uses_wire_field_names() {
        let schema = schema_json::<AssessmentReport>();
        assert!(schema.contains("masteryDelta"));
        assert!(schema.contains("frustrationDelta"));
        assert!(schema.contains("-10 to +10"));
    }
}
