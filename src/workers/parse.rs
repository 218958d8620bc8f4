//! 结构化输出解析
//!
//! 模型可能在 JSON 外包裹 ```json 代码块或解释文字；先提取 JSON 块，再按目标类型反序列化。

use serde::de::DeserializeOwned;

use crate::core::WorkerFailure;
use crate::llm::{ChatMessage, CompletionOptions, LlmClient};
use crate::session::WorkerRole;

/// 提取 JSON 块（```json ... ``` 或首个 '{' 到最后一个 '}'）
pub fn extract_json(output: &str) -> Option<&str> {
    let trimmed = output.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        return Some(rest.find("```").map(|end| rest[..end].trim()).unwrap_or(rest.trim()));
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// 解析为目标类型；缺字段或不是 JSON 时返回 Malformed
pub fn parse_report<T: DeserializeOwned>(role: WorkerRole, output: &str) -> Result<T, WorkerFailure> {
    let json = extract_json(output)
        .ok_or_else(|| WorkerFailure::malformed(role, format!("no JSON object in: {}", preview(output))))?;
    serde_json::from_str(json).map_err(|e| WorkerFailure::malformed(role, format!("{}: {}", e, preview(json))))
}

/// 发送 prompt 并解析结构化结果
pub(crate) async fn complete_report<T: DeserializeOwned>(
    llm: &dyn LlmClient,
    role: WorkerRole,
    messages: &[ChatMessage],
    temperature: f32,
) -> Result<T, WorkerFailure> {
    let raw = llm
        .complete(messages, CompletionOptions::with_temperature(temperature))
        .await
        .map_err(|e| WorkerFailure::llm(role, e))?;
    parse_report(role, &raw)
}

fn preview(s: &str) -> String {
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s.to_string()
    }
}
