use arbiter_core::{ConversationTurn, ReferenceData};

use crate::PromptError;

/// Canonical text form of a conversation: one `role: content` line per turn,
/// in order.
pub fn format_history(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Canonical text form of reference data: a pretty-printed JSON object with
/// keys in sorted order.
pub fn format_reference_data(data: &ReferenceData) -> Result<String, PromptError> {
    serde_json::to_string_pretty(data).map_err(|e| PromptError::Serialization {
        name: "company_data".to_string(),
        reason: e.to_string(),
    })
}
