use std::collections::HashMap;

use arbiter_core::ArbiterError;
use thiserror::Error;

/// Sentinel line that opens and closes every block of untrusted content.
pub const FENCE: &str = "************";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing variable: {0}")]
    MissingVariable(String),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("untrusted variable '{0}' referenced by a system template")]
    UntrustedInSystem(String),
    #[error("cannot serialize variable '{name}': {reason}")]
    Serialization { name: String, reason: String },
}

impl From<PromptError> for ArbiterError {
    fn from(err: PromptError) -> Self {
        ArbiterError::Template(err.to_string())
    }
}

/// A substitution value. Fenced values come from the caller and are wrapped
/// in `FENCE` lines when rendered; trusted values are inserted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Trusted(String),
    Fenced(String),
}

impl SlotValue {
    fn rendered(&self) -> String {
        match self {
            SlotValue::Trusted(text) => text.clone(),
            SlotValue::Fenced(text) => fence(text),
        }
    }
}

/// Wrap untrusted content between two sentinel lines. The content itself is
/// kept byte-for-byte.
pub fn fence(content: &str) -> String {
    format!("{FENCE}\n{content}\n{FENCE}")
}

/// Named substitution values for a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptValues {
    slots: HashMap<String, SlotValue>,
}

impl PromptValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trusted(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots
            .insert(name.into(), SlotValue::Trusted(value.into()));
        self
    }

    pub fn with_fenced(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), SlotValue::Fenced(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A text template with `{{ name }}` slots.
///
/// Rendering is a single left-to-right pass: substituted text is never
/// scanned again, so slot syntax inside a value stays literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Slot names in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find("{{") {
            let after_start = &rest[start + 2..];
            let Some(end) = after_start.find("}}") else {
                break;
            };
            let name = after_start[..end].trim().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
            rest = &after_start[end + 2..];
        }
        names
    }

    pub fn render(&self, values: &PromptValues) -> Result<String, PromptError> {
        self.render_inner(values, true)
    }

    /// Render with trusted values only. Referencing a fenced value fails.
    pub fn render_trusted(&self, values: &PromptValues) -> Result<String, PromptError> {
        self.render_inner(values, false)
    }

    fn render_inner(&self, values: &PromptValues, allow_fenced: bool) -> Result<String, PromptError> {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_start = &rest[start + 2..];
            if let Some(end) = after_start.find("}}") {
                let key = after_start[..end].trim();
                let value = values
                    .get(key)
                    .ok_or_else(|| PromptError::MissingVariable(key.to_string()))?;
                if !allow_fenced && matches!(value, SlotValue::Fenced(_)) {
                    return Err(PromptError::UntrustedInSystem(key.to_string()));
                }
                output.push_str(&value.rendered());
                rest = &after_start[end + 2..];
            } else {
                output.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }

        output.push_str(rest);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_keeps_content_verbatim() {
        assert_eq!(fence("a\nb"), "************\na\nb\n************");
    }

    #[test]
    fn unterminated_slot_is_left_literal() {
        let template = PromptTemplate::new("Hello {{ name");
        assert_eq!(template.render(&PromptValues::new()).unwrap(), "Hello {{ name");
    }

    #[test]
    fn variables_are_deduplicated() {
        let template = PromptTemplate::new("{{a}} {{ b }} {{a}}");
        assert_eq!(template.variables(), vec!["a", "b"]);
    }
}
