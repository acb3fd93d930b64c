#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The grading prompt sent to the provider.

use std::fmt;

use crate::input::{AssignmentSpec, SubmissionCode};

/// Rubric template. `{assignment}` and `{solution}` are filled in.
const GRADING_TEMPLATE: &str = include_str!("prompts/grading.md");

/// Probe sent by `aigrade check` to confirm a key works.
pub const CHECK_PROMPT: &str = "Say 'API key is working correctly'";

/// A fully rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Returns the prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the prompt.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the prompt is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fills `{name}` slots in a single pass. Substituted values are never
/// rescanned, so braces inside student code stay untouched. Unknown slots
/// are copied through as-is.
fn render_template(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let hit = slots.iter().find_map(|(name, value)| {
            tail.strip_prefix(name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });

        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Builds the grading prompt from the requirements and the student's code.
pub fn build_prompt(assignment: &AssignmentSpec, code: &SubmissionCode) -> Prompt {
    Prompt(render_template(
        GRADING_TEMPLATE,
        &[("assignment", assignment.as_str()), ("solution", code.as_str())],
    ))
}
