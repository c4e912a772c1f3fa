//! Prompt rendering.
//!
//! Templates carry two named slots, `{input}` and `{context}`. Rendering is
//! one left-to-right pass: text spliced into a slot is never scanned again,
//! so a query that itself contains `{context}` comes out verbatim.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(input|context)\}").unwrap());

/// A reasoning template with `{input}` and `{context}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    body: String,
}

impl PromptTemplate {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Fill both slots. Pure: the same inputs always give the same output.
    pub fn render(&self, input: &str, context: &str) -> String {
        SLOT.replace_all(&self.body, |caps: &Captures<'_>| match &caps[1] {
            "input" => input.to_string(),
            _ => context.to_string(),
        })
        .into_owned()
    }
}
