//! Data models passed between the pipeline stages.
//!
//! Every value here is request-scoped: produced once by one stage and handed
//! forward to the next, never mutated afterwards.
//!
//! - [`Headline`]: one extracted news item
//! - [`SourceOutcome`]: what a single news source produced
//! - [`PipelineOutput`]: the three artifacts returned to the caller

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Separator placed between a headline's title and its detail.
pub const FIELD_SEPARATOR: &str = " - ";

/// One news item pulled out of a listing page.
///
/// The detail is either a description snippet or a link, depending on the
/// source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// The item's title, or a placeholder when none was found.
    pub title: String,
    /// Description or absolute link, or a placeholder.
    pub detail: String,
}

impl Headline {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Render as a single `title - detail` line.
    pub fn line(&self) -> String {
        format!("{}{}{}", self.title, FIELD_SEPARATOR, self.detail)
    }
}

/// Result of asking one news source for context.
///
/// `Empty` covers both "nothing matched" and "the fetch failed"; callers
/// cannot tell them apart and both drive the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Newline-joined headline lines, never empty.
    Found(String),
    Empty,
}

impl SourceOutcome {
    /// Build an outcome from extracted headlines.
    pub fn from_headlines(headlines: &[Headline]) -> Self {
        if headlines.is_empty() {
            return SourceOutcome::Empty;
        }
        SourceOutcome::Found(headlines.iter().map(Headline::line).join("\n"))
    }

    pub fn into_context(self) -> Option<String> {
        match self {
            SourceOutcome::Found(text) => Some(text),
            SourceOutcome::Empty => None,
        }
    }
}

/// Everything one pipeline run produced, in the order it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The resolved news context (possibly the default literal).
    pub context: String,
    /// The fully rendered prompt sent to the model.
    pub prompt: String,
    /// The model's raw answer.
    pub answer: String,
}
