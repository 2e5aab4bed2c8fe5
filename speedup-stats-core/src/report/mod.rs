use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hypothesis::HypothesisOutcome;
use crate::summary::RatioSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Everything a reporter may render. Either half may be absent when only one
/// analysis was run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<RatioSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<HypothesisOutcome>,
}

pub trait Reporter: Send + Sync {
    fn report(&self, analysis: &Analysis) -> Result<(), ReportError>;
}

/// `collection_pipeline` -> `Collection Pipeline`
pub fn title_case(category: &str) -> String {
    category
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

mod json;
mod markdown;
mod terminal;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use terminal::TerminalReporter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("collection_pipeline"), "Collection Pipeline");
        assert_eq!(title_case("io"), "Io");
        assert_eq!(title_case("already Spaced"), "Already Spaced");
        assert_eq!(title_case("__double__"), "Double");
        assert_eq!(title_case(""), "");
    }
}
