mod client;
mod types;


pub use client::ChatOracle;
pub use types::{ChatChoice, ChatChoiceMessage, ChatMessage, ChatRequest, ChatResponse};

use serde::Serialize;
use thiserror::Error;

use crate::section::Section;

/// Per-section metadata snapshot sent to the oracle as decision context.
///
/// Built fresh for every call; metrics are never cached across mutations.
#[derive(Debug, Clone, Serialize)]
pub struct SectionInfo {
    pub index: usize,
    pub words: usize,
    pub paragraphs: usize,
    pub text: String,
}

impl SectionInfo {
    pub fn from_sections(sections: &[Section]) -> Vec<SectionInfo> {
        sections
            .iter()
            .enumerate()
            .map(|(index, section)| SectionInfo {
                index,
                words: section.word_count(),
                paragraphs: section.paragraph_count(),
                text: section.text.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("oracle server returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed oracle response: {detail}")]
    Protocol { detail: String, raw: String },
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Transport(err.to_string())
    }
}

/// The semantic decision capability driving the rebalancing loop.
///
/// Implementations are non-deterministic and untrusted: the same input may
/// yield different answers across calls, and any answer may be malformed.
/// Callers validate every response before touching the section list.
pub trait DecisionOracle {
    /// Pick two adjacent sections to merge. Requires at least 2 sections.
    fn choose_merge(&self, sections: &[SectionInfo]) -> Result<(usize, usize), OracleError>;

    /// Pick one section to split. Requires at least 1 section.
    fn choose_split(&self, sections: &[SectionInfo]) -> Result<usize, OracleError>;

    /// Split a section's text into two non-empty parts at a sentence
    /// boundary, such that rejoining them reconstructs the input.
    fn split_text(&self, text: &str) -> Result<(String, String), OracleError>;
}

impl<T: DecisionOracle + ?Sized> DecisionOracle for &T {
    fn choose_merge(&self, sections: &[SectionInfo]) -> Result<(usize, usize), OracleError> {
        (**self).choose_merge(sections)
    }

    fn choose_split(&self, sections: &[SectionInfo]) -> Result<usize, OracleError> {
        (**self).choose_split(sections)
    }

    fn split_text(&self, text: &str) -> Result<(String, String), OracleError> {
        (**self).split_text(text)
    }
}
