
use thiserror::Error;

use crate::oracle::{DecisionOracle, OracleError, SectionInfo};
use crate::section::{normalized, Section};
use crate::segmenter;

/// Separator inserted between the texts of two merged sections.
pub const MERGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("target section count must be at least 1")]
    InvalidTarget,

    /// Transport or server failure reaching the oracle. Never retried here;
    /// the caller may rerun the whole iteration.
    #[error(transparent)]
    Oracle(OracleError),

    /// The oracle answered, but the answer failed validation. The section
    /// list is untouched.
    #[error("oracle protocol violation: {detail}")]
    Protocol { detail: String, raw: String },

    #[error("failed to converge at {current} sections (target {target}): {detail}")]
    Convergence {
        current: usize,
        target: usize,
        detail: String,
    },
}

#[derive(Debug, Clone)]
pub struct RebalanceConfig {
    /// Desired number of sections, at least 1.
    pub target: usize,
    /// How many times a single iteration re-asks the oracle after a
    /// malformed response before giving up. With the default of 0 the
    /// first malformed response aborts the run.
    pub max_protocol_retries: u32,
}

impl RebalanceConfig {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            max_protocol_retries: 0,
        }
    }

    pub fn with_protocol_retries(mut self, retries: u32) -> Self {
        self.max_protocol_retries = retries;
        self
    }
}

/// Result of one completed controller iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Sections `left` and `right` were combined into one at `left`.
    Merged { left: usize, right: usize },
    /// Section `index` was replaced by its two split parts.
    Split { index: usize },
    /// The section count already equals the target.
    Converged,
}

/// Drives an ordered section list toward the target count, one validated
/// merge or split per iteration.
///
/// The controller owns no state between runs; the section list passed to
/// [`Rebalancer::rebalance`] is its sole mutable state and is structurally
/// valid and content-complete after every completed [`Rebalancer::step`],
/// so a caller driving `step` itself can stop between iterations at any
/// point.
pub struct Rebalancer<O> {
    oracle: O,
    config: RebalanceConfig,
}

impl<O: DecisionOracle> Rebalancer<O> {
    pub fn new(oracle: O, config: RebalanceConfig) -> Self {
        Self { oracle, config }
    }

    /// Full pipeline: segment the document and rebalance to the target.
    ///
    /// Two short-circuits are taken before any oracle call:
    /// - a target of 1 returns the whole trimmed document as the only slide;
    /// - a target meeting or exceeding the sentence count returns one slide
    ///   per sentence fragment, since the oracle may only split at sentence
    ///   boundaries and can never do better.
    pub fn run(&self, text: &str) -> Result<Vec<String>, EngineError> {
        if self.config.target == 0 {
            return Err(EngineError::InvalidTarget);
        }

        let trimmed = text.trim();
        if self.config.target == 1 {
            return Ok(vec![trimmed.to_string()]);
        }

        let fragments = segmenter::split_sentences(trimmed);
        if self.config.target >= fragments.len() {
            return Ok(fragments);
        }

        let mut sections = segmenter::segment(text);
        println!("Initial split into {} sections.", sections.len());

        self.rebalance(&mut sections)?;
        Ok(sections.into_iter().map(|section| section.text).collect())
    }

    /// Run the convergence loop over an existing section list.
    pub fn rebalance(&self, sections: &mut Vec<Section>) -> Result<(), EngineError> {
        if self.config.target == 0 {
            return Err(EngineError::InvalidTarget);
        }

        loop {
            match self.step(sections)? {
                StepOutcome::Converged => return Ok(()),
                StepOutcome::Merged { left, right } => {
                    println!(
                        "Merged sections {left} and {right} ({} remaining)",
                        sections.len()
                    );
                }
                StepOutcome::Split { index } => {
                    println!("Split section {index} ({} total)", sections.len());
                }
            }
        }
    }

    /// Perform at most one merge or one split, changing the count by
    /// exactly one, or report convergence.
    ///
    /// Malformed oracle responses are re-requested up to the configured
    /// retry budget; the list is only mutated by a fully validated decision.
    pub fn step(&self, sections: &mut Vec<Section>) -> Result<StepOutcome, EngineError> {
        let mut attempts: u32 = 0;
        loop {
            match self.try_step(sections) {
                Err(EngineError::Protocol { detail, raw }) => {
                    if attempts < self.config.max_protocol_retries {
                        attempts += 1;
                        println!(
                            "Oracle protocol violation ({detail}); retrying decision ({attempts}/{})",
                            self.config.max_protocol_retries
                        );
                        continue;
                    }
                    if self.config.max_protocol_retries > 0 {
                        return Err(EngineError::Convergence {
                            current: sections.len(),
                            target: self.config.target,
                            detail: format!(
                                "protocol retry budget exhausted after {attempts} retries: {detail} (last response: {raw:?})"
                            ),
                        });
                    }
                    return Err(EngineError::Protocol { detail, raw });
                }
                other => return other,
            }
        }
    }

    fn try_step(&self, sections: &mut Vec<Section>) -> Result<StepOutcome, EngineError> {
        let count = sections.len();
        if count == self.config.target {
            Ok(StepOutcome::Converged)
        } else if count > self.config.target {
            self.merge_once(sections)
        } else {
            self.split_once(sections)
        }
    }

    fn merge_once(&self, sections: &mut Vec<Section>) -> Result<StepOutcome, EngineError> {
        let info = SectionInfo::from_sections(sections);
        let (a, b) = self.oracle.choose_merge(&info).map_err(from_oracle)?;

        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        // Bounds before adjacency: `left + 1` must not overflow on a huge pair.
        if right >= sections.len() {
            return Err(protocol(
                format!(
                    "merge pair ({a}, {b}) is out of bounds for {} sections",
                    sections.len()
                ),
                format!("[{a}, {b}]"),
            ));
        }
        if right != left + 1 {
            return Err(protocol(
                format!("merge pair ({a}, {b}) is not adjacent"),
                format!("[{a}, {b}]"),
            ));
        }

        let removed = sections.remove(right);
        let kept = &mut sections[left];
        kept.text.push_str(MERGE_SEPARATOR);
        kept.text.push_str(&removed.text);

        Ok(StepOutcome::Merged { left, right })
    }

    fn split_once(&self, sections: &mut Vec<Section>) -> Result<StepOutcome, EngineError> {
        let info = SectionInfo::from_sections(sections);
        let index = self.oracle.choose_split(&info).map_err(from_oracle)?;

        if index >= sections.len() {
            return Err(protocol(
                format!(
                    "split index {index} is out of bounds for {} sections",
                    sections.len()
                ),
                format!("[{index}]"),
            ));
        }

        let source = sections[index].text.clone();
        let (first, second) = self.oracle.split_text(&source).map_err(from_oracle)?;
        let first = first.trim().to_string();
        let second = second.trim().to_string();

        if first.is_empty() || second.is_empty() {
            return Err(protocol(
                "split produced an empty part".to_string(),
                format!("[{first:?}, {second:?}]"),
            ));
        }

        let rejoined = normalized(&format!("{first} {second}"));
        if rejoined != normalized(&source) {
            return Err(protocol(
                "split parts do not reconstruct the source section".to_string(),
                format!("[{first:?}, {second:?}]"),
            ));
        }

        sections[index] = Section::new(first);
        sections.insert(index + 1, Section::new(second));

        Ok(StepOutcome::Split { index })
    }
}

fn from_oracle(err: OracleError) -> EngineError {
    match err {
        OracleError::Protocol { detail, raw } => EngineError::Protocol { detail, raw },
        other => EngineError::Oracle(other),
    }
}

fn protocol(detail: String, raw: String) -> EngineError {
    EngineError::Protocol { detail, raw }
}
