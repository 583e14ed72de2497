// Public API exports
pub mod config;
pub mod engine;
pub mod oracle;
pub mod section;
pub mod segmenter;

// Re-export main types for convenience
pub use config::{ConfigError, Secrets, DEFAULT_ENDPOINT, DEFAULT_MODEL};

pub use engine::{EngineError, RebalanceConfig, Rebalancer, StepOutcome, MERGE_SEPARATOR};

pub use oracle::{ChatOracle, DecisionOracle, OracleError, SectionInfo};

pub use section::{normalized, paragraph_count, word_count, Section};

pub use segmenter::{segment, split_sentences};
