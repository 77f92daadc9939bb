use thiserror::Error;

/// Configuration problems that abort a run.
///
/// Data problems (unparsable cells, short rows) never surface here; they are
/// replaced with the missing-value sentinel where they occur.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A row was parsed without a header-derived column layout.
    #[error("probe label indexes are required when parsing a sample from a row")]
    MissingLabelIndex,

    /// A requested column label does not occur in the input header.
    #[error("label not in file header: {0}")]
    LabelNotInHeader(String),

    /// Demographic matching needs metadata that was not supplied.
    #[error("demographic metadata required but not available for {0}")]
    MissingMetadata(String),

    #[error("tumor fraction must lie within [0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("number of samples to combine must be at least 1, got {0}")]
    InvalidChoose(usize),

    /// The header declares fewer columns than the identity block needs.
    #[error("header has {found} columns, expected at least {expected}")]
    ShortHeader { expected: usize, found: usize },
}
