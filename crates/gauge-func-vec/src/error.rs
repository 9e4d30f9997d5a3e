//! Error types for gauge-func-vec

use crate::labels::format_names;
use thiserror::Error;

/// Errors raised while building a vector or exporting metrics
#[derive(Debug, Error)]
pub enum Error {
    /// A variable label name is also declared as a constant label
    #[error(
        "variable label names should not include any of the const label names, got variable labels {} including {name} defined in const labels {}",
        format_names(.variable_labels),
        format_names(.const_labels)
    )]
    OverlappingLabels {
        /// Declared variable label names
        variable_labels: Vec<String>,
        /// First variable label found among the constant labels
        name: String,
        /// Constant label names, sorted
        const_labels: Vec<String>,
    },

    /// The metrics client rejected a descriptor or registration
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Encoded metrics were not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Tracing subscriber could not be installed
    #[error("Tracing error: {0}")]
    Tracing(String),
}

/// Why a label set was refused by [`GaugeFuncVec::register`]
///
/// [`GaugeFuncVec::register`]: crate::GaugeFuncVec::register
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The label set has more or fewer labels than declared
    #[error(
        "unexpected number of labels, expected {}, got {}",
        format_names(.expected),
        format_names(.got)
    )]
    UnexpectedLabelCount {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// A declared variable label is absent from the label set
    #[error(
        "labels don't include expected label {name}, expected {}, got {}",
        format_names(.expected),
        format_names(.got)
    )]
    MissingLabel {
        name: String,
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// The label set tries to set a constant label
    #[error("can't override const label {name}, const labels are {const_labels}")]
    ConstLabelOverride {
        name: String,
        /// Canonical key of the constant labels
        const_labels: String,
    },

    /// A function is already registered for this label combination
    #[error("duplicate registration for label values {key}")]
    Duplicate { key: String },
}

/// Result type alias for gauge-func-vec operations
pub type Result<T> = std::result::Result<T, Error>;
