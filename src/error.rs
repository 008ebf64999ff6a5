//! Error types for the flex helpers

use thiserror::Error;

/// Which side of the codec rejected its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdTarget {
    /// An ID string being split
    Id,
    /// A list of parts being joined
    Parts,
}

impl std::fmt::Display for IdTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdTarget::Id => f.write_str("ID"),
            IdTarget::Parts => f.write_str("ID parts"),
        }
    }
}

/// A composite resource ID (or its parts) did not match the expected layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unexpected format for {target} ({input}), expected more than one part")]
    TooFewParts { target: IdTarget, input: String },

    #[error("unexpected format for {target} ({input}), expected ({expected}) parts{sep}", sep = separated_by(.separator))]
    PartCount {
        target: IdTarget,
        input: String,
        expected: usize,
        found: usize,
        /// Only reported when splitting an ID
        separator: Option<&'static str>,
    },

    #[error("unexpected format for {target} ({input}), the following id parts indexes are blank ({indexes:?})")]
    BlankParts {
        target: IdTarget,
        input: String,
        indexes: Vec<usize>,
    },
}

fn separated_by(separator: &Option<&'static str>) -> String {
    separator
        .map(|s| format!(" separated by ({})", s))
        .unwrap_or_default()
}

impl FormatError {
    /// The ID (or rendered part list) that failed validation
    pub fn input(&self) -> &str {
        match self {
            FormatError::TooFewParts { input, .. }
            | FormatError::PartCount { input, .. }
            | FormatError::BlankParts { input, .. } => input,
        }
    }

    pub fn target(&self) -> IdTarget {
        match self {
            FormatError::TooFewParts { target, .. }
            | FormatError::PartCount { target, .. }
            | FormatError::BlankParts { target, .. } => *target,
        }
    }

    /// Indexes of blank parts, empty unless this is a blank-part error
    pub fn blank_indexes(&self) -> &[usize] {
        match self {
            FormatError::BlankParts { indexes, .. } => indexes,
            _ => &[],
        }
    }
}

/// An attribute value did not have the shape a conversion expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("attribute {path}: expected {expected}, found {found}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute {path}: value {value} out of range for {target}")]
    OutOfRange {
        path: String,
        value: String,
        target: &'static str,
    },
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "map",
    }
}
