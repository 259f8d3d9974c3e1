use std::fmt::{self, Display};

/// Errors produced by model constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidExtendedPanId(String),
    UnknownVariant { kind: &'static str, value: String },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidExtendedPanId(raw) => {
                write!(f, "invalid extended pan id: {raw}")
            }
            ModelError::UnknownVariant { kind, value } => {
                write!(f, "unknown {kind}: {value}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
