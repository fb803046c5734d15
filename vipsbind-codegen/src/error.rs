//! Error types for code generation.

use crate::types::{Language, Position};
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Snapshot or metadata parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] vipsbind_registry::ParseError),

    /// Registry lookup or validation error.
    #[error("registry error: {0}")]
    Registry(#[from] vipsbind_registry::RegistryError),

    /// Configuration file error.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No type mapping exists for a value type.
    #[error("no {language} {position} type for '{type_name}' (fundamental '{fundamental}')")]
    UnmappedValueKind {
        /// Registry type name.
        type_name: String,
        /// Fundamental type name.
        fundamental: String,
        /// Output language.
        language: Language,
        /// Parameter or return position.
        position: Position,
    },
}
