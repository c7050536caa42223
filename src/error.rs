use std::path::PathBuf;
use thiserror::Error;

/// The type model itself is broken. Distinct from a value not matching a
/// shape, which is reported in a [`crate::MatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("record `{record}` declares field `{field}` as both required and optional")]
    DuplicateField { record: String, field: String },
    #[error("record `{record}` declares field `{field}` more than once")]
    RepeatedField { record: String, field: String },
    #[error("union must have at least one alternative")]
    EmptyUnion,
    #[error("type `{0}` is already registered")]
    DuplicateType(String),
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("type reference cycle: {}", .0.join(" -> "))]
    RefCycle(Vec<String>),
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("no declared return type for endpoint `{0}`")]
    UnknownEndpoint(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },
}
