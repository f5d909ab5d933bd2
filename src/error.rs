//! Error types for schema loading, scaffolding and screen rewriting

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a database schema. All of them are fatal.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("schema discovery failed: {0}")]
    Discovery(String),
    #[error("failed to read schema snapshot {}: {source}", path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse schema snapshot {}: {source}", path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write schema snapshot {}: {source}", path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize schema snapshot: {0}")]
    SnapshotSerialize(#[from] toml::ser::Error),
    #[error("foreign key on table '{table}' uses unknown column '{column}'")]
    UnknownColumn { table: String, column: String },
}

/// Errors raised by a [`Scaffolder`](crate::scaffold::Scaffolder).
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scaffold command for {class_name} exited with {status}: {stderr}")]
    Failed {
        class_name: String,
        status: String,
        stderr: String,
    },
    #[error("failed to read generated screen {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lookup failures while picking the label column of a related class.
/// The screen rewriter logs these and leaves the line alone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayFieldError {
    #[error("no table is known for class {0}")]
    UnknownClass(String),
    #[error("table '{table}' has no column besides ids and foreign keys")]
    NoCandidate { table: String },
}
