//! Error types for gft-io

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Mode a file was being opened for when the open failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

impl OpenMode {
    fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "reading",
            OpenMode::Write => "writing",
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("cannot open {path} for {mode}: {source}")]
    Open {
        path: PathBuf,
        mode: OpenMode,
        source: std::io::Error,
    },

    #[error("{file}: record {record}: field '{field}': expected {expected}, got '{token}'")]
    MalformedRecord {
        file: String,
        record: usize,
        field: &'static str,
        expected: &'static str,
        token: String,
    },

    #[error("{file}: record {record}: field '{field}': record is short (unexpected end of file)")]
    ShortRecord {
        file: String,
        record: usize,
        field: &'static str,
    },

    #[error("{file}: declared {declared} records but only {found} present")]
    CountMismatch {
        file: String,
        declared: usize,
        found: usize,
    },

    #[error("{file}: expected {expected} stress records (one per element), found {found}")]
    StressCountMismatch {
        file: String,
        expected: usize,
        found: usize,
    },

    #[error("{file}: record {record}: node index {index} out of range (mesh has {num_nodes} nodes)")]
    NodeIndexOutOfRange {
        file: String,
        record: usize,
        index: i64,
        num_nodes: usize,
    },

    #[error("time step is zero, cannot normalize velocities")]
    ZeroTimeStep,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
