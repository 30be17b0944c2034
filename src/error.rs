use std::{io, path::PathBuf};

use crate::queue::QueueError;
use rustyline::error::ReadlineError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Required data source not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("System input/output error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed record in {}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed runway on line {line} of {}: {text:?}", path.display())]
    MalformedRunway {
        path: PathBuf,
        line: usize,
        text: String,
    },
    #[error("Invalid time of day: {0:?}")]
    InvalidTimeOfDay(String),
    #[error("Time error: {0}")]
    TimeError(#[from] jiff::Error),
    #[error("Error regarding config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode log entry: {0}")]
    LogEncoding(#[from] serde_json::Error),
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("Console error: {0}")]
    Console(#[from] ReadlineError),
}

impl ApplicationError {
    /// Maps an io error on `path`, turning `NotFound` into `MissingSource`.
    pub fn on_path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingSource(path)
        } else {
            Self::Io { path, source }
        }
    }
}
