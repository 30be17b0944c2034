use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::FlightCode;
use crate::queue::OperationKind;
use crate::runway::RunwayName;
use crate::time::{stamp, wall_clock};
use fs2::FileExt;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Authorized,
    Denied,
    EnqueueFailed,
    EnqueueSucceeded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonCode {
    EmptyQueue,
    RunwayNotOpen,
    RunwayClosedByAdvisory,
    MalformedAdvisory,
    FlightNotFound,
    AlreadyQueued,
    NoQualifiedPilot,
    LicenseExpired,
}

impl ReasonCode {
    pub fn label(self) -> &'static str {
        match self {
            ReasonCode::EmptyQueue => "Empty queue",
            ReasonCode::RunwayNotOpen => "Runway not open",
            ReasonCode::RunwayClosedByAdvisory => "Runway closed (NOTAM)",
            ReasonCode::MalformedAdvisory => "Unreadable NOTAM window",
            ReasonCode::FlightNotFound => "Flight plan not found",
            ReasonCode::AlreadyQueued => "Already queued",
            ReasonCode::NoQualifiedPilot => "No qualified pilot",
            ReasonCode::LicenseExpired => "Pilot license expired",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub at: DateTime,
    pub outcome: Outcome,
    pub kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway: Option<RunwayName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DecisionEvent {
    pub fn is_refusal(&self) -> bool {
        matches!(self.outcome, Outcome::Denied | Outcome::EnqueueFailed)
    }
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flight = self.flight.as_deref().unwrap_or("-");
        let runway = self.runway.as_deref().unwrap_or("-");
        match self.outcome {
            Outcome::EnqueueSucceeded => write!(
                f,
                "SUCCESS: flight {flight} added to the {} queue.",
                self.kind.label()
            )?,
            Outcome::Authorized => write!(
                f,
                "AUTHORIZED: {} of flight {flight} on runway {runway}.",
                self.kind
            )?,
            Outcome::EnqueueFailed => write!(f, "ENQUEUE FAILED: flight {flight}")?,
            Outcome::Denied => write!(f, "DENIED: {} on runway {runway}", self.kind)?,
        }
        if let Some(reason) = self.reason {
            write!(f, " [{reason}]")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "lowercase")]
pub enum LogEntry {
    Decision(DecisionEvent),
    Note {
        at: DateTime,
        level: NoteLevel,
        message: String,
    },
}

impl LogEntry {
    pub fn at(&self) -> DateTime {
        match self {
            LogEntry::Decision(event) => event.at,
            LogEntry::Note { at, .. } => *at,
        }
    }
}

/// Where the authorization engine sends its decisions.
pub trait DecisionSink {
    fn record(&mut self, event: &DecisionEvent) -> ApplicationResult<()>;
}

impl DecisionSink for Vec<DecisionEvent> {
    fn record(&mut self, event: &DecisionEvent) -> ApplicationResult<()> {
        self.push(event.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogContents {
    pub entries: Vec<LogEntry>,
    pub unreadable: usize,
}

impl LogContents {
    pub fn decisions(&self) -> impl Iterator<Item = &DecisionEvent> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Decision(event) => Some(event),
            LogEntry::Note { .. } => None,
        })
    }
}

/// Append-only log, one `[YYYY-MM-DD HH:MM:SS] <json>` line per entry.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    path: PathBuf,
}

impl DecisionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DecisionLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> ApplicationResult<()> {
        let line = format!("[{}] {}\n", stamp(entry.at()), serde_json::to_string(entry)?);
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| ApplicationError::on_path(dir, e))?;
        }
        let write = |file: &mut File| -> std::io::Result<()> {
            file.lock_exclusive()?;
            file.write_all(line.as_bytes())?;
            file.flush()
        };
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| write(&mut file))
            .map_err(|e| ApplicationError::on_path(&self.path, e))
    }

    pub fn note(&self, level: NoteLevel, message: impl Into<String>) -> ApplicationResult<()> {
        self.append(&LogEntry::Note {
            at: wall_clock(),
            level,
            message: message.into(),
        })
    }

    pub fn read(&self) -> ApplicationResult<LogContents> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| ApplicationError::on_path(&self.path, e))?;
        let mut contents = LogContents::default();
        for (i, line) in content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
            match parse_line(line) {
                Some(entry) => contents.entries.push(entry),
                None => {
                    warn!(path = %self.path.display(), line = i + 1, "Skipping unreadable log line");
                    contents.unreadable += 1;
                }
            }
        }
        Ok(contents)
    }

    pub fn clear(&self) -> ApplicationResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| ApplicationError::on_path(dir, e))?;
        }
        File::create(&self.path)
            .map(|_| ())
            .map_err(|e| ApplicationError::on_path(&self.path, e))
    }
}

fn parse_line(line: &str) -> Option<LogEntry> {
    let (_, message) = line.strip_prefix('[')?.split_once("] ")?;
    serde_json::from_str(message).ok()
}

impl DecisionSink for DecisionLog {
    fn record(&mut self, event: &DecisionEvent) -> ApplicationResult<()> {
        self.append(&LogEntry::Decision(event.clone()))
    }
}
