use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::FlightCode;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    #[value(alias = "decolagem")]
    Takeoff,
    #[value(alias = "pouso")]
    Landing,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Takeoff, OperationKind::Landing];

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Takeoff => "takeoff",
            OperationKind::Landing => "landing",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Takeoff => write!(f, "TAKEOFF"),
            OperationKind::Landing => write!(f, "LANDING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("flight already in the queue")]
    DuplicateInQueue,
    #[error("queue is empty")]
    EmptyQueue,
}

/// Locates the queue files, one per operation kind.
#[derive(Debug, Clone)]
pub struct QueueStore {
    dir: PathBuf,
}

impl QueueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        QueueStore { dir: dir.into() }
    }

    pub fn path(&self, kind: OperationKind) -> PathBuf {
        self.dir.join(format!("queue_{}.txt", kind.label()))
    }

    /// Opens the queue for a read-decide-write cycle. The exclusive lock is held
    /// until the returned queue is dropped.
    pub fn open(&self, kind: OperationKind) -> ApplicationResult<OperationQueue> {
        let path = self.path(kind);
        fs::create_dir_all(&self.dir).map_err(|e| ApplicationError::on_path(&self.dir, e))?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| ApplicationError::on_path(&path, e))?;
        file.lock_exclusive()
            .map_err(|e| ApplicationError::on_path(&path, e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| ApplicationError::on_path(&path, e))?;
        let codes = parse_queue(&content, &path);
        debug!(%kind, len = codes.len(), "Opened queue");

        Ok(OperationQueue {
            kind,
            codes,
            backing: Some(Backing { path, file }),
        })
    }

    /// Read-only view, no lock taken; a missing file reads as an empty queue.
    pub fn snapshot(&self, kind: OperationKind) -> ApplicationResult<OperationQueue> {
        let path = self.path(kind);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(ApplicationError::on_path(&path, e)),
        };
        Ok(OperationQueue {
            kind,
            codes: parse_queue(&content, &path),
            backing: None,
        })
    }

    pub fn clear(&self, kind: OperationKind) -> ApplicationResult<PathBuf> {
        let mut queue = self.open(kind)?;
        queue.codes.clear();
        queue.persist()?;
        Ok(self.path(kind))
    }
}

fn parse_queue(content: &str, path: &Path) -> VecDeque<FlightCode> {
    let mut codes: VecDeque<FlightCode> = VecDeque::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if codes.iter().any(|c| &**c == line) {
            warn!(path = %path.display(), code = line, "Duplicate entry in queue file");
        }
        codes.push_back(FlightCode::from(line));
    }
    codes
}

#[derive(Debug)]
struct Backing {
    path: PathBuf,
    file: File,
}

/// FIFO of flight codes for one operation kind.
#[derive(Debug)]
pub struct OperationQueue {
    kind: OperationKind,
    codes: VecDeque<FlightCode>,
    backing: Option<Backing>,
}

impl OperationQueue {
    pub fn in_memory(kind: OperationKind) -> Self {
        OperationQueue {
            kind,
            codes: VecDeque::new(),
            backing: None,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| &**c == code)
    }

    pub fn preview(&self, n: usize) -> Vec<FlightCode> {
        self.codes.iter().take(n).cloned().collect()
    }

    pub fn peek_front(&self) -> Result<&FlightCode, QueueError> {
        self.codes.front().ok_or(QueueError::EmptyQueue)
    }

    pub fn enqueue(&mut self, code: FlightCode) -> ApplicationResult<Result<(), QueueError>> {
        if self.contains(&code) {
            return Ok(Err(QueueError::DuplicateInQueue));
        }
        self.codes.push_back(code);
        self.persist()?;
        Ok(Ok(()))
    }

    pub fn pop_front(&mut self) -> ApplicationResult<Result<FlightCode, QueueError>> {
        let Some(code) = self.codes.pop_front() else {
            return Ok(Err(QueueError::EmptyQueue));
        };
        self.persist()?;
        Ok(Ok(code))
    }

    /// Takes `code` back off the tail after an enqueue that could not be logged.
    pub fn withdraw_last(&mut self, code: &str) -> ApplicationResult<()> {
        if self.codes.back().is_some_and(|c| &**c == code) {
            self.codes.pop_back();
            self.persist()?;
        }
        Ok(())
    }

    /// Puts a popped `code` back at the head.
    pub fn restore_front(&mut self, code: FlightCode) -> ApplicationResult<()> {
        self.codes.push_front(code);
        self.persist()
    }

    /// Rewrites the whole backing file from memory.
    fn persist(&mut self) -> ApplicationResult<()> {
        let Some(backing) = self.backing.as_mut() else {
            return Ok(());
        };
        let mut content = String::new();
        for code in &self.codes {
            content.push_str(code);
            content.push('\n');
        }
        let rewrite = |file: &mut File| -> std::io::Result<()> {
            file.seek(SeekFrom::Start(0))?;
            file.set_len(0)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()
        };
        rewrite(&mut backing.file).map_err(|e| ApplicationError::on_path(&backing.path, e))
    }
}
