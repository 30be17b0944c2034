use crate::error::{ApplicationError, ApplicationResult};
use crate::time::Time;
use jiff::civil::{Date, date};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exercise settings, read from a JSON file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub report_dir: PathBuf,
    /// Date against which pilot licenses are checked.
    pub reference_date: Date,
    /// Simulated current time of day for NOTAM evaluation.
    pub reference_time: Time,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        ExerciseConfig {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            report_dir: PathBuf::from("reports"),
            reference_date: date(1978, 12, 31),
            reference_time: Time::hm(14, 30),
        }
    }
}

impl ExerciseConfig {
    pub fn load_from_file(path: &Path) -> ApplicationResult<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No exercise file, using defaults");
                return Ok(ExerciseConfig::default());
            }
            Err(e) => return Err(ApplicationError::on_path(path, e)),
        };
        serde_json::from_str(&data).map_err(|source| ApplicationError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn flight_plans(&self) -> PathBuf {
        self.data_dir.join("flight_plans.csv")
    }

    pub fn runways(&self) -> PathBuf {
        self.data_dir.join("runways.txt")
    }

    pub fn fleet(&self) -> PathBuf {
        self.data_dir.join("fleet.csv")
    }

    pub fn pilots(&self) -> PathBuf {
        self.data_dir.join("pilots.csv")
    }

    pub fn metar(&self) -> PathBuf {
        self.data_dir.join("metar.txt")
    }

    pub fn notam(&self) -> PathBuf {
        self.data_dir.join("notam.txt")
    }

    pub fn queue_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn decision_log(&self) -> PathBuf {
        self.log_dir.join("tower.log")
    }

    /// Report file for the given generation date.
    pub fn report_file(&self, generated_on: Date) -> PathBuf {
        self.report_dir
            .join(format!("operation_{}.txt", generated_on.strftime("%Y%m%d")))
    }

    pub fn is_report_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("operation_") && n.ends_with(".txt"))
    }

    /// Sources `import-data` verifies before an exercise starts.
    pub fn required_sources(&self) -> [PathBuf; 6] {
        [
            self.flight_plans(),
            self.runways(),
            self.fleet(),
            self.pilots(),
            self.metar(),
            self.notam(),
        ]
    }
}
