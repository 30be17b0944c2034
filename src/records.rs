use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::FlightPlan;
use crate::pilot::Pilot;
use crate::runway::{Runway, RunwayName, RunwayStatus};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

pub type FleetEntry = HashMap<String, String>;

/// Records loaded for one command. Sources a command does not need stay empty.
#[derive(Debug, Default, Clone)]
pub struct Records {
    pub flights: Vec<FlightPlan>,
    pub runways: Vec<Runway>,
    pub pilots: Vec<Pilot>,
    pub notams: Vec<String>,
}

fn load_csv<T: DeserializeOwned>(path: &Path) -> ApplicationResult<Vec<T>> {
    let file = File::open(path).map_err(|e| ApplicationError::on_path(path, e))?;
    let rows = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file)
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| ApplicationError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), rows = rows.len(), "Loaded records");
    Ok(rows)
}

pub fn load_flight_plans(path: &Path) -> ApplicationResult<Vec<FlightPlan>> {
    load_csv(path)
}

pub fn load_pilots(path: &Path) -> ApplicationResult<Vec<Pilot>> {
    load_csv(path)
}

pub fn load_fleet(path: &Path) -> ApplicationResult<Vec<FleetEntry>> {
    load_csv(path)
}

pub fn load_runways(path: &Path) -> ApplicationResult<Vec<Runway>> {
    let content = fs::read_to_string(path).map_err(|e| ApplicationError::on_path(path, e))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let (name, status) =
                line.split_once(',')
                    .ok_or_else(|| ApplicationError::MalformedRunway {
                        path: path.to_path_buf(),
                        line: i + 1,
                        text: line.to_string(),
                    })?;
            let Ok(status) = status.parse::<RunwayStatus>();
            Ok(Runway {
                name: RunwayName::from(name.trim()),
                status,
            })
        })
        .collect()
}

/// METAR and NOTAM bulletins: one trimmed, non-blank line per entry.
pub fn load_bulletins(path: &Path) -> ApplicationResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ApplicationError::on_path(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
