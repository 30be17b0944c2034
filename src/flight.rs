use crate::time::Time;
use serde::Deserialize;
use std::sync::Arc;
use tabled::Tabled;

pub type FlightCode = Arc<str>;

#[derive(Clone, Debug, PartialEq, Deserialize, Tabled)]
pub struct FlightPlan {
    #[serde(rename = "voo")]
    #[tabled(rename = "Flight")]
    pub code: FlightCode,
    #[serde(rename = "origem")]
    #[tabled(rename = "Origin")]
    pub origin: Arc<str>,
    #[serde(rename = "destino")]
    #[tabled(rename = "Destination")]
    pub destination: Arc<str>,
    #[tabled(rename = "ETD")]
    pub etd: Time,
    #[tabled(rename = "ETA")]
    pub eta: Time,
    #[serde(rename = "aeronave")]
    #[tabled(rename = "Aircraft")]
    pub aircraft_type: Arc<str>,
    #[serde(rename = "tipo")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "prioridade")]
    #[tabled(rename = "Priority")]
    pub priority: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Etd,
    #[value(alias = "voo")]
    Flight,
    #[value(alias = "tipo")]
    Category,
    #[value(alias = "prioridade")]
    Priority,
}

/// Sorts in place; priority is highest first, everything else ascending.
pub fn sort_flight_plans(flights: &mut [FlightPlan], key: SortKey) {
    match key {
        SortKey::Etd => flights.sort_by_key(|f| f.etd),
        SortKey::Flight => flights.sort_by(|a, b| a.code.cmp(&b.code)),
        SortKey::Category => flights.sort_by(|a, b| a.category.cmp(&b.category)),
        SortKey::Priority => flights.sort_by(|a, b| b.priority.cmp(&a.priority)),
    }
}

pub fn find_flight<'a>(flights: &'a [FlightPlan], code: &str) -> Option<&'a FlightPlan> {
    flights.iter().find(|f| &*f.code == code)
}
