use jiff::civil::Date;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Pilot {
    #[serde(rename = "nome", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "habilitacao", alias = "qualification")]
    pub qualified_aircraft_type: Arc<str>,
    #[serde(rename = "validade", alias = "license_expiry")]
    pub license_expiry: Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LicenseStatus {
    Valid { expiry: Date },
    NoQualifiedPilot,
    Expired { expiry: Date },
}

/// Checks the first pilot, in load order, qualified for `aircraft_type`.
/// Later pilots with the same qualification are never consulted.
pub fn check_license(aircraft_type: &str, pilots: &[Pilot], reference_date: Date) -> LicenseStatus {
    match pilots
        .iter()
        .find(|p| &*p.qualified_aircraft_type == aircraft_type)
    {
        None => LicenseStatus::NoQualifiedPilot,
        Some(pilot) if pilot.license_expiry < reference_date => LicenseStatus::Expired {
            expiry: pilot.license_expiry,
        },
        Some(pilot) => LicenseStatus::Valid {
            expiry: pilot.license_expiry,
        },
    }
}
