use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub type RunwayName = Arc<str>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunwayStatus {
    Open,
    Closed,
    Other(String),
}

impl FromStr for RunwayStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "OPEN" | "ABERTA" => RunwayStatus::Open,
            "CLOSED" | "FECHADA" => RunwayStatus::Closed,
            _ => RunwayStatus::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for RunwayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunwayStatus::Open => write!(f, "OPEN"),
            RunwayStatus::Closed => write!(f, "CLOSED"),
            RunwayStatus::Other(status) => write!(f, "{status}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Runway {
    pub name: RunwayName,
    pub status: RunwayStatus,
}

impl Runway {
    pub fn is_open(&self) -> bool {
        self.status == RunwayStatus::Open
    }
}

pub fn find_runway<'a>(runways: &'a [Runway], name: &str) -> Option<&'a Runway> {
    runways.iter().find(|r| &*r.name == name)
}
