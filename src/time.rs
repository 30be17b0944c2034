use crate::error::ApplicationError;
use jiff::{Zoned, civil::DateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time of day in minutes since midnight.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub u16);

impl Time {
    pub fn hm(hours: u16, minutes: u16) -> Time {
        Time(hours * 60 + minutes)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Time {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApplicationError::InvalidTimeOfDay(s.to_string());
        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str, max_len: usize| {
            (!part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit()))
                .then(|| part.parse::<u16>().ok())
                .flatten()
        };
        match (digits(hours, 2), digits(minutes, 2)) {
            (Some(h), Some(m)) if h < 24 && m < 60 && minutes.len() == 2 => Ok(Time::hm(h, m)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Time {
    type Error = ApplicationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(value: Time) -> Self {
        value.to_string()
    }
}

/// Closed interval of the day; `from > to` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: Time,
    pub to: Time,
}

impl Window {
    pub fn contains(&self, instant: Time) -> bool {
        if self.from <= self.to {
            self.from <= instant && instant <= self.to
        } else {
            instant >= self.from || instant <= self.to
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Window {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('-')
            .ok_or_else(|| ApplicationError::InvalidTimeOfDay(s.to_string()))?;
        Ok(Window {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

pub fn wall_clock() -> DateTime {
    Zoned::now().datetime()
}

/// `YYYY-MM-DD HH:MM:SS`, the stamp used in the decision log.
pub fn stamp(at: DateTime) -> String {
    at.strftime("%Y-%m-%d %H:%M:%S").to_string()
}
