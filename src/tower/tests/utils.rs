use crate::decision::{DecisionEvent, DecisionSink};
use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::{FlightCode, FlightPlan};
use crate::pilot::Pilot;
use crate::queue::{OperationKind, OperationQueue};
use crate::records::Records;
use crate::runway::{Runway, RunwayStatus};
use crate::time::Time;
use crate::tower::engine::{Reference, Tower};
use jiff::civil::{Date, DateTime, date};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub fn code(s: &str) -> FlightCode {
    Arc::from(s)
}

pub fn reference() -> Reference {
    Reference {
        date: date(1978, 12, 31),
        instant: Time::hm(14, 30),
    }
}

pub fn fixed_clock() -> DateTime {
    date(1978, 12, 31).at(14, 30, 0, 0)
}

pub fn tower(records: &Records) -> Tower<'_> {
    Tower::new(records, reference()).with_clock(fixed_clock)
}

pub fn add_flight(records: &mut Records, flight_code: &str, aircraft_type: &str) {
    records.flights.push(FlightPlan {
        code: code(flight_code),
        origin: Arc::from("SBGR"),
        destination: Arc::from("SBRJ"),
        etd: Time::hm(14, 0),
        eta: Time::hm(15, 0),
        aircraft_type: Arc::from(aircraft_type),
        category: "REGULAR".to_string(),
        priority: 1,
    });
}

pub fn add_pilot(records: &mut Records, qualification: &str, license_expiry: Date) {
    records.pilots.push(Pilot {
        name: None,
        qualified_aircraft_type: Arc::from(qualification),
        license_expiry,
    });
}

pub fn add_runway(records: &mut Records, name: &str, status: RunwayStatus) {
    records.runways.push(Runway {
        name: Arc::from(name),
        status,
    });
}

pub fn add_notam(records: &mut Records, notice: &str) {
    records.notams.push(notice.to_string());
}

pub fn queue_with(kind: OperationKind, codes: &[&str]) -> OperationQueue {
    let mut queue = OperationQueue::in_memory(kind);
    for c in codes {
        queue.enqueue(code(c)).unwrap().unwrap();
    }
    queue
}

/// Flights ALT1..ALT9 on B737 with a valid pilot, takeoff runway 10/28 open.
pub fn exercise() -> Records {
    let mut records = Records::default();
    for i in 1..=9 {
        add_flight(&mut records, &format!("ALT{i}"), "B737");
    }
    add_pilot(&mut records, "B737", date(1979, 6, 30));
    add_runway(&mut records, "10/28", RunwayStatus::Open);
    add_runway(&mut records, "09/27", RunwayStatus::Closed);
    records
}

pub fn contents(queue: &OperationQueue) -> Vec<FlightCode> {
    queue.preview(queue.len())
}

pub fn last(events: &[DecisionEvent]) -> &DecisionEvent {
    events.last().unwrap()
}

/// A decision log whose every append fails.
pub struct BrokenLog;

impl DecisionSink for BrokenLog {
    fn record(&mut self, _event: &DecisionEvent) -> ApplicationResult<()> {
        Err(ApplicationError::Io {
            path: PathBuf::from("logs/tower.log"),
            source: io::Error::other("disk full"),
        })
    }
}

pub fn arb_code() -> impl Strategy<Value = String> {
    (1..=9u8).prop_map(|i| format!("ALT{i}"))
}

pub fn arb_runway() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("09/27"), Just("33/15"), Just("10/28")]
}
