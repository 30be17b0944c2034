use crate::advisory::is_runway_closed_by_notice;
use crate::decision::{DecisionEvent, DecisionSink, Outcome, ReasonCode};
use crate::error::{ApplicationError, ApplicationResult};
use crate::flight::{FlightCode, find_flight};
use crate::pilot::{LicenseStatus, check_license};
use crate::queue::OperationQueue;
use crate::records::Records;
use crate::runway::{RunwayName, find_runway};
use crate::time::{Time, wall_clock};
use jiff::civil::{Date, DateTime};
use tracing::{debug, error};

/// The simulated "now" of the exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Pilot licenses expiring before this date are invalid.
    pub date: Date,
    /// Time of day NOTAM closures are evaluated at.
    pub instant: Time,
}

struct Refusal {
    reason: ReasonCode,
    detail: String,
}

impl Refusal {
    fn new(reason: ReasonCode, detail: String) -> Self {
        Refusal { reason, detail }
    }
}

/// Authorization engine. Holds no state between calls: queues and the
/// decision sink are handed in for every operation.
pub struct Tower<'a> {
    records: &'a Records,
    reference: Reference,
    clock: fn() -> DateTime,
}

impl<'a> Tower<'a> {
    pub fn new(records: &'a Records, reference: Reference) -> Self {
        Tower {
            records,
            reference,
            clock: wall_clock,
        }
    }

    /// Replaces the wall clock used to stamp decisions.
    pub fn with_clock(mut self, clock: fn() -> DateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Appends `flight` to the queue when the flight exists, is not queued yet and
    /// has a pilot with a valid license. Refusals leave the queue untouched, and
    /// so does an append whose decision cannot be recorded.
    pub fn enqueue(
        &self,
        queue: &mut OperationQueue,
        flight: &str,
        sink: &mut impl DecisionSink,
    ) -> ApplicationResult<DecisionEvent> {
        let code = FlightCode::from(flight.trim().to_uppercase());
        let event = match self.check_enqueue(queue, &code) {
            Ok(()) => {
                queue.enqueue(code.clone())?.map_err(ApplicationError::from)?;
                self.event(Outcome::EnqueueSucceeded, queue, Some(code.clone()), None, None)
            }
            Err(refusal) => {
                self.event(Outcome::EnqueueFailed, queue, Some(code.clone()), None, Some(refusal))
            }
        };

        let appended = event.outcome == Outcome::EnqueueSucceeded;
        self.emit(event, sink).inspect_err(|_| {
            if appended {
                undo(queue.withdraw_last(&code));
            }
        })
    }

    /// Pops the head of the queue onto `runway` when the queue has a candidate,
    /// the runway is open and no NOTAM closes it at the reference instant.
    /// Every denial leaves the queue untouched, and so does a pop whose decision
    /// cannot be recorded.
    pub fn authorize(
        &self,
        queue: &mut OperationQueue,
        runway: &str,
        sink: &mut impl DecisionSink,
    ) -> ApplicationResult<DecisionEvent> {
        let runway_name = Some(RunwayName::from(runway));
        let (event, popped) = match self.check_authorize(queue, runway) {
            Ok(()) => {
                let code = queue.pop_front()?.map_err(ApplicationError::from)?;
                let event =
                    self.event(Outcome::Authorized, queue, Some(code.clone()), runway_name, None);
                (event, Some(code))
            }
            Err(refusal) => {
                let head = queue.peek_front().ok().cloned();
                (self.event(Outcome::Denied, queue, head, runway_name, Some(refusal)), None)
            }
        };

        self.emit(event, sink).inspect_err(|_| {
            if let Some(code) = popped {
                undo(queue.restore_front(code));
            }
        })
    }

    fn check_enqueue(&self, queue: &OperationQueue, code: &FlightCode) -> Result<(), Refusal> {
        let plan = find_flight(&self.records.flights, code).ok_or_else(|| {
            Refusal::new(
                ReasonCode::FlightNotFound,
                format!("Flight {code} not found in the flight plans."),
            )
        })?;

        if queue.contains(code) {
            return Err(Self::already_queued(queue, code));
        }

        let aircraft = &plan.aircraft_type;
        match check_license(aircraft, &self.records.pilots, self.reference.date) {
            LicenseStatus::Valid { .. } => Ok(()),
            LicenseStatus::NoQualifiedPilot => Err(Refusal::new(
                ReasonCode::NoQualifiedPilot,
                format!("No pilot qualified for aircraft {aircraft} (flight {code})."),
            )),
            LicenseStatus::Expired { expiry } => Err(Refusal::new(
                ReasonCode::LicenseExpired,
                format!(
                    "Pilot license for aircraft {aircraft} (flight {code}) expired on {expiry}."
                ),
            )),
        }
    }

    fn check_authorize(&self, queue: &OperationQueue, runway: &str) -> Result<(), Refusal> {
        let head = queue.peek_front().map_err(|_| Self::empty_queue(queue))?;

        match find_runway(&self.records.runways, runway) {
            None => {
                return Err(Refusal::new(
                    ReasonCode::RunwayNotOpen,
                    format!("Flight {head} not authorized: runway {runway} does not exist."),
                ));
            }
            Some(r) if !r.is_open() => {
                return Err(Refusal::new(
                    ReasonCode::RunwayNotOpen,
                    format!("Flight {head} not authorized: runway {runway} is {}.", r.status),
                ));
            }
            Some(_) => {}
        }

        let instant = self.reference.instant;
        match is_runway_closed_by_notice(runway, &self.records.notams, instant) {
            Ok(false) => Ok(()),
            Ok(true) => Err(Refusal::new(
                ReasonCode::RunwayClosedByAdvisory,
                format!("Flight {head} not authorized: runway {runway} closed by NOTAM at {instant}."),
            )),
            Err(malformed) => Err(Refusal::new(
                ReasonCode::MalformedAdvisory,
                format!("Flight {head} not authorized: {malformed}."),
            )),
        }
    }

    fn already_queued(queue: &OperationQueue, code: &FlightCode) -> Refusal {
        Refusal::new(
            ReasonCode::AlreadyQueued,
            format!("Flight {code} is already in the {} queue.", queue.kind().label()),
        )
    }

    fn empty_queue(queue: &OperationQueue) -> Refusal {
        Refusal::new(
            ReasonCode::EmptyQueue,
            format!("No flights in the {} queue to authorize.", queue.kind().label()),
        )
    }

    fn event(
        &self,
        outcome: Outcome,
        queue: &OperationQueue,
        flight: Option<FlightCode>,
        runway: Option<RunwayName>,
        refusal: Option<Refusal>,
    ) -> DecisionEvent {
        let (reason, detail) = match refusal {
            Some(Refusal { reason, detail }) => (Some(reason), Some(detail)),
            None => (None, None),
        };
        DecisionEvent {
            at: (self.clock)(),
            outcome,
            kind: queue.kind(),
            flight,
            runway,
            reason,
            detail,
        }
    }

    fn emit(
        &self,
        event: DecisionEvent,
        sink: &mut impl DecisionSink,
    ) -> ApplicationResult<DecisionEvent> {
        debug!(
            outcome = ?event.outcome,
            kind = %event.kind,
            flight = event.flight.as_deref(),
            reason = ?event.reason,
            "Decision"
        );
        sink.record(&event)?;
        Ok(event)
    }
}

fn undo(result: ApplicationResult<()>) {
    if let Err(e) = result {
        error!(error = %e, "Could not restore the queue after a failed log write");
    }
}
