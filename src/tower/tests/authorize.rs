use crate::decision::{Outcome, ReasonCode};
use crate::error::ApplicationError;
use crate::queue::OperationKind::{Landing, Takeoff};
use crate::runway::RunwayStatus;
use crate::tower::tests::utils::{
    BrokenLog, add_notam, add_runway, code, contents, exercise, fixed_clock, last, queue_with, tower,
};

#[test]
fn test_empty_queue_is_denied() {
    let records = exercise();
    let mut queue = queue_with(Takeoff, &[]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Denied, event.outcome);
    assert_eq!(Some(ReasonCode::EmptyQueue), event.reason);
    assert_eq!(None, event.flight);
    assert!(queue.is_empty());
    assert_eq!(&event, last(&events));
}

#[test]
fn test_empty_queue_checked_before_runway() {
    let records = exercise();
    let mut queue = queue_with(Landing, &[]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "09/27", &mut events).unwrap();

    assert_eq!(Some(ReasonCode::EmptyQueue), event.reason);
}

#[test]
fn test_closed_runway_is_denied() {
    let mut records = exercise();
    records.runways.clear();
    add_runway(&mut records, "10/28", RunwayStatus::Closed);
    let mut queue = queue_with(Takeoff, &["ALT1", "ALT2"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Denied, event.outcome);
    assert_eq!(Some(ReasonCode::RunwayNotOpen), event.reason);
    assert_eq!(Some(code("ALT1")), event.flight);
    assert!(event.detail.unwrap().contains("CLOSED"));
    assert_eq!(vec![code("ALT1"), code("ALT2")], contents(&queue));
}

#[test]
fn test_unknown_runway_is_denied() {
    let records = exercise();
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "33/15", &mut events).unwrap();

    assert_eq!(Some(ReasonCode::RunwayNotOpen), event.reason);
    assert!(event.detail.unwrap().contains("does not exist"));
    assert_eq!(1, queue.len());
}

#[test]
fn test_runway_with_free_text_status_is_denied() {
    let mut records = exercise();
    add_runway(&mut records, "15/33", RunwayStatus::Other("EM OBRAS".to_string()));
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "15/33", &mut events).unwrap();

    assert_eq!(Some(ReasonCode::RunwayNotOpen), event.reason);
    assert!(event.detail.unwrap().contains("EM OBRAS"));
}

#[test]
fn test_notam_closure_is_denied() {
    let mut records = exercise();
    add_notam(&mut records, "RUNWAY 10/28 CLOSED 14:30-16:00");
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Denied, event.outcome);
    assert_eq!(Some(ReasonCode::RunwayClosedByAdvisory), event.reason);
    assert_eq!(vec![code("ALT1")], contents(&queue));
}

#[test]
fn test_notam_ending_before_reference_allows() {
    let mut records = exercise();
    add_notam(&mut records, "RUNWAY 10/28 CLOSED 12:00-14:29");
    add_notam(&mut records, "RUNWAY 09/27 CLOSED 14:00-15:00");
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Authorized, event.outcome);
}

#[test]
fn test_unreadable_notam_is_denied() {
    let mut records = exercise();
    add_notam(&mut records, "RUNWAY 10/28 CLOSED UNTIL FURTHER NOTICE");
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Denied, event.outcome);
    assert_eq!(Some(ReasonCode::MalformedAdvisory), event.reason);
    assert_eq!(1, queue.len());
}

#[test]
fn test_authorize_pops_head() {
    let records = exercise();
    let mut queue = queue_with(Takeoff, &["ALT1", "ALT2"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Outcome::Authorized, event.outcome);
    assert_eq!(Some(code("ALT1")), event.flight);
    assert_eq!(Some("10/28"), event.runway.as_deref());
    assert_eq!(Takeoff, event.kind);
    assert_eq!(fixed_clock(), event.at);
    assert_eq!(Ok(&code("ALT2")), queue.peek_front());

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();
    assert_eq!(Some(code("ALT2")), event.flight);
    assert!(queue.is_empty());
    assert_eq!(2, events.len());
}

#[test]
fn test_authorized_message() {
    let records = exercise();
    let mut queue = queue_with(Landing, &["ALT7"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(
        "AUTHORIZED: LANDING of flight ALT7 on runway 10/28.",
        event.to_string()
    );
}

#[test]
fn test_unlogged_authorization_restores_head() {
    let records = exercise();
    let mut queue = queue_with(Takeoff, &["ALT1", "ALT2"]);

    let result = tower(&records).authorize(&mut queue, "10/28", &mut BrokenLog);

    assert!(matches!(result, Err(ApplicationError::Io { .. })));
    assert_eq!(vec![code("ALT1"), code("ALT2")], contents(&queue));
}

#[test]
fn test_unlogged_denial_leaves_queue() {
    let records = exercise();
    let mut queue = queue_with(Takeoff, &["ALT1"]);

    assert!(tower(&records).authorize(&mut queue, "09/27", &mut BrokenLog).is_err());
    assert_eq!(vec![code("ALT1")], contents(&queue));
}

#[test]
fn test_closure_later_on_notice_line_is_denied() {
    let mut records = exercise();
    add_notam(&mut records, "NOTAM RUNWAY 09/27 CLOSED 08:00-09:00 RUNWAY 10/28 CLOSED 14:00-15:00");
    add_notam(&mut records, "PISTA 15/33 FECHADA14:00-15:00");
    let mut queue = queue_with(Takeoff, &["ALT1"]);
    let mut events = vec![];

    let event = tower(&records).authorize(&mut queue, "10/28", &mut events).unwrap();

    assert_eq!(Some(ReasonCode::RunwayClosedByAdvisory), event.reason);
    assert_eq!(vec![code("ALT1")], contents(&queue));
}
