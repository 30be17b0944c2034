use crate::decision::{Outcome, ReasonCode};
use crate::queue::OperationKind::Takeoff;
use crate::tower::tests::utils::{arb_code, arb_runway, contents, exercise, queue_with, tower};
use proptest::prelude::*;
use proptest::proptest;

proptest! {
    #[test]
    fn test_authorized_in_enqueue_order(
        requests in prop::collection::vec(arb_code(), 1..30)
    ) {
        let records = exercise();
        let tower = tower(&records);
        let mut queue = queue_with(Takeoff, &[]);
        let mut events = vec![];

        let mut accepted = vec![];
        for request in &requests {
            let event = tower.enqueue(&mut queue, request, &mut events).unwrap();
            if event.outcome == Outcome::EnqueueSucceeded {
                accepted.push(event.flight.unwrap());
            } else {
                prop_assert_eq!(Some(ReasonCode::AlreadyQueued), event.reason);
            }
        }
        prop_assert_eq!(&accepted, &contents(&queue));

        let mut authorized = vec![];
        while !queue.is_empty() {
            let event = tower.authorize(&mut queue, "10/28", &mut events).unwrap();
            prop_assert_eq!(Outcome::Authorized, event.outcome);
            authorized.push(event.flight.unwrap());
        }
        prop_assert_eq!(accepted, authorized);
    }

    #[test]
    fn test_duplicate_never_changes_length(
        requests in prop::collection::vec(arb_code(), 1..30)
    ) {
        let records = exercise();
        let tower = tower(&records);
        let mut queue = queue_with(Takeoff, &[]);
        let mut events = vec![];

        for request in &requests {
            let was_queued = queue.contains(request);
            let before = queue.len();
            let event = tower.enqueue(&mut queue, request, &mut events).unwrap();
            if was_queued {
                prop_assert_eq!(Outcome::EnqueueFailed, event.outcome);
                prop_assert_eq!(Some(ReasonCode::AlreadyQueued), event.reason);
                prop_assert_eq!(before, queue.len());
            } else {
                prop_assert_eq!(before + 1, queue.len());
            }
        }
    }

    #[test]
    fn test_denials_never_mutate(
        initial in prop::collection::hash_set(arb_code(), 0..9),
        runways in prop::collection::vec(arb_runway(), 1..20)
    ) {
        let records = exercise();
        let tower = tower(&records);
        let codes = initial.iter().map(String::as_str).collect::<Vec<_>>();
        let mut queue = queue_with(Takeoff, &codes);
        let mut events = vec![];

        for runway in runways {
            let before = contents(&queue);
            let event = tower.authorize(&mut queue, runway, &mut events).unwrap();
            let after = contents(&queue);
            if event.outcome == Outcome::Denied {
                prop_assert_eq!(before, after);
            } else {
                prop_assert_eq!(&before[1..], &after[..]);
                prop_assert_eq!(before.first(), event.flight.as_ref());
            }
        }
    }
}
