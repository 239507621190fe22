//! Property-based tests for admission and ledger invariants.

use proptest::prelude::*;
use roster::{
    BookingOutcome, CancelOutcome, MemberId, Session, SessionAdmissionController,
    SubscriptionLedger, SubscriptionRecord, Timestamp,
};

#[derive(Clone, Debug)]
enum Op {
    Book(u8),
    Cancel(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..10).prop_map(Op::Book),
        2 => (0u8..10).prop_map(Op::Cancel),
    ]
}

fn member(n: u8) -> MemberId {
    MemberId::new(format!("m{n}"))
}

fn arb_duration() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("1_month"),
        Just("3_months"),
        Just("6_months"),
        Just("1_year"),
        Just("unknown"),
    ]
}

/// `sub` appears in `full` in the same relative order.
fn is_subsequence(sub: &[MemberId], full: &[MemberId]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|s| it.any(|f| f == s))
}

proptest! {
    #[test]
    fn roster_never_exceeds_capacity(capacity in -2i64..6, ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut class = SessionAdmissionController::from_snapshot(Session::new("s", capacity));

        for op in ops {
            match op {
                Op::Book(n) => { class.book(&member(n)); }
                Op::Cancel(n) => { class.cancel(&member(n)); }
            }

            let roster = class.roster();
            let bound = capacity.max(0) as usize;
            prop_assert!(roster.len() <= bound);
            for m in roster.iter() {
                prop_assert!(!class.waitlist().contains(m));
            }
        }
    }

    #[test]
    fn waitlist_promotes_in_arrival_order(capacity in 1i64..4, ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut class = SessionAdmissionController::from_snapshot(Session::new("s", capacity));

        for op in ops {
            let before = class.waitlist().to_vec();
            match op {
                Op::Book(n) => {
                    let outcome = class.book(&member(n));
                    if let BookingOutcome::Waitlisted { position } = outcome {
                        prop_assert_eq!(position, before.len());
                    }
                }
                Op::Cancel(n) => {
                    if let CancelOutcome::Removed { promoted: Some(p) } = class.cancel(&member(n)) {
                        prop_assert_eq!(Some(&p), before.first());
                    }
                }
            }

            let after = class.waitlist().to_vec();
            let survivors: Vec<MemberId> =
                after.iter().filter(|m| before.contains(m)).cloned().collect();
            prop_assert!(is_subsequence(&survivors, &before));
        }
    }

    #[test]
    fn booking_twice_is_idempotent(capacity in 1i64..5, n in 0u8..10, warmup in prop::collection::vec(arb_op(), 0..20)) {
        let mut class = SessionAdmissionController::from_snapshot(Session::new("s", capacity));
        for op in warmup {
            match op {
                Op::Book(m) => { class.book(&member(m)); }
                Op::Cancel(m) => { class.cancel(&member(m)); }
            }
        }

        let first = class.book(&member(n));
        let snapshot = class.snapshot();
        let second = class.book(&member(n));

        if first.is_admitted() {
            prop_assert_eq!(second, BookingOutcome::AlreadyAdmitted);
        } else {
            prop_assert!(matches!(second, BookingOutcome::AlreadyWaitlisted { .. }), "expected AlreadyWaitlisted, got {:?}", second);
        }
        prop_assert_eq!(class.snapshot(), snapshot);
    }

    #[test]
    fn renewals_build_history(
        renewals in prop::collection::vec((arb_duration(), 1u32..500), 0..12),
    ) {
        let start = Timestamp(1_600_000_000);
        let id = MemberId::from("m1");
        let mut ledger = SubscriptionLedger::default();
        ledger.add(SubscriptionRecord::new(id.clone(), "Basic", "1_month", 20.0, start)).unwrap();

        for (i, (duration, price)) in renewals.iter().enumerate() {
            let before = ledger.find(&id).unwrap().current_entry();
            let now = start.plus_days(i as i64 + 1);
            ledger.renew(&id, format!("plan-{i}"), *duration, f64::from(*price), now).unwrap();

            let record = ledger.find(&id).unwrap();
            prop_assert_eq!(record.history().len(), i + 1);
            prop_assert_eq!(&record.history()[0], &before);
            prop_assert_eq!(record.duration(), *duration);
            prop_assert!(record.expiry() > record.start());
        }
    }

    #[test]
    fn expiring_and_expired_are_disjoint(offsets in prop::collection::vec(-40i64..40, 1..20), days in 0i64..30) {
        let now = Timestamp(1_650_000_000);
        let records: Vec<SubscriptionRecord> = offsets
            .iter()
            .enumerate()
            .map(|(i, off)| SubscriptionRecord::new(format!("m{i}"), "Basic", "1_month", 1.0, now.plus_days(*off - 30)))
            .collect();
        let ledger = SubscriptionLedger::from_records(Default::default(), records);

        for record in ledger.expiring_within(days, now) {
            prop_assert!(!SubscriptionLedger::is_expired(record, now));
            prop_assert!(record.expiry() <= now.plus_days(days));
        }
    }
}
