//! Property-based tests for the reservation lifecycle.

use crate::lifecycle::{apply_payment, apply_status};
use crate::reservation::{BookingRef, PaymentStatus, ReservationStatus};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Status(ReservationStatus),
    Payment(PaymentStatus),
}

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop_oneof![
        Just(ReservationStatus::Pending),
        Just(ReservationStatus::Confirmed),
        Just(ReservationStatus::Cancelled),
        Just(ReservationStatus::Completed),
    ]
}

fn payment_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Paid),
        Just(PaymentStatus::Refunded),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        status_strategy().prop_map(Step::Status),
        payment_strategy().prop_map(Step::Payment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Whatever sequence of requests arrives, an accepted state is never
    // confirmed-but-unpaid, and cancelled never comes back.
    #[test]
    fn lifecycle_history_keeps_invariants(
        initial_payment in payment_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..20)
    ) {
        let mut status = crate::lifecycle::initial_status(initial_payment);
        let mut payment = initial_payment;
        let mut was_cancelled = false;

        for step in steps {
            let result = match step {
                Step::Status(target) => apply_status(status, payment, target, "BK00000000AAA"),
                Step::Payment(target) => apply_payment(status, payment, target),
            };
            if let Ok(outcome) = result {
                status = outcome.status;
                payment = outcome.payment_status;
            }

            prop_assert!(status != ReservationStatus::Confirmed || payment == PaymentStatus::Paid);
            if was_cancelled {
                prop_assert_eq!(status, ReservationStatus::Cancelled);
            }
            was_cancelled |= status == ReservationStatus::Cancelled;
        }
    }

    // Terminal statuses reject every other status.
    #[test]
    fn terminal_statuses_reject_changes(
        payment in payment_strategy(),
        target in status_strategy()
    ) {
        for terminal in [ReservationStatus::Cancelled, ReservationStatus::Completed] {
            let result = apply_status(terminal, payment, target, "BK00000000AAA");
            if target == terminal {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
        }
    }

    // Any uppercase alphanumeric string of valid length is a booking reference.
    #[test]
    fn booking_ref_accepts_uppercase_alnum(value in "[A-Z0-9]{6,32}") {
        let reference = BookingRef::new(value.clone()).unwrap();
        prop_assert_eq!(reference.as_str(), value.as_str());
    }

    #[test]
    fn booking_ref_rejects_lowercase(value in "[a-z]{6,32}") {
        prop_assert!(BookingRef::new(value).is_err());
    }
}
