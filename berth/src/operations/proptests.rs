//! Property-based tests for the operations module.
//!
//! Random sequences of bookings and lifecycle calls are run through the
//! planner and executor; after every step the stored state must still
//! satisfy the booking invariants, whether the step succeeded or not.

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::config::Config;
use crate::database::test_util::{create_test_database, seed_category, seed_unit};
use crate::database::{Database, ReservationFilter};
use crate::operations::{
    AssignOptions, AssignPlan, BookingOptions, BookingPlan, CancelPlan, OperationPlan,
    PaymentOptions, PaymentPlan, PlanExecutor, StatusOptions, StatusPlan, UnbindPlan,
};
use crate::reservation::{PaymentStatus, Reservation, ReservationSelector, ReservationStatus};
use crate::Result;

const UNITS: u32 = 2;

#[derive(Debug, Clone)]
enum Step {
    Book { from: u32, nights: u32, paid: bool },
    Pay(usize),
    Refund(usize),
    Unpay(usize),
    Confirm(usize),
    Complete(usize),
    Cancel(usize),
    Assign(usize),
    Unbind(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let pick = 0usize..8;
    prop_oneof![
        3 => (1u32..=20, 1u32..=5, any::<bool>())
            .prop_map(|(from, nights, paid)| Step::Book { from, nights, paid }),
        1 => pick.clone().prop_map(Step::Pay),
        1 => pick.clone().prop_map(Step::Refund),
        1 => pick.clone().prop_map(Step::Unpay),
        1 => pick.clone().prop_map(Step::Confirm),
        1 => pick.clone().prop_map(Step::Complete),
        1 => pick.clone().prop_map(Step::Cancel),
        1 => pick.clone().prop_map(Step::Assign),
        1 => pick.prop_map(Step::Unbind),
    ]
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
}

fn plan_for(
    db: &Database,
    config: &Config,
    step: &Step,
    known: &[ReservationSelector],
) -> Option<Result<OperationPlan>> {
    let target = |i: &usize| known.get(i % known.len().max(1)).cloned();
    let plan = match step {
        Step::Book { from, nights, paid } => {
            let payment = if *paid { PaymentStatus::Paid } else { PaymentStatus::Pending };
            let options = BookingOptions::new(
                "Prop Guest",
                "prop@example.com",
                "555-0100",
                "standard".parse().unwrap(),
                day(*from),
                day(from + nights),
            )
            .with_payment_status(payment);
            BookingPlan::new(options, config).with_today(day(1)).build_plan(db)
        }
        Step::Pay(i) => payment(db, target(i)?, PaymentStatus::Paid),
        Step::Refund(i) => payment(db, target(i)?, PaymentStatus::Refunded),
        Step::Unpay(i) => payment(db, target(i)?, PaymentStatus::Pending),
        Step::Confirm(i) => status(db, target(i)?, ReservationStatus::Confirmed),
        Step::Complete(i) => status(db, target(i)?, ReservationStatus::Completed),
        Step::Cancel(i) => CancelPlan::new(target(i)?).build_plan(db),
        Step::Assign(i) => AssignPlan::new(AssignOptions::new(target(i)?, None)).build_plan(db),
        Step::Unbind(i) => UnbindPlan::new(target(i)?).build_plan(db),
    };
    Some(plan)
}

fn payment(db: &Database, selector: ReservationSelector, to: PaymentStatus) -> Result<OperationPlan> {
    PaymentPlan::new(PaymentOptions::new(selector, to)).build_plan(db)
}

fn status(db: &Database, selector: ReservationSelector, to: ReservationStatus) -> Result<OperationPlan> {
    StatusPlan::new(StatusOptions::new(selector, to)).build_plan(db)
}

fn check_invariants(all: &[Reservation]) -> std::result::Result<(), TestCaseError> {
    for r in all {
        if r.status() == ReservationStatus::Confirmed {
            prop_assert_eq!(r.payment_status(), PaymentStatus::Paid);
        }
        // Completed stays keep their unit as a record of where the guest slept
        if r.status() == ReservationStatus::Cancelled {
            prop_assert!(r.unit().is_none());
        }
    }

    for night in 1..=25 {
        let date = day(night);
        let holding: Vec<&Reservation> = all
            .iter()
            .filter(|r| r.holds_inventory())
            .filter(|r| r.stay().check_in_date() <= date && date < r.stay().check_out_date())
            .collect();
        prop_assert!(holding.len() <= UNITS as usize, "night {} overbooked", date);

        let mut units: Vec<_> = holding.iter().filter_map(|r| r.unit()).collect();
        let bound = units.len();
        units.sort();
        units.dedup();
        prop_assert_eq!(units.len(), bound, "unit double-bound on {}", date);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    // No sequence of operations breaks payment, capacity or binding rules
    #[test]
    fn lifecycle_sequences_keep_invariants(steps in prop::collection::vec(step_strategy(), 1..30)) {
        let mut db = create_test_database();
        seed_category(db.connection(), "standard", 120, UNITS);
        seed_unit(db.connection(), "standard", "101");
        seed_unit(db.connection(), "standard", "102");
        let config = Config::default();
        let mut known: Vec<ReservationSelector> = Vec::new();

        for step in &steps {
            let Some(plan) = plan_for(&db, &config, step, &known) else {
                continue;
            };
            let plan = match plan {
                Ok(plan) => plan,
                Err(err) => {
                    let expected = err.is_business_rule()
                        || matches!(err, crate::Error::Validation { .. });
                    prop_assert!(expected, "unexpected {:?}", err);
                    continue;
                }
            };

            match PlanExecutor::new(&mut db).with_config(&config).execute(&plan) {
                Ok(result) => {
                    if let (Step::Book { .. }, Some(created)) = (step, result.reservation) {
                        known.push(ReservationSelector::Id(created.id()));
                    }
                }
                Err(err) => prop_assert!(err.is_business_rule(), "unexpected {:?}", err),
            }

            let all = Database::list_reservations(db.connection(), &ReservationFilter::default())
                .unwrap();
            check_invariants(&all)?;
        }
    }

    // A plan built for a dry run never changes stored state
    #[test]
    fn dry_run_is_read_only(from in 1u32..=20, nights in 1u32..=5) {
        let mut db = create_test_database();
        seed_category(db.connection(), "standard", 120, UNITS);
        seed_unit(db.connection(), "standard", "101");
        let config = Config::default();

        let options = BookingOptions::new(
            "Prop Guest",
            "prop@example.com",
            "555-0100",
            "standard".parse().unwrap(),
            day(from),
            day(from + nights),
        );
        let plan = BookingPlan::new(options, &config)
            .with_today(day(1))
            .build_plan(&db)
            .unwrap();
        let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
        prop_assert!(result.dry_run);

        let all = Database::list_reservations(db.connection(), &ReservationFilter::default())
            .unwrap();
        prop_assert!(all.is_empty());
    }
}
