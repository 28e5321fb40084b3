//! Plan execution engine.
//!
//! The executor applies a plan inside one `BEGIN IMMEDIATE` transaction.
//! Every action re-reads what it depends on after the write lock is held,
//! so a plan built from a stale snapshot cannot overbook a category or
//! double-bind a unit. Any failure rolls the whole plan back.

use chrono::Utc;
use rusqlite::Connection;

use crate::availability;
use crate::config::{Config, InventorySource};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::lifecycle::{apply_payment, apply_status, Effect, Outcome};
use crate::notify::EngineEvent;
use crate::reference::ReferenceGenerator;
use crate::reservation::{
    Reservation, ReservationDraft, ReservationId, ReservationSelector, ReservationStatus,
};
use crate::unit::UnitId;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan and from execution.
    pub warnings: Vec<String>,

    /// The reservation as committed. `None` for dry runs.
    pub reservation: Option<Reservation>,

    /// Events to hand to the notifier. Only produced by committed plans.
    pub events: Vec<EngineEvent>,
}

impl ExecutionResult {
    fn dry_run(plan: &OperationPlan) -> Self {
        Self {
            success: true,
            dry_run: true,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: None,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    inventory_source: InventorySource,
    auto_assign_units: bool,
}

/// State gathered while executing one plan.
#[derive(Default)]
struct Run {
    target: Option<ReservationId>,
    created: bool,
    review_requested: bool,
    actions_taken: Vec<String>,
    warnings: Vec<String>,
}

/// Executes operation plans against the database.
///
/// # Examples
///
/// ```no_run
/// use berth::operations::{PlanExecutor, StatusOptions, StatusPlan};
/// use berth::config::ConfigBuilder;
/// use berth::{Database, DatabaseConfig, ReservationSelector, ReservationStatus};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
/// let config = ConfigBuilder::new().build().unwrap();
/// let selector: ReservationSelector = "BK12345678ABC".parse().unwrap();
///
/// let options = StatusOptions::new(selector, ReservationStatus::Completed);
/// let plan = StatusPlan::new(options).build_plan(&db).unwrap();
///
/// let result = PlanExecutor::new(&mut db)
///     .with_config(&config)
///     .execute(&plan)
///     .unwrap();
/// assert!(result.success);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    settings: Settings,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor using the built-in defaults.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            settings: Settings {
                inventory_source: InventorySource::default(),
                auto_assign_units: true,
            },
            dry_run: false,
        }
    }

    /// Takes the inventory source and auto-assignment switch from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.settings = Settings {
            inventory_source: config.inventory_source(),
            auto_assign_units: config.auto_assign_units(),
        };
        self
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode the plan is reported but the database is not touched.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an action; nothing is committed in
    /// that case. Lock timeouts surface as [`Error::StoreUnavailable`].
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::dry_run(plan));
        }

        let settings = self.settings;
        let tx = self.db.begin_immediate()?;
        let mut run = Run {
            warnings: plan.warnings.clone(),
            ..Run::default()
        };

        for action in &plan.actions {
            execute_action(&tx, settings, action, &mut run)?;
        }

        let reservation = match run.target {
            Some(id) => Some(load(&tx, id)?),
            None => None,
        };
        tx.commit()?;

        let mut events = Vec::new();
        if let Some(ref r) = reservation {
            if run.created {
                events.push(EngineEvent::BookingCreated(r.clone()));
            }
            if run.review_requested {
                events.push(EngineEvent::ReviewRequested(r.clone()));
            }
        }

        for warning in &run.warnings {
            log::warn!("{warning}");
        }

        Ok(ExecutionResult {
            success: true,
            dry_run: false,
            actions_taken: run.actions_taken,
            warnings: run.warnings,
            reservation,
            events,
        })
    }
}

fn execute_action(
    conn: &Connection,
    settings: Settings,
    action: &PlanAction,
    run: &mut Run,
) -> Result<()> {
    match action {
        PlanAction::CreateReservation { draft, references } => {
            let id = create_reservation(conn, settings, draft, references)?;
            run.target = Some(id);
            run.created = true;
            run.actions_taken.push(action.description());

            if draft.status() == ReservationStatus::Confirmed && settings.auto_assign_units {
                let reservation = load(conn, id)?;
                auto_assign(conn, &reservation, run)?;
            }
        }
        PlanAction::SetStatus {
            reservation,
            status,
        } => {
            let current = load(conn, *reservation)?;
            let outcome = apply_status(
                current.status(),
                current.payment_status(),
                *status,
                current.booking_ref().as_str(),
            )?;
            run.target = Some(current.id());
            apply_outcome(conn, settings, &current, &outcome, action, run)?;
        }
        PlanAction::SetPaymentStatus {
            reservation,
            payment_status,
        } => {
            let current = load(conn, *reservation)?;
            let outcome = apply_payment(current.status(), current.payment_status(), *payment_status)?;
            run.target = Some(current.id());
            apply_outcome(conn, settings, &current, &outcome, action, run)?;
        }
        PlanAction::AssignUnit { reservation, unit } => {
            let current = load(conn, *reservation)?;
            run.target = Some(current.id());
            if assign_unit(conn, &current, *unit)? {
                run.actions_taken.push(action.description());
            }
        }
        PlanAction::UnbindUnit(reservation) => {
            let current = load(conn, *reservation)?;
            run.target = Some(current.id());
            if current.unit().is_some() {
                Database::set_unit_binding(conn, current.id(), None, Utc::now())?;
                run.actions_taken.push(action.description());
            }
        }
    }
    Ok(())
}

fn load(conn: &Connection, id: ReservationId) -> Result<Reservation> {
    Database::require_reservation(conn, &ReservationSelector::Id(id))
}

/// Re-checks availability and inserts, minting one replacement reference
/// on collision.
fn create_reservation(
    conn: &Connection,
    settings: Settings,
    draft: &ReservationDraft,
    references: &ReferenceGenerator,
) -> Result<ReservationId> {
    let category = Database::require_category(conn, draft.category())?;
    let report = availability::evaluate(
        conn,
        &category,
        draft.stay(),
        draft.guest_count(),
        settings.inventory_source,
    )?;
    if !report.is_available() {
        return Err(Error::NoInventory {
            category: category.id().to_string(),
            check_in: draft.stay().check_in_date(),
            check_out: draft.stay().check_out_date(),
        });
    }

    let now = Utc::now();
    if let Some(id) = Database::insert_reservation(conn, draft, now)? {
        return Ok(id);
    }

    let mut retry = draft.clone();
    retry.set_booking_ref(references.generate());
    log::debug!(
        "Booking reference {} taken, retrying as {}",
        draft.booking_ref(),
        retry.booking_ref()
    );

    Database::insert_reservation(conn, &retry, now)?.ok_or_else(|| {
        Error::conflict(format!(
            "booking references {} and {} are both taken",
            draft.booking_ref(),
            retry.booking_ref()
        ))
    })
}

fn apply_outcome(
    conn: &Connection,
    settings: Settings,
    current: &Reservation,
    outcome: &Outcome,
    action: &PlanAction,
    run: &mut Run,
) -> Result<()> {
    if outcome.is_noop(current.status(), current.payment_status()) {
        log::debug!("{} is already in the requested state", current.booking_ref());
        return Ok(());
    }

    Database::update_reservation_state(
        conn,
        current.id(),
        outcome.status,
        outcome.payment_status,
        Utc::now(),
    )?;
    run.actions_taken.push(action.description());

    for effect in &outcome.effects {
        match effect {
            Effect::AutoAssign => {
                if settings.auto_assign_units && current.unit().is_none() {
                    let updated = load(conn, current.id())?;
                    auto_assign(conn, &updated, run)?;
                }
            }
            Effect::RequestReview => run.review_requested = true,
            Effect::ReleaseUnit => {
                if let Some(unit) = current.unit() {
                    Database::set_unit_binding(conn, current.id(), None, Utc::now())?;
                    run.actions_taken
                        .push(format!("Release unit {unit} from reservation {}", current.id()));
                }
            }
        }
    }

    Ok(())
}

/// Binds the first free unit, recording a warning when none is left.
fn auto_assign(conn: &Connection, reservation: &Reservation, run: &mut Run) -> Result<()> {
    match Database::find_free_unit(
        conn,
        reservation.category(),
        reservation.stay(),
        reservation.id(),
    )? {
        Some(unit) => {
            Database::set_unit_binding(conn, reservation.id(), Some(unit), Utc::now())?;
            run.actions_taken
                .push(format!("Bind unit {unit} to reservation {}", reservation.id()));
        }
        None => run.warnings.push(format!(
            "No free '{}' unit to bind to {}; assign one manually",
            reservation.category(),
            reservation.booking_ref()
        )),
    }
    Ok(())
}

/// Binds `unit` (or a free unit) to the reservation.
///
/// Returns `false` when the binding was already in place.
fn assign_unit(conn: &Connection, reservation: &Reservation, unit: Option<UnitId>) -> Result<bool> {
    if !reservation.status().holds_inventory() {
        return Err(Error::conflict(format!(
            "{} is {} and cannot hold a unit",
            reservation.booking_ref(),
            reservation.status()
        )));
    }

    let unit = match (unit, reservation.unit()) {
        (Some(requested), Some(bound)) if requested == bound => return Ok(false),
        (None, Some(_)) => return Ok(false),
        (Some(_), Some(bound)) => {
            return Err(Error::conflict(format!(
                "{} is already bound to unit {bound}; unbind it first",
                reservation.booking_ref()
            )));
        }
        (Some(requested), None) => {
            check_unit(conn, reservation, requested)?;
            requested
        }
        (None, None) => Database::find_free_unit(
            conn,
            reservation.category(),
            reservation.stay(),
            reservation.id(),
        )?
        .ok_or_else(|| Error::NoInventory {
            category: reservation.category().to_string(),
            check_in: reservation.stay().check_in_date(),
            check_out: reservation.stay().check_out_date(),
        })?,
    };

    Database::set_unit_binding(conn, reservation.id(), Some(unit), Utc::now())?;
    Ok(true)
}

fn check_unit(conn: &Connection, reservation: &Reservation, unit_id: UnitId) -> Result<()> {
    let unit = Database::require_unit(conn, unit_id)?;

    if unit.category() != reservation.category() {
        return Err(Error::conflict(format!(
            "unit {} belongs to '{}', not '{}'",
            unit.code(),
            unit.category(),
            reservation.category()
        )));
    }

    if !unit.is_active() {
        return Err(Error::conflict(format!("unit {} is deactivated", unit.code())));
    }

    if !unit.is_assignable() {
        return Err(Error::conflict(format!(
            "unit {} is {} and cannot take a booking",
            unit.code(),
            unit.status()
        )));
    }

    if let Some(other) =
        Database::unit_binding_conflict(conn, unit_id, reservation.stay(), reservation.id())?
    {
        return Err(Error::conflict(format!(
            "unit {} is already bound to overlapping reservation {other}",
            unit.code()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, draft, insert_draft, seed_category, seed_unit, stay,
    };
    use crate::money::Money;
    use crate::reservation::{BookingRef, PaymentStatus};
    use crate::unit::UnitStatus;

    fn paid_draft(reference: &str, from: u32, to: u32) -> ReservationDraft {
        let pending = draft(reference, "standard", stay(from, to));
        ReservationDraft::builder(
            pending.booking_ref().clone(),
            pending.guest().clone(),
            *pending.stay(),
            pending.category().clone(),
        )
        .total_price(Money::from_major(240))
        .payment_status(PaymentStatus::Paid)
        .status(ReservationStatus::Confirmed)
        .build()
        .unwrap()
    }

    fn create(draft: ReservationDraft) -> OperationPlan {
        OperationPlan::new("Create").add_action(PlanAction::CreateReservation {
            draft,
            references: ReferenceGenerator::default(),
        })
    }

    fn setup(units: &[&str]) -> Database {
        let db = create_test_database();
        seed_category(db.connection(), "standard", 120, 4);
        for code in units {
            seed_unit(db.connection(), "standard", code);
        }
        db
    }

    #[test]
    fn test_create_pending_reservation() {
        let mut db = setup(&["101"]);
        let plan = create(draft("BK00000001AAA", "standard", stay(25, 27)));

        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(result.success);
        assert!(!result.dry_run);

        let reservation = result.reservation.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);
        assert_eq!(reservation.unit(), None);
        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], EngineEvent::BookingCreated(_)));
    }

    #[test]
    fn test_confirmed_booking_auto_assigns() {
        let mut db = setup(&["102", "101"]);
        let result = PlanExecutor::new(&mut db)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();

        let reservation = result.reservation.unwrap();
        let unit = Database::require_unit(db.connection(), reservation.unit().unwrap()).unwrap();
        assert_eq!(unit.code(), "101");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_auto_assign_disabled_by_config() {
        let mut db = setup(&["101"]);
        let config: Config =
            serde_yaml::from_str("booking:\n  auto_assign_units: false\n").unwrap();

        let result = PlanExecutor::new(&mut db)
            .with_config(&config)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();
        assert_eq!(result.reservation.unwrap().unit(), None);
    }

    #[test]
    fn test_auto_assign_shortfall_is_a_warning() {
        let mut db = create_test_database();
        seed_category(db.connection(), "standard", 120, 4);

        let config: Config = serde_yaml::from_str("inventory_source: catalog\n").unwrap();
        let result = PlanExecutor::new(&mut db)
            .with_config(&config)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();

        assert_eq!(result.reservation.unwrap().status(), ReservationStatus::Confirmed);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_create_rechecks_inventory() {
        let mut db = setup(&["101"]);
        insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));

        let err = PlanExecutor::new(&mut db)
            .execute(&create(draft("BK00000002AAA", "standard", stay(26, 28))))
            .unwrap_err();
        assert!(matches!(err, Error::NoInventory { .. }));

        let filter = crate::database::ReservationFilter::default();
        let all = Database::list_reservations(db.connection(), &filter).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_reference_collision_retries_once() {
        let mut db = setup(&["101", "102"]);
        insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(1, 3)));

        let result = PlanExecutor::new(&mut db)
            .execute(&create(draft("BK00000001AAA", "standard", stay(25, 27))))
            .unwrap();
        let reservation = result.reservation.unwrap();
        assert_ne!(reservation.booking_ref().as_str(), "BK00000001AAA");
        assert!(reservation.booking_ref().as_str().starts_with("BK"));
    }

    #[test]
    fn test_pay_auto_confirms_and_binds() {
        let mut db = setup(&["101"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));

        let plan = OperationPlan::new("Pay").add_action(PlanAction::SetPaymentStatus {
            reservation: id,
            payment_status: PaymentStatus::Paid,
        });
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let reservation = result.reservation.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
        assert_eq!(reservation.payment_status(), PaymentStatus::Paid);
        assert!(reservation.unit().is_some());
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_confirm_without_payment_rolls_back() {
        let mut db = setup(&["101"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));

        let plan = OperationPlan::new("Confirm").add_action(PlanAction::SetStatus {
            reservation: id,
            status: ReservationStatus::Confirmed,
        });
        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(matches!(err, Error::PaymentRequired { .. }));

        let stored = load(db.connection(), id).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_complete_requests_review() {
        let mut db = setup(&["101"]);
        let created = PlanExecutor::new(&mut db)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();
        let id = created.reservation.unwrap().id();

        let plan = OperationPlan::new("Complete").add_action(PlanAction::SetStatus {
            reservation: id,
            status: ReservationStatus::Completed,
        });
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], EngineEvent::ReviewRequested(_)));
    }

    #[test]
    fn test_completed_stay_keeps_unit_without_holding_inventory() {
        let mut db = setup(&["101"]);
        let created = PlanExecutor::new(&mut db)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();
        let reservation = created.reservation.unwrap();
        let unit = reservation.unit().unwrap();

        let plan = OperationPlan::new("Complete").add_action(PlanAction::SetStatus {
            reservation: reservation.id(),
            status: ReservationStatus::Completed,
        });
        let completed = PlanExecutor::new(&mut db).execute(&plan).unwrap().reservation.unwrap();
        assert_eq!(completed.status(), ReservationStatus::Completed);
        assert_eq!(completed.unit(), Some(unit));

        // The same unit is free for a new booking over those nights
        let again = PlanExecutor::new(&mut db)
            .execute(&create(paid_draft("BK00000002AAA", 25, 27)))
            .unwrap();
        assert_eq!(again.reservation.unwrap().unit(), Some(unit));
    }

    #[test]
    fn test_cancel_releases_unit_but_keeps_its_status() {
        let mut db = setup(&["101"]);
        let created = PlanExecutor::new(&mut db)
            .execute(&create(paid_draft("BK00000001AAA", 25, 27)))
            .unwrap();
        let reservation = created.reservation.unwrap();
        let unit = reservation.unit().unwrap();
        Database::set_unit_status(db.connection(), unit, UnitStatus::Occupied).unwrap();

        let plan = OperationPlan::new("Cancel").add_action(PlanAction::SetStatus {
            reservation: reservation.id(),
            status: ReservationStatus::Cancelled,
        });
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let cancelled = result.reservation.unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
        assert_eq!(cancelled.unit(), None);
        let stored = Database::require_unit(db.connection(), unit).unwrap();
        assert_eq!(stored.status(), UnitStatus::Occupied);
    }

    #[test]
    fn test_same_status_is_noop() {
        let mut db = setup(&["101"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));

        let plan = OperationPlan::new("Noop").add_action(PlanAction::SetStatus {
            reservation: id,
            status: ReservationStatus::Pending,
        });
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(result.actions_taken.is_empty());
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_assign_unit_rules() {
        let mut db = setup(&["101", "102"]);
        seed_category(db.connection(), "suite", 300, 1);
        let suite_unit = seed_unit(db.connection(), "suite", "S1");
        let first = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));
        let second =
            insert_draft(db.connection(), &draft("BK00000002AAA", "standard", stay(26, 28)));
        let unit = Database::get_unit_by_code(db.connection(), "101")
            .unwrap()
            .unwrap()
            .id();

        let assign = |reservation, unit| {
            OperationPlan::new("Assign").add_action(PlanAction::AssignUnit { reservation, unit })
        };

        let result = PlanExecutor::new(&mut db)
            .execute(&assign(first, Some(unit)))
            .unwrap();
        assert_eq!(result.actions_taken.len(), 1);

        // Same unit again is idempotent
        let result = PlanExecutor::new(&mut db)
            .execute(&assign(first, Some(unit)))
            .unwrap();
        assert!(result.actions_taken.is_empty());
        assert_eq!(result.reservation.unwrap().unit(), Some(unit));

        // Overlapping reservation cannot take the same unit
        let err = PlanExecutor::new(&mut db)
            .execute(&assign(second, Some(unit)))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        // Unit from another category
        let err = PlanExecutor::new(&mut db)
            .execute(&assign(second, Some(suite_unit)))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        // Auto-pick skips the bound unit
        let result = PlanExecutor::new(&mut db)
            .execute(&assign(second, None))
            .unwrap();
        let picked = result.reservation.unwrap().unit().unwrap();
        assert_ne!(picked, unit);

        // A different unit needs an unbind first
        let err = PlanExecutor::new(&mut db)
            .execute(&assign(second, Some(unit)))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_assign_skips_units_out_of_service() {
        let mut db = setup(&["101", "102"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));
        let unit = |code| {
            Database::get_unit_by_code(db.connection(), code)
                .unwrap()
                .unwrap()
                .id()
        };
        let (first, second) = (unit("101"), unit("102"));
        Database::set_unit_status(db.connection(), first, UnitStatus::Maintenance).unwrap();
        Database::set_unit_status(db.connection(), second, UnitStatus::Cleaning).unwrap();

        let assign = |unit| {
            OperationPlan::new("Assign").add_action(PlanAction::AssignUnit {
                reservation: id,
                unit: Some(unit),
            })
        };

        let err = PlanExecutor::new(&mut db).execute(&assign(first)).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        Database::set_unit_status(db.connection(), first, UnitStatus::Occupied).unwrap();
        let err = PlanExecutor::new(&mut db).execute(&assign(first)).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        // Cleaning units may still be booked
        let result = PlanExecutor::new(&mut db).execute(&assign(second)).unwrap();
        assert_eq!(result.reservation.unwrap().unit(), Some(second));
    }

    #[test]
    fn test_assign_to_cancelled_rejected() {
        let mut db = setup(&["101"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));
        Database::update_reservation_state(
            db.connection(),
            id,
            ReservationStatus::Cancelled,
            PaymentStatus::Pending,
            Utc::now(),
        )
        .unwrap();

        let plan = OperationPlan::new("Assign").add_action(PlanAction::AssignUnit {
            reservation: id,
            unit: None,
        });
        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_unbind_is_idempotent() {
        let mut db = setup(&["101"]);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));
        let plan = OperationPlan::new("Unbind").add_action(PlanAction::UnbindUnit(id));

        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(result.actions_taken.is_empty());
    }

    #[test]
    fn test_dry_run_does_not_modify_database() {
        let mut db = setup(&["101"]);
        let plan = create(draft("BK00000001AAA", "standard", stay(25, 27)));

        let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.actions_taken.len(), 1);
        assert!(result.reservation.is_none());

        let reference = BookingRef::new("BK00000001AAA").unwrap();
        assert!(Database::get_reservation_by_ref(db.connection(), &reference)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_reservation() {
        let mut db = setup(&[]);
        let plan = OperationPlan::new("Unbind").add_action(PlanAction::UnbindUnit(ReservationId::new(42)));
        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(err.is_not_found());
    }
}
