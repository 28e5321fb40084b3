//! The reservation engine facade.
//!
//! [`ReservationEngine`] bundles one database connection, the resolved
//! configuration and a notifier. Each call plans against the current state,
//! executes the plan in one immediate transaction, and hands any resulting
//! events to the notifier once the transaction has committed.
//!
//! Engines are cheap to open; give each worker thread or process its own.

use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::availability::{self, Availability, AvailabilityQuery};
use crate::catalog::{Category, CategoryId};
use crate::config::Config;
use crate::database::{Database, DatabaseConfig, ReservationFilter};
use crate::error::{Error, Result};
use crate::notify::{dispatch, LogNotifier, Notifier};
use crate::operations::{
    import_seed, AssignOptions, AssignPlan, BookingOptions, BookingPlan, CancelPlan,
    ExecutionResult, OperationPlan, PaymentOptions, PaymentPlan, PlanExecutor, SeedReport,
    StatusOptions, StatusPlan, UnbindPlan,
};
use crate::reservation::{PaymentStatus, Reservation, ReservationSelector, ReservationStatus};
use crate::unit::{NewUnit, Unit, UnitId, UnitStatus};

/// Entry point for every booking and inventory operation.
///
/// # Examples
///
/// ```no_run
/// use berth::config::ConfigBuilder;
/// use berth::database::DatabaseConfig;
/// use berth::engine::ReservationEngine;
/// use berth::{PaymentStatus, ReservationSelector};
///
/// let config = ConfigBuilder::new().build().unwrap();
/// let mut engine = ReservationEngine::open(
///     DatabaseConfig::new("/tmp/berth.db").with_busy_timeout(config.lock_wait()),
///     config,
/// )
/// .unwrap();
///
/// let selector: ReservationSelector = "BK12345678ABC".parse().unwrap();
/// let result = engine.update_payment_status(&selector, PaymentStatus::Paid).unwrap();
/// println!("{}", result.reservation.unwrap().status());
/// ```
pub struct ReservationEngine {
    db: Database,
    config: Config,
    notifier: Box<dyn Notifier>,
    today: Option<NaiveDate>,
    dry_run: bool,
}

impl ReservationEngine {
    /// Wraps an open database. Events go to a [`LogNotifier`].
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            notifier: Box::new(LogNotifier),
            today: None,
            dry_run: false,
        }
    }

    /// Opens the database and wraps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(db_config: DatabaseConfig, config: Config) -> Result<Self> {
        Ok(Self::new(Database::open(db_config)?, config))
    }

    /// Replaces the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fixes the day used to reject past check-ins.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Plans and reports every write without committing it.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// The underlying database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    fn run(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut executor = PlanExecutor::new(&mut self.db).with_config(&self.config);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(plan)?;

        if !result.events.is_empty() {
            let delivered = dispatch(self.notifier.as_ref(), &result.events);
            log::debug!("Delivered {delivered}/{} event(s)", result.events.len());
        }
        Ok(result)
    }

    // Availability

    /// Estimates free units of a category for a stay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty or inverted stay,
    /// [`Error::NotFound`] for an unknown category and
    /// [`Error::CapacityExceeded`] if the guests do not fit.
    pub fn check_availability(
        &self,
        category: &CategoryId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Availability> {
        let stay = self.config.stay_policy()?.stay(check_in, check_out)?;
        let query = AvailabilityQuery::new(category.clone(), stay, guests);
        availability::check(self.db.connection(), &query, self.config.inventory_source())
    }

    // Reservations

    /// Creates a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`], [`Error::NotFound`],
    /// [`Error::CapacityExceeded`], [`Error::NoInventory`] or
    /// [`Error::Conflict`] as the request demands, or
    /// [`Error::StoreUnavailable`] if the write lock cannot be taken in time.
    pub fn create_reservation(&mut self, options: BookingOptions) -> Result<ExecutionResult> {
        let mut planner = BookingPlan::new(options, &self.config);
        if let Some(today) = self.today {
            planner = planner.with_today(today);
        }
        let plan = planner.build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Records a payment status change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::InvalidTransition`].
    pub fn update_payment_status(
        &mut self,
        selector: &ReservationSelector,
        payment_status: PaymentStatus,
    ) -> Result<ExecutionResult> {
        let plan = PaymentPlan::new(PaymentOptions::new(selector.clone(), payment_status))
            .build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Moves a reservation to another status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::PaymentRequired`] or
    /// [`Error::InvalidTransition`].
    pub fn update_status(
        &mut self,
        selector: &ReservationSelector,
        status: ReservationStatus,
    ) -> Result<ExecutionResult> {
        let plan =
            StatusPlan::new(StatusOptions::new(selector.clone(), status)).build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Cancels a reservation and releases its unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::InvalidTransition`].
    pub fn cancel_reservation(&mut self, selector: &ReservationSelector) -> Result<ExecutionResult> {
        let plan = CancelPlan::new(selector.clone()).build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Binds a unit, or the first free one when `unit` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::Conflict`] or
    /// [`Error::NoInventory`].
    pub fn assign_unit(
        &mut self,
        selector: &ReservationSelector,
        unit: Option<UnitId>,
    ) -> Result<ExecutionResult> {
        let plan = AssignPlan::new(AssignOptions::new(selector.clone(), unit))
            .build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Clears a unit binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation.
    pub fn unbind_unit(&mut self, selector: &ReservationSelector) -> Result<ExecutionResult> {
        let plan = UnbindPlan::new(selector.clone()).build_plan(&self.db)?;
        self.run(&plan)
    }

    /// Loads a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it does not exist.
    pub fn get_reservation(&self, selector: &ReservationSelector) -> Result<Reservation> {
        Database::require_reservation(self.db.connection(), selector)
    }

    /// Lists reservations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        Database::list_reservations(self.db.connection(), filter)
    }

    // Catalog

    /// Loads a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it does not exist.
    pub fn get_category(&self, id: &CategoryId) -> Result<Category> {
        Database::require_category(self.db.connection(), id)
    }

    /// Lists categories by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        Database::list_categories(self.db.connection())
    }

    /// Creates or replaces a category. Returns `true` if it was new.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_category(&mut self, category: &Category) -> Result<bool> {
        let created = Database::upsert_category(self.db.connection(), category)?;
        log::info!(
            "{} category '{}'",
            if created { "Created" } else { "Updated" },
            category.id()
        );
        Ok(created)
    }

    /// Deletes a category nothing references.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown category and
    /// [`Error::Conflict`] while units or reservations reference it.
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<()> {
        let tx = self.db.begin_immediate()?;
        if !Database::delete_category(&tx, id)? {
            return Err(Error::not_found(format!("category '{id}'")));
        }
        tx.commit()?;
        log::info!("Deleted category '{id}'");
        Ok(())
    }

    /// Imports a catalog seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or imported.
    pub fn import_seed(&mut self, path: &Path) -> Result<SeedReport> {
        import_seed(&mut self.db, path)
    }

    // Units

    /// Loads a unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it does not exist.
    pub fn get_unit(&self, id: UnitId) -> Result<Unit> {
        Database::require_unit(self.db.connection(), id)
    }

    /// Lists units by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_units(&self, category: Option<&CategoryId>, active_only: bool) -> Result<Vec<Unit>> {
        Database::list_units(self.db.connection(), category, active_only)
    }

    /// Counts active units of a category that may take a new guest.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_available_units(&self, category: &CategoryId) -> Result<u32> {
        Database::count_assignable_units(self.db.connection(), category)
    }

    /// Registers a unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown category and
    /// [`Error::Conflict`] for a code already in use.
    pub fn add_unit(&mut self, unit: &NewUnit) -> Result<Unit> {
        let id = Database::insert_unit(self.db.connection(), unit)?;
        log::info!("Registered unit {} in '{}'", unit.code(), unit.category());
        self.get_unit(id)
    }

    /// Sets a unit's operational status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown unit.
    pub fn set_unit_status(&mut self, id: UnitId, status: UnitStatus) -> Result<Unit> {
        if !Database::set_unit_status(self.db.connection(), id, status)? {
            return Err(Error::not_found(format!("unit {id}")));
        }
        self.get_unit(id)
    }

    /// Takes a unit out of service. Existing bindings are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown unit.
    pub fn deactivate_unit(&mut self, id: UnitId) -> Result<Unit> {
        if !Database::set_unit_active(self.db.connection(), id, false)? {
            return Err(Error::not_found(format!("unit {id}")));
        }
        log::info!("Deactivated unit {id}");
        self.get_unit(id)
    }

    /// Marks a unit cleaned and available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown unit.
    pub fn mark_unit_cleaned(&mut self, id: UnitId) -> Result<Unit> {
        if !Database::mark_unit_cleaned(self.db.connection(), id, Utc::now())? {
            return Err(Error::not_found(format!("unit {id}")));
        }
        self.get_unit(id)
    }

    /// Deletes a unit no active reservation is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown unit and
    /// [`Error::Conflict`] while a pending or confirmed reservation holds it.
    pub fn delete_unit(&mut self, id: UnitId) -> Result<()> {
        let tx = self.db.begin_immediate()?;
        if !Database::delete_unit(&tx, id)? {
            return Err(Error::not_found(format!("unit {id}")));
        }
        tx.commit()?;
        log::info!("Deleted unit {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, seed_category, seed_unit};
    use crate::money::Money;
    use crate::notify::MockNotifier;
    use mockall::predicate::always;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn engine(notifier: MockNotifier) -> ReservationEngine {
        let db = create_test_database();
        seed_category(db.connection(), "standard", 120, 2);
        seed_unit(db.connection(), "standard", "101");
        seed_unit(db.connection(), "standard", "102");
        ReservationEngine::new(db, Config::default())
            .with_notifier(Box::new(notifier))
            .with_today(day(1))
    }

    fn booking(from: u32, to: u32) -> BookingOptions {
        BookingOptions::new(
            "Grace Hopper",
            "grace@example.com",
            "555-0199",
            "standard".parse().unwrap(),
            day(from),
            day(to),
        )
        .with_guests(2)
    }

    fn selector(result: &ExecutionResult) -> ReservationSelector {
        ReservationSelector::Id(result.reservation.as_ref().unwrap().id())
    }

    #[test]
    fn test_booking_notifies_after_commit() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_booking_created()
            .with(always())
            .times(1)
            .returning(|_| Ok(()));
        let mut engine = engine(notifier);

        let result = engine.create_reservation(booking(25, 27)).unwrap();
        let reservation = result.reservation.unwrap();
        assert_eq!(reservation.total_price(), Money::from_major(240));
        assert_eq!(reservation.status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_notifier_failure_does_not_roll_back() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify_booking_created()
            .returning(|_| Err(anyhow::anyhow!("smtp down")));
        let mut engine = engine(notifier);

        let result = engine.create_reservation(booking(25, 27)).unwrap();
        let stored = engine.get_reservation(&selector(&result)).unwrap();
        assert_eq!(stored.booking_ref(), result.reservation.unwrap().booking_ref());
    }

    #[test]
    fn test_full_lifecycle_requests_review_once() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_booking_created().returning(|_| Ok(()));
        notifier
            .expect_notify_review_requested()
            .times(1)
            .returning(|_| Ok(()));
        let mut engine = engine(notifier);

        let created = engine.create_reservation(booking(25, 27)).unwrap();
        let id = selector(&created);

        let err = engine
            .update_status(&id, ReservationStatus::Confirmed)
            .unwrap_err();
        assert!(matches!(err, Error::PaymentRequired { .. }));

        let paid = engine.update_payment_status(&id, PaymentStatus::Paid).unwrap();
        let paid = paid.reservation.unwrap();
        assert_eq!(paid.status(), ReservationStatus::Confirmed);
        assert!(paid.unit().is_some());

        engine.update_status(&id, ReservationStatus::Completed).unwrap();
        // Repeating the completion is a no-op and emits nothing.
        engine.update_status(&id, ReservationStatus::Completed).unwrap();
    }

    #[test]
    fn test_inventory_exhaustion() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_booking_created().returning(|_| Ok(()));
        let mut engine = engine(notifier);

        engine.create_reservation(booking(25, 27)).unwrap();
        engine.create_reservation(booking(26, 28)).unwrap();
        let err = engine.create_reservation(booking(26, 27)).unwrap_err();
        assert!(matches!(err, Error::NoInventory { .. }));

        // Back-to-back stays do not overlap.
        engine.create_reservation(booking(28, 30)).unwrap();

        let report = engine
            .check_availability(&"standard".parse().unwrap(), day(25), day(27), 2)
            .unwrap();
        assert_eq!(report.available_count, 0);
        assert_eq!(report.total_count, 2);
    }

    #[test]
    fn test_cancel_releases_inventory() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_booking_created().returning(|_| Ok(()));
        let mut engine = engine(notifier);

        let first = engine.create_reservation(booking(25, 27)).unwrap();
        engine.create_reservation(booking(25, 27)).unwrap();
        engine.cancel_reservation(&selector(&first)).unwrap();

        let report = engine
            .check_availability(&"standard".parse().unwrap(), day(25), day(27), 1)
            .unwrap();
        assert_eq!(report.available_count, 1);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let notifier = MockNotifier::new();
        let mut engine = engine(notifier).dry_run();

        let result = engine.create_reservation(booking(25, 27)).unwrap();
        assert!(result.dry_run);
        assert!(engine
            .list_reservations(&ReservationFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unit_administration() {
        let mut engine = engine(MockNotifier::new());
        let standard: CategoryId = "standard".parse().unwrap();

        let unit = engine
            .add_unit(&NewUnit::new(standard.clone(), "103").unwrap())
            .unwrap();
        assert_eq!(engine.count_available_units(&standard).unwrap(), 3);

        engine.set_unit_status(unit.id(), UnitStatus::Maintenance).unwrap();
        assert_eq!(engine.count_available_units(&standard).unwrap(), 2);

        let cleaned = engine.mark_unit_cleaned(unit.id()).unwrap();
        assert_eq!(cleaned.status(), UnitStatus::Available);

        let inactive = engine.deactivate_unit(unit.id()).unwrap();
        assert!(!inactive.is_active());
        assert_eq!(engine.list_units(Some(&standard), true).unwrap().len(), 2);
        assert_eq!(engine.list_units(Some(&standard), false).unwrap().len(), 3);

        engine.delete_unit(unit.id()).unwrap();
        assert!(engine.delete_unit(unit.id()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_bound_unit_conflicts() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_booking_created().returning(|_| Ok(()));
        let mut engine = engine(notifier);

        let created = engine
            .create_reservation(booking(25, 27).with_payment_status(PaymentStatus::Paid))
            .unwrap();
        let unit = created.reservation.unwrap().unit().unwrap();

        let err = engine.delete_unit(unit).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_category_administration() {
        let mut engine = engine(MockNotifier::new());
        let suite = Category::builder("suite".parse().unwrap(), "Suite")
            .nightly_price(Money::from_major(280))
            .max_occupancy(4)
            .build()
            .unwrap();

        assert!(engine.upsert_category(&suite).unwrap());
        assert!(!engine.upsert_category(&suite).unwrap());
        assert_eq!(engine.list_categories().unwrap().len(), 2);

        let err = engine.delete_category(&"standard".parse().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        engine.delete_category(suite.id()).unwrap();
        assert!(engine.get_category(suite.id()).unwrap_err().is_not_found());
    }
}
