//! Booking creation planning.
//!
//! Planning validates the request, resolves the category, estimates
//! availability, prices the stay, and mints a reference. The executor
//! repeats the availability check under the write lock before inserting.

use chrono::{Local, NaiveDate};

use crate::availability;
use crate::catalog::CategoryId;
use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::pricing;
use crate::reservation::{AddOn, Guest, PaymentStatus, ReservationDraft};

use super::plan::{OperationPlan, PlanAction};

/// A booking request as received from a caller.
#[derive(Debug, Clone)]
pub struct BookingOptions {
    /// Guest name.
    pub guest_name: String,
    /// Guest e-mail address.
    pub guest_email: String,
    /// Guest phone number.
    pub guest_phone: String,
    /// Requested category.
    pub category: CategoryId,
    /// Arrival day.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Number of guests.
    pub guests: u32,
    /// Total agreed elsewhere; trusted as given.
    pub total_price: Option<Money>,
    /// Payment status at booking time.
    pub payment_status: PaymentStatus,
    /// Free-text requests from the guest.
    pub special_requests: Option<String>,
    /// Selected add-ons.
    pub add_ons: Vec<AddOn>,
}

impl BookingOptions {
    /// Creates a request for one guest, unpaid, priced from the catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::operations::BookingOptions;
    /// use berth::CategoryId;
    /// use chrono::NaiveDate;
    ///
    /// let options = BookingOptions::new(
    ///     "Ada Lovelace",
    ///     "ada@example.com",
    ///     "555-0100",
    ///     CategoryId::new("standard").unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
    /// )
    /// .with_guests(2);
    /// assert_eq!(options.guests, 2);
    /// ```
    #[must_use]
    pub fn new(
        guest_name: impl Into<String>,
        guest_email: impl Into<String>,
        guest_phone: impl Into<String>,
        category: CategoryId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Self {
        Self {
            guest_name: guest_name.into(),
            guest_email: guest_email.into(),
            guest_phone: guest_phone.into(),
            category,
            check_in,
            check_out,
            guests: 1,
            total_price: None,
            payment_status: PaymentStatus::Pending,
            special_requests: None,
            add_ons: Vec::new(),
        }
    }

    /// Sets the guest count.
    #[must_use]
    pub const fn with_guests(mut self, guests: u32) -> Self {
        self.guests = guests;
        self
    }

    /// Sets a caller-supplied total price.
    #[must_use]
    pub const fn with_total_price(mut self, price: Option<Money>) -> Self {
        self.total_price = price;
        self
    }

    /// Sets the payment status.
    #[must_use]
    pub const fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    /// Sets the special requests.
    #[must_use]
    pub fn with_special_requests(mut self, requests: Option<String>) -> Self {
        self.special_requests = requests;
        self
    }

    /// Sets the add-ons.
    #[must_use]
    pub fn with_add_ons(mut self, add_ons: Vec<AddOn>) -> Self {
        self.add_ons = add_ons;
        self
    }
}

/// A booking plan generator.
pub struct BookingPlan<'a> {
    options: BookingOptions,
    config: &'a Config,
    today: Option<NaiveDate>,
}

impl<'a> BookingPlan<'a> {
    /// Creates a new booking plan with the given options and config.
    #[must_use]
    pub const fn new(options: BookingOptions, config: &'a Config) -> Self {
        Self {
            options,
            config,
            today: None,
        }
    }

    /// Overrides the day used to reject past check-ins (default: local today).
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Builds an operation plan for this booking request.
    ///
    /// This method does NOT modify the database.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for missing or malformed guest details, a
    ///   guest count outside the configured bounds, a past check-in, or a
    ///   check-out not after check-in
    /// - [`Error::NotFound`] for an unknown category
    /// - [`Error::CapacityExceeded`] if the guests do not fit
    /// - [`Error::NoInventory`] if no unit is free
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use berth::operations::{BookingOptions, BookingPlan};
    /// use berth::config::ConfigBuilder;
    /// use berth::{CategoryId, Database, DatabaseConfig};
    /// use chrono::NaiveDate;
    ///
    /// let config = ConfigBuilder::new().build().unwrap();
    /// let db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
    /// let options = BookingOptions::new(
    ///     "Ada Lovelace",
    ///     "ada@example.com",
    ///     "555-0100",
    ///     CategoryId::new("standard").unwrap(),
    ///     NaiveDate::from_ymd_opt(2030, 12, 25).unwrap(),
    ///     NaiveDate::from_ymd_opt(2030, 12, 27).unwrap(),
    /// );
    ///
    /// let plan = BookingPlan::new(options, &config).build_plan(&db).unwrap();
    /// ```
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let options = &self.options;

        // Step 1: Validate the request itself
        let guest = Guest::new(
            options.guest_name.as_str(),
            options.guest_email.as_str(),
            options.guest_phone.as_str(),
        )?;
        self.validate_guest_count()?;
        self.validate_dates()?;
        let stay = self
            .config
            .stay_policy()?
            .stay(options.check_in, options.check_out)?;

        // Step 2: Resolve the category and check occupancy
        let category = Database::require_category(conn, &options.category)?;

        // Step 3: Estimate availability; the executor re-checks under lock
        let report = availability::evaluate(
            conn,
            &category,
            &stay,
            options.guests,
            self.config.inventory_source(),
        )?;
        if !report.is_available() {
            return Err(Error::NoInventory {
                category: category.id().to_string(),
                check_in: options.check_in,
                check_out: options.check_out,
            });
        }

        // Step 4: Price and reference
        let total = pricing::quote(category.nightly_price(), &stay, options.total_price)?;
        let references = self.config.reference_generator()?;
        let draft = ReservationDraft::builder(
            references.generate(),
            guest,
            stay,
            category.id().clone(),
        )
        .guest_count(options.guests)
        .total_price(total)
        .payment_status(options.payment_status)
        .special_requests(options.special_requests.clone())
        .add_ons(options.add_ons.clone())
        .build()?;

        let mut plan = OperationPlan::new(format!(
            "Book {} for {} ({} to {})",
            category.id(),
            draft.guest().name(),
            options.check_in,
            options.check_out
        ));

        if let Some(supplied) = options.total_price {
            let listed = pricing::stay_total(category.nightly_price(), &stay)?;
            if supplied != listed {
                plan = plan.add_warning(format!(
                    "Supplied total {supplied} differs from the listed {listed} for {} night(s)",
                    stay.nights()
                ));
            }
        }

        Ok(plan.add_action(PlanAction::CreateReservation { draft, references }))
    }

    fn validate_guest_count(&self) -> Result<()> {
        let (min, max) = self.config.guest_bounds();
        let guests = self.options.guests;
        if guests < min || guests > max {
            return Err(Error::Validation {
                field: "guest_count".into(),
                message: format!("{guests} guest(s) requested, allowed range is {min}-{max}"),
            });
        }
        Ok(())
    }

    fn validate_dates(&self) -> Result<()> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let (check_in, check_out) = (self.options.check_in, self.options.check_out);

        if check_in < today {
            return Err(Error::Validation {
                field: "check_in".into(),
                message: format!("check-in {check_in} is in the past"),
            });
        }
        if check_out <= check_in {
            return Err(Error::Validation {
                field: "check_out".into(),
                message: format!("check-out {check_out} must be after check-in {check_in}"),
            });
        }
        Ok(())
    }
}
