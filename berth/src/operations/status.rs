//! Status and payment transition planning.
//!
//! Plans are checked against the reservation as it is now, so an illegal
//! transition fails before anything is written. The executor applies the
//! state machine again under the write lock.

use crate::database::Database;
use crate::error::Result;
use crate::lifecycle::{apply_payment, apply_status, Effect};
use crate::reservation::{PaymentStatus, ReservationSelector, ReservationStatus};

use super::plan::{OperationPlan, PlanAction};

/// Options for a status change.
#[derive(Debug, Clone)]
pub struct StatusOptions {
    /// Reservation to change.
    pub selector: ReservationSelector,
    /// Requested status.
    pub status: ReservationStatus,
}

impl StatusOptions {
    /// Creates status change options.
    #[must_use]
    pub const fn new(selector: ReservationSelector, status: ReservationStatus) -> Self {
        Self { selector, status }
    }
}

/// Plans a status change.
pub struct StatusPlan {
    options: StatusOptions,
}

impl StatusPlan {
    /// Creates a new status plan.
    #[must_use]
    pub const fn new(options: StatusOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// A request for the current status produces an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown reservation,
    /// [`crate::Error::PaymentRequired`] when confirming an unpaid
    /// reservation, or [`crate::Error::InvalidTransition`] for a move the
    /// state machine forbids.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let current = Database::require_reservation(db.connection(), &self.options.selector)?;
        let target = self.options.status;

        let mut plan = OperationPlan::new(format!(
            "Move {} from {} to {target}",
            current.booking_ref(),
            current.status()
        ));

        let outcome = apply_status(
            current.status(),
            current.payment_status(),
            target,
            current.booking_ref().as_str(),
        )?;
        if outcome.is_noop(current.status(), current.payment_status()) {
            return Ok(plan.add_warning(format!("{} is already {target}", current.booking_ref())));
        }

        if outcome.effects.contains(&Effect::ReleaseUnit) && current.unit().is_some() {
            plan = plan.add_warning(format!(
                "{} will release its unit binding",
                current.booking_ref()
            ));
        }

        Ok(plan.add_action(PlanAction::SetStatus {
            reservation: current.id(),
            status: target,
        }))
    }
}

/// Options for a payment status change.
#[derive(Debug, Clone)]
pub struct PaymentOptions {
    /// Reservation to change.
    pub selector: ReservationSelector,
    /// Requested payment status.
    pub payment_status: PaymentStatus,
}

impl PaymentOptions {
    /// Creates payment change options.
    #[must_use]
    pub const fn new(selector: ReservationSelector, payment_status: PaymentStatus) -> Self {
        Self {
            selector,
            payment_status,
        }
    }
}

/// Plans a payment status change.
pub struct PaymentPlan {
    options: PaymentOptions,
}

impl PaymentPlan {
    /// Creates a new payment plan.
    #[must_use]
    pub const fn new(options: PaymentOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown reservation or
    /// [`crate::Error::InvalidTransition`] when moving a confirmed
    /// reservation's payment away from `paid`.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let current = Database::require_reservation(db.connection(), &self.options.selector)?;
        let target = self.options.payment_status;

        let mut plan = OperationPlan::new(format!(
            "Record payment {target} for {}",
            current.booking_ref()
        ));

        let outcome = apply_payment(current.status(), current.payment_status(), target)?;
        if outcome.is_noop(current.status(), current.payment_status()) {
            return Ok(plan.add_warning(format!(
                "{} payment is already {target}",
                current.booking_ref()
            )));
        }

        if outcome.status != current.status() {
            plan = plan.add_warning(format!(
                "{} will be {}",
                current.booking_ref(),
                outcome.status
            ));
        } else if current.status() == ReservationStatus::Cancelled && target == PaymentStatus::Paid {
            plan = plan.add_warning(format!(
                "{} stays cancelled; payment does not reopen it",
                current.booking_ref()
            ));
        }

        Ok(plan.add_action(PlanAction::SetPaymentStatus {
            reservation: current.id(),
            payment_status: target,
        }))
    }
}
