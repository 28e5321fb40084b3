//! Unit binding planning.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::ReservationSelector;
use crate::unit::UnitId;

use super::plan::{OperationPlan, PlanAction};

/// Options for binding a unit to a reservation.
#[derive(Debug, Clone)]
pub struct AssignOptions {
    /// Reservation to bind.
    pub selector: ReservationSelector,
    /// Unit to bind; `None` picks the first free unit of the category.
    pub unit: Option<UnitId>,
}

impl AssignOptions {
    /// Creates assign options.
    #[must_use]
    pub const fn new(selector: ReservationSelector, unit: Option<UnitId>) -> Self {
        Self { selector, unit }
    }
}

/// Plans a unit binding.
pub struct AssignPlan {
    options: AssignOptions,
}

impl AssignPlan {
    /// Creates a new assign plan.
    #[must_use]
    pub const fn new(options: AssignOptions) -> Self {
        Self { options }
    }

    /// Builds the plan.
    ///
    /// Binding the unit already bound produces an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation or unit, and
    /// [`Error::Conflict`] if the reservation is closed or already holds a
    /// different unit.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let conn = db.connection();
        let current = Database::require_reservation(conn, &self.options.selector)?;
        let mut plan = OperationPlan::new(format!("Bind a unit to {}", current.booking_ref()));

        if !current.status().holds_inventory() {
            return Err(Error::conflict(format!(
                "{} is {} and cannot hold a unit",
                current.booking_ref(),
                current.status()
            )));
        }

        if let Some(unit) = self.options.unit {
            Database::require_unit(conn, unit)?;
        }

        match (self.options.unit, current.unit()) {
            (Some(requested), Some(bound)) if requested == bound => {
                return Ok(plan.add_warning(format!(
                    "{} already holds unit {bound}",
                    current.booking_ref()
                )));
            }
            (None, Some(bound)) => {
                return Ok(plan.add_warning(format!(
                    "{} already holds unit {bound}",
                    current.booking_ref()
                )));
            }
            (Some(_), Some(bound)) => {
                return Err(Error::conflict(format!(
                    "{} is already bound to unit {bound}; unbind it first",
                    current.booking_ref()
                )));
            }
            _ => {}
        }

        plan = plan.add_action(PlanAction::AssignUnit {
            reservation: current.id(),
            unit: self.options.unit,
        });
        Ok(plan)
    }
}

/// Plans clearing a unit binding.
pub struct UnbindPlan {
    selector: ReservationSelector,
}

impl UnbindPlan {
    /// Creates a new unbind plan.
    #[must_use]
    pub const fn new(selector: ReservationSelector) -> Self {
        Self { selector }
    }

    /// Builds the plan. A reservation without a unit produces an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let current = Database::require_reservation(db.connection(), &self.selector)?;
        let plan = OperationPlan::new(format!("Unbind unit from {}", current.booking_ref()));

        if current.unit().is_none() {
            return Ok(plan.add_warning(format!("{} holds no unit", current.booking_ref())));
        }
        Ok(plan.add_action(PlanAction::UnbindUnit(current.id())))
    }
}
