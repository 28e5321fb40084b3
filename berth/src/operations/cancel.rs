//! Cancellation planning.

use crate::database::Database;
use crate::error::Result;
use crate::reservation::{ReservationSelector, ReservationStatus};

use super::plan::OperationPlan;
use super::status::{StatusOptions, StatusPlan};

/// Plans cancelling a reservation and releasing its unit.
pub struct CancelPlan {
    selector: ReservationSelector,
}

impl CancelPlan {
    /// Creates a new cancel plan.
    #[must_use]
    pub const fn new(selector: ReservationSelector) -> Self {
        Self { selector }
    }

    /// Builds the plan. Cancelling a cancelled reservation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown reservation and
    /// [`crate::Error::InvalidTransition`] for a completed one.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let options = StatusOptions::new(self.selector.clone(), ReservationStatus::Cancelled);
        let mut plan = StatusPlan::new(options).build_plan(db)?;
        plan.description = format!("Cancel {}", self.selector);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, draft, insert_draft, seed_category, stay};
    use crate::error::Error;
    use crate::operations::PlanExecutor;
    use crate::reservation::ReservationId;

    #[test]
    fn test_cancel_twice() {
        let mut db = create_test_database();
        seed_category(db.connection(), "standard", 120, 2);
        let id = insert_draft(db.connection(), &draft("BK00000001AAA", "standard", stay(25, 27)));
        let selector = ReservationSelector::Id(id);

        let plan = CancelPlan::new(selector.clone()).build_plan(&db).unwrap();
        assert_eq!(plan.description, format!("Cancel reservation {id}"));
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert_eq!(result.reservation.unwrap().status(), ReservationStatus::Cancelled);

        let again = CancelPlan::new(selector).build_plan(&db).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_cancel_unknown() {
        let db = create_test_database();
        let err = CancelPlan::new(ReservationSelector::Id(ReservationId::new(5)))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
