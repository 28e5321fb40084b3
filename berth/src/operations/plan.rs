//! Plan types for reservation operations.
//!
//! A plan describes what an operation will do without doing it. Plans are
//! built from a snapshot read outside any transaction; the executor checks
//! every action again under the write lock.

use crate::reference::ReferenceGenerator;
use crate::reservation::{PaymentStatus, ReservationDraft, ReservationId, ReservationStatus};
use crate::unit::UnitId;

/// A single action to be taken during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a new reservation after re-checking availability.
    CreateReservation {
        /// The reservation to insert.
        draft: ReservationDraft,
        /// Mints a replacement reference if the drafted one is taken.
        references: ReferenceGenerator,
    },

    /// Move a reservation to a new status.
    SetStatus {
        /// Target reservation.
        reservation: ReservationId,
        /// Requested status.
        status: ReservationStatus,
    },

    /// Record a payment status change.
    SetPaymentStatus {
        /// Target reservation.
        reservation: ReservationId,
        /// Requested payment status.
        payment_status: PaymentStatus,
    },

    /// Bind a unit, or pick a free one when `unit` is `None`.
    AssignUnit {
        /// Target reservation.
        reservation: ReservationId,
        /// Requested unit.
        unit: Option<UnitId>,
    },

    /// Clear a reservation's unit binding.
    UnbindUnit(ReservationId),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation { draft, .. } => format!(
                "Create {} reservation {} for {} ({} to {})",
                draft.status(),
                draft.booking_ref(),
                draft.category(),
                draft.stay().check_in_date(),
                draft.stay().check_out_date()
            ),
            Self::SetStatus {
                reservation,
                status,
            } => format!("Set status of reservation {reservation} to {status}"),
            Self::SetPaymentStatus {
                reservation,
                payment_status,
            } => format!("Set payment of reservation {reservation} to {payment_status}"),
            Self::AssignUnit {
                reservation,
                unit: Some(unit),
            } => format!("Bind unit {unit} to reservation {reservation}"),
            Self::AssignUnit {
                reservation,
                unit: None,
            } => format!("Bind a free unit to reservation {reservation}"),
            Self::UnbindUnit(reservation) => {
                format!("Clear unit binding of reservation {reservation}")
            }
        }
    }

    /// The existing reservation this action targets, if any.
    #[must_use]
    pub const fn target(&self) -> Option<ReservationId> {
        match self {
            Self::CreateReservation { .. } => None,
            Self::SetStatus { reservation, .. }
            | Self::SetPaymentStatus { reservation, .. }
            | Self::AssignUnit { reservation, .. }
            | Self::UnbindUnit(reservation) => Some(*reservation),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Cancel booking BK12345678ABC");
    /// assert_eq!(plan.description, "Cancel booking BK12345678ABC");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::operations::{OperationPlan, PlanAction};
    /// use berth::ReservationId;
    ///
    /// let plan = OperationPlan::new("Unbind")
    ///     .add_action(PlanAction::UnbindUnit(ReservationId::new(7)));
    ///
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
