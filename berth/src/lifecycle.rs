//! The reservation state machine.
//!
//! Status moves `pending -> confirmed -> completed`, with `cancelled`
//! reachable from either active state. Payment moves independently, except
//! that capturing payment on a pending reservation confirms it, and nothing
//! may leave a reservation confirmed without being paid.
//!
//! The functions here are pure: they compute the next state and the side
//! effects the caller must carry out, without touching storage.

use crate::error::{Error, Result};
use crate::reservation::{PaymentStatus, ReservationStatus};

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The reservation just became confirmed; a unit may be auto-assigned.
    AutoAssign,
    /// The stay completed; ask the guest for a review.
    RequestReview,
    /// The reservation was cancelled; drop its unit binding.
    ReleaseUnit,
}

/// State after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Resulting status.
    pub status: ReservationStatus,
    /// Resulting payment status.
    pub payment_status: PaymentStatus,
    /// Effects to carry out, in order.
    pub effects: Vec<Effect>,
}

impl Outcome {
    const fn unchanged(status: ReservationStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
            effects: Vec::new(),
        }
    }

    /// Whether the transition changed nothing.
    #[must_use]
    pub fn is_noop(&self, status: ReservationStatus, payment_status: PaymentStatus) -> bool {
        self.status == status && self.payment_status == payment_status && self.effects.is_empty()
    }
}

/// Status a new reservation starts in.
///
/// # Examples
///
/// ```
/// use berth::lifecycle::initial_status;
/// use berth::{PaymentStatus, ReservationStatus};
///
/// assert_eq!(initial_status(PaymentStatus::Paid), ReservationStatus::Confirmed);
/// assert_eq!(initial_status(PaymentStatus::Pending), ReservationStatus::Pending);
/// ```
#[must_use]
pub const fn initial_status(payment_status: PaymentStatus) -> ReservationStatus {
    match payment_status {
        PaymentStatus::Paid => ReservationStatus::Confirmed,
        PaymentStatus::Pending | PaymentStatus::Refunded => ReservationStatus::Pending,
    }
}

fn invalid(from: impl ToString, to: impl ToString, reason: &str) -> Error {
    Error::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
        reason: reason.to_string(),
    }
}

/// Applies a status change.
///
/// Requesting the current status is a no-op.
///
/// # Errors
///
/// - [`Error::PaymentRequired`] when confirming an unpaid reservation
/// - [`Error::InvalidTransition`] for any move the state machine forbids
///
/// # Examples
///
/// ```
/// use berth::lifecycle::{apply_status, Effect};
/// use berth::{PaymentStatus, ReservationStatus};
///
/// let outcome = apply_status(
///     ReservationStatus::Confirmed,
///     PaymentStatus::Paid,
///     ReservationStatus::Completed,
///     "BK12345678ABC",
/// )
/// .unwrap();
/// assert_eq!(outcome.effects, vec![Effect::RequestReview]);
///
/// let err = apply_status(
///     ReservationStatus::Pending,
///     PaymentStatus::Pending,
///     ReservationStatus::Confirmed,
///     "BK12345678ABC",
/// );
/// assert!(err.is_err());
/// ```
pub fn apply_status(
    status: ReservationStatus,
    payment_status: PaymentStatus,
    target: ReservationStatus,
    reference: &str,
) -> Result<Outcome> {
    use ReservationStatus::{Cancelled, Completed, Confirmed, Pending};

    if status == target {
        return Ok(Outcome::unchanged(status, payment_status));
    }
    if status.is_terminal() {
        return Err(invalid(status, target, "the reservation is already closed"));
    }

    let effects = match (status, target) {
        (Pending, Confirmed) => {
            if payment_status != PaymentStatus::Paid {
                return Err(Error::PaymentRequired {
                    reference: reference.to_string(),
                });
            }
            vec![Effect::AutoAssign]
        }
        (Confirmed, Completed) => vec![Effect::RequestReview],
        (Pending | Confirmed, Cancelled) => vec![Effect::ReleaseUnit],
        (Pending, Completed) => {
            return Err(invalid(status, target, "only confirmed stays can be completed"));
        }
        (Confirmed, Pending) => {
            return Err(invalid(status, target, "a confirmed reservation cannot be reopened"));
        }
        _ => return Err(invalid(status, target, "transition not allowed")),
    };

    Ok(Outcome {
        status: target,
        payment_status,
        effects,
    })
}

/// Applies a payment status change.
///
/// Capturing payment on a pending reservation confirms it; on any other
/// status the reservation status is left alone.
///
/// # Errors
///
/// Returns [`Error::InvalidTransition`] when moving a confirmed reservation's
/// payment away from `paid`; it has to be cancelled first.
///
/// # Examples
///
/// ```
/// use berth::lifecycle::apply_payment;
/// use berth::{PaymentStatus, ReservationStatus};
///
/// let outcome = apply_payment(
///     ReservationStatus::Cancelled,
///     PaymentStatus::Pending,
///     PaymentStatus::Paid,
/// )
/// .unwrap();
/// assert_eq!(outcome.status, ReservationStatus::Cancelled);
/// ```
pub fn apply_payment(
    status: ReservationStatus,
    payment_status: PaymentStatus,
    target: PaymentStatus,
) -> Result<Outcome> {
    if payment_status == target {
        return Ok(Outcome::unchanged(status, payment_status));
    }

    match (status, target) {
        (ReservationStatus::Pending, PaymentStatus::Paid) => Ok(Outcome {
            status: ReservationStatus::Confirmed,
            payment_status: target,
            effects: vec![Effect::AutoAssign],
        }),
        (ReservationStatus::Confirmed, PaymentStatus::Pending | PaymentStatus::Refunded) => {
            Err(invalid(
                payment_status,
                target,
                "cancel the confirmed reservation before changing its payment",
            ))
        }
        _ => Ok(Outcome {
            status,
            payment_status: target,
            effects: Vec::new(),
        }),
    }
}
