//! Booking events and the notification port.
//!
//! Events are produced by committed operations and handed to a
//! [`Notifier`] afterwards. Delivery is fire-and-forget: a failing notifier
//! is logged and never undoes the operation that produced the event.

use crate::reservation::Reservation;

/// Something observers may want to hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A reservation was created.
    BookingCreated(Reservation),
    /// A stay completed and the guest should be asked for a review.
    ReviewRequested(Reservation),
}

impl EngineEvent {
    /// The reservation the event concerns.
    #[must_use]
    pub const fn reservation(&self) -> &Reservation {
        match self {
            Self::BookingCreated(r) | Self::ReviewRequested(r) => r,
        }
    }

    /// Short event name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BookingCreated(_) => "booking-created",
            Self::ReviewRequested(_) => "review-requested",
        }
    }
}

/// Port for outbound notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    /// A reservation was created.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify_booking_created(&self, reservation: &Reservation) -> anyhow::Result<()>;

    /// A stay completed.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify_review_requested(&self, reservation: &Reservation) -> anyhow::Result<()>;
}

/// Notifier that writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_booking_created(&self, reservation: &Reservation) -> anyhow::Result<()> {
        log::info!(
            "Booking {} created for {} ({})",
            reservation.booking_ref(),
            reservation.guest().name(),
            reservation.status()
        );
        Ok(())
    }

    fn notify_review_requested(&self, reservation: &Reservation) -> anyhow::Result<()> {
        log::info!(
            "Review requested from {} for booking {}",
            reservation.guest().email(),
            reservation.booking_ref()
        );
        Ok(())
    }
}

/// Hands each event to the notifier, logging failures.
///
/// Returns the number of events delivered without error.
pub fn dispatch(notifier: &dyn Notifier, events: &[EngineEvent]) -> usize {
    let mut delivered = 0;
    for event in events {
        let result = match event {
            EngineEvent::BookingCreated(r) => notifier.notify_booking_created(r),
            EngineEvent::ReviewRequested(r) => notifier.notify_review_requested(r),
        };
        match result {
            Ok(()) => delivered += 1,
            Err(e) => log::warn!(
                "Failed to deliver {} for {}: {e:#}",
                event.name(),
                event.reservation().booking_ref()
            ),
        }
    }
    delivered
}
