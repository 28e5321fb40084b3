#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # berth
//!
//! A reservation and inventory allocation engine for lodging.
//!
//! Guests book a room *category* for a stay; the engine checks that a unit
//! of that category is free for every night, prices the stay, mints a
//! booking reference, and later binds a concrete unit. The check and the
//! write happen in one serialized transaction, so concurrent bookings can
//! never push a category past its unit count.
//!
//! ## Core Types
//!
//! - [`Category`] and [`Unit`]: the catalog and the physical inventory
//! - [`StayDates`] and [`StayPolicy`]: date-only requests normalized to
//!   check-in and check-out clock times
//! - [`Reservation`], [`ReservationStatus`] and [`PaymentStatus`]: bookings
//!   and their lifecycle
//! - [`ReservationEngine`]: the facade every caller goes through
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use berth::{Money, StayPolicy};
//! use chrono::NaiveDate;
//!
//! let stay = StayPolicy::default()
//!     .stay(
//!         NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
//!     )
//!     .unwrap();
//! assert_eq!(stay.nights(), 2);
//!
//! let total = berth::pricing::stay_total(Money::from_major(120), &stay).unwrap();
//! assert_eq!(total, Money::from_major(240));
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod money;
pub mod notify;
pub mod operations;
pub mod pricing;
pub mod reference;
pub mod reservation;
pub mod stay;
pub mod unit;

// Re-export key types at crate root for convenience
pub use availability::{Availability, AvailabilityQuery};
pub use catalog::{Category, CategoryBuilder, CategoryId};
pub use config::{Config, ConfigBuilder, InventorySource};
pub use database::{Database, DatabaseConfig, ReservationFilter};
pub use engine::ReservationEngine;
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use money::Money;
pub use notify::{EngineEvent, LogNotifier, Notifier};
pub use operations::{
    BookingOptions, BookingPlan, ExecutionResult, OperationPlan, PlanAction, PlanExecutor,
};
pub use reference::ReferenceGenerator;
pub use reservation::{
    AddOn, BookingRef, Guest, PaymentStatus, Reservation, ReservationDraft, ReservationId,
    ReservationSelector, ReservationStatus, ValidationError,
};
pub use stay::{StayDates, StayPolicy};
pub use unit::{NewUnit, Unit, UnitId, UnitStatus};
