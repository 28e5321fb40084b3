//! Reservation types.
//!
//! A [`Reservation`] is a persisted booking: who is staying, when, in which
//! category, at what price, and where it stands in the status and payment
//! lifecycles. A [`ReservationDraft`] is the same booking before the store
//! assigns it a key.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::CategoryId;
use crate::money::Money;
use crate::stay::StayDates;
use crate::unit::UnitId;

#[cfg(test)]
mod proptests;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Storage key of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wraps a raw storage key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw storage key.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-presentable booking reference, e.g. `BK12345678X7Q`.
///
/// # Examples
///
/// ```
/// use berth::BookingRef;
///
/// let reference: BookingRef = "BK12345678X7Q".parse().unwrap();
/// assert_eq!(reference.as_str(), "BK12345678X7Q");
///
/// assert!("bk-123".parse::<BookingRef>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingRef(String);

impl BookingRef {
    /// Shortest accepted reference.
    pub const MIN_LEN: usize = 6;
    /// Longest accepted reference.
    pub const MAX_LEN: usize = 32;

    /// Validates a reference.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is 6-32 uppercase ASCII letters or digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&value.len()) {
            return Err(ValidationError {
                field: "booking_ref".into(),
                message: format!(
                    "'{value}' must be {}-{} characters long",
                    Self::MIN_LEN,
                    Self::MAX_LEN
                ),
            });
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(ValidationError {
                field: "booking_ref".into(),
                message: format!("'{value}' may only contain uppercase letters and digits"),
            });
        }
        Ok(Self(value))
    }

    /// Wraps text produced by the reference generator.
    pub(crate) fn from_trusted(value: String) -> Self {
        debug_assert!(Self::new(value.clone()).is_ok());
        Self(value)
    }

    /// Returns the reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BookingRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for BookingRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookingRef> for String {
    fn from(reference: BookingRef) -> Self {
        reference.0
    }
}

/// Identifies a reservation by storage key or by booking reference.
///
/// Purely numeric input is read as a storage key.
///
/// # Examples
///
/// ```
/// use berth::{ReservationId, ReservationSelector};
///
/// let by_id: ReservationSelector = "42".parse().unwrap();
/// assert_eq!(by_id, ReservationSelector::Id(ReservationId::new(42)));
///
/// let by_ref: ReservationSelector = "BK12345678X7Q".parse().unwrap();
/// assert!(matches!(by_ref, ReservationSelector::Reference(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReservationSelector {
    /// Select by storage key.
    Id(ReservationId),
    /// Select by booking reference.
    Reference(BookingRef),
}

impl fmt::Display for ReservationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "reservation {id}"),
            Self::Reference(reference) => write!(f, "reservation {reference}"),
        }
    }
}

impl FromStr for ReservationSelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let id = s.parse::<i64>().map_err(|_| ValidationError {
                field: "reservation".into(),
                message: format!("'{s}' is not a valid reservation id"),
            })?;
            return Ok(Self::Id(ReservationId::new(id)));
        }
        BookingRef::new(s.to_uppercase()).map(Self::Reference)
    }
}

impl From<ReservationId> for ReservationSelector {
    fn from(id: ReservationId) -> Self {
        Self::Id(id)
    }
}

impl From<BookingRef> for ReservationSelector {
    fn from(reference: BookingRef) -> Self {
        Self::Reference(reference)
    }
}

/// Reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Awaiting payment.
    Pending,
    /// Paid and holding inventory.
    Confirmed,
    /// Withdrawn; no longer holds inventory.
    Cancelled,
    /// The stay took place.
    Completed,
}

impl ReservationStatus {
    /// Returns the lowercase name used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether a reservation in this status consumes inventory.
    #[must_use]
    pub const fn holds_inventory(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether no further status change is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{s}'"),
            }),
        }
    }
}

/// Payment status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet captured.
    #[default]
    Pending,
    /// Captured.
    Paid,
    /// Returned to the guest.
    Refunded,
}

impl PaymentStatus {
    /// Returns the lowercase name used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ValidationError {
                field: "payment_status".into(),
                message: format!("unknown payment status '{s}'"),
            }),
        }
    }
}

/// Guest contact details.
///
/// # Examples
///
/// ```
/// use berth::Guest;
///
/// let guest = Guest::new("Ada Lovelace", "ada@example.com", "+44 20 7946 0000").unwrap();
/// assert_eq!(guest.email(), "ada@example.com");
///
/// assert!(Guest::new("Ada", "not-an-email", "123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    name: String,
    email: String,
    phone: String,
}

impl Guest {
    /// Validates and trims guest contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is blank or the e-mail address is malformed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = required("guest_name", name.into())?;
        let email = required("guest_email", email.into())?;
        let phone = required("guest_phone", phone.into())?;

        if !email_regex().is_match(&email) {
            return Err(ValidationError {
                field: "guest_email".into(),
                message: format!("'{email}' is not a valid e-mail address"),
            });
        }

        Ok(Self { name, email, phone })
    }

    /// Returns the guest name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the e-mail address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}

/// Snapshot of an add-on (activity, extra) selected with the booking.
///
/// Prices are copied at booking time so later catalog edits do not change
/// what the guest agreed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Identifier in the add-on catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind of add-on, e.g. `activity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Price at booking time.
    pub price: Money,
}

/// A booking before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDraft {
    booking_ref: BookingRef,
    guest: Guest,
    stay: StayDates,
    guest_count: u32,
    category: CategoryId,
    total_price: Money,
    status: ReservationStatus,
    payment_status: PaymentStatus,
    special_requests: Option<String>,
    add_ons: Vec<AddOn>,
}

impl ReservationDraft {
    /// Starts a draft. The initial status follows from the payment status.
    #[must_use]
    pub fn builder(
        booking_ref: BookingRef,
        guest: Guest,
        stay: StayDates,
        category: CategoryId,
    ) -> ReservationDraftBuilder {
        ReservationDraftBuilder {
            booking_ref,
            guest,
            stay,
            category,
            guest_count: 1,
            total_price: Money::ZERO,
            status: None,
            payment_status: PaymentStatus::Pending,
            special_requests: None,
            add_ons: Vec::new(),
        }
    }

    /// Returns the booking reference.
    #[must_use]
    pub const fn booking_ref(&self) -> &BookingRef {
        &self.booking_ref
    }

    /// Replaces the booking reference after a collision.
    pub(crate) fn set_booking_ref(&mut self, booking_ref: BookingRef) {
        self.booking_ref = booking_ref;
    }

    /// Returns the guest.
    #[must_use]
    pub const fn guest(&self) -> &Guest {
        &self.guest
    }

    /// Returns the stay.
    #[must_use]
    pub const fn stay(&self) -> &StayDates {
        &self.stay
    }

    /// Returns the number of guests.
    #[must_use]
    pub const fn guest_count(&self) -> u32 {
        self.guest_count
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Returns the total price.
    #[must_use]
    pub const fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Returns the special requests.
    #[must_use]
    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    /// Returns the add-on snapshot.
    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }
}

/// Builder for [`ReservationDraft`].
#[derive(Debug)]
pub struct ReservationDraftBuilder {
    booking_ref: BookingRef,
    guest: Guest,
    stay: StayDates,
    category: CategoryId,
    guest_count: u32,
    total_price: Money,
    status: Option<ReservationStatus>,
    payment_status: PaymentStatus,
    special_requests: Option<String>,
    add_ons: Vec<AddOn>,
}

impl ReservationDraftBuilder {
    /// Sets the guest count.
    #[must_use]
    pub const fn guest_count(mut self, guests: u32) -> Self {
        self.guest_count = guests;
        self
    }

    /// Sets the total price.
    #[must_use]
    pub const fn total_price(mut self, price: Money) -> Self {
        self.total_price = price;
        self
    }

    /// Sets the payment status.
    #[must_use]
    pub const fn payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    /// Sets the status explicitly, used when reading stored rows.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the special requests. Blank text is dropped.
    #[must_use]
    pub fn special_requests(mut self, requests: Option<String>) -> Self {
        self.special_requests = requests
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        self
    }

    /// Sets the add-on snapshot.
    #[must_use]
    pub fn add_ons(mut self, add_ons: Vec<AddOn>) -> Self {
        self.add_ons = add_ons;
        self
    }

    /// Builds the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the guest count is zero, or if an explicit
    /// `confirmed` status is paired with an unpaid payment status.
    pub fn build(self) -> Result<ReservationDraft, ValidationError> {
        if self.guest_count == 0 {
            return Err(ValidationError {
                field: "guest_count".into(),
                message: "at least one guest is required".into(),
            });
        }

        let status = self
            .status
            .unwrap_or_else(|| crate::lifecycle::initial_status(self.payment_status));
        if status == ReservationStatus::Confirmed && self.payment_status != PaymentStatus::Paid {
            return Err(ValidationError {
                field: "status".into(),
                message: "a confirmed reservation must be paid".into(),
            });
        }

        Ok(ReservationDraft {
            booking_ref: self.booking_ref,
            guest: self.guest,
            stay: self.stay,
            guest_count: self.guest_count,
            category: self.category,
            total_price: self.total_price,
            status,
            payment_status: self.payment_status,
            special_requests: self.special_requests,
            add_ons: self.add_ons,
        })
    }
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    id: ReservationId,
    #[serde(flatten)]
    draft: ReservationDraft,
    unit: Option<UnitId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Assembles a reservation read back from storage.
    pub(crate) fn from_parts(
        id: ReservationId,
        draft: ReservationDraft,
        unit: Option<UnitId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            draft,
            unit,
            created_at,
            updated_at,
        }
    }

    /// Returns the storage key.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the booking reference.
    #[must_use]
    pub const fn booking_ref(&self) -> &BookingRef {
        &self.draft.booking_ref
    }

    /// Returns the guest.
    #[must_use]
    pub const fn guest(&self) -> &Guest {
        &self.draft.guest
    }

    /// Returns the stay.
    #[must_use]
    pub const fn stay(&self) -> &StayDates {
        &self.draft.stay
    }

    /// Returns the number of guests.
    #[must_use]
    pub const fn guest_count(&self) -> u32 {
        self.draft.guest_count
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.draft.category
    }

    /// Returns the total price.
    #[must_use]
    pub const fn total_price(&self) -> Money {
        self.draft.total_price
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.draft.status
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.draft.payment_status
    }

    /// Returns the bound unit, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    /// Returns the special requests.
    #[must_use]
    pub fn special_requests(&self) -> Option<&str> {
        self.draft.special_requests()
    }

    /// Returns the add-on snapshot.
    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        self.draft.add_ons()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether this reservation currently consumes inventory.
    #[must_use]
    pub const fn holds_inventory(&self) -> bool {
        self.draft.status.holds_inventory()
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
