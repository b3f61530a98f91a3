use crate::models::ValidationError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCount(i64);

impl GuestCount {
    pub const fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw < 1 {
            Err(ValidationError::InvalidGuestCount)
        } else {
            Ok(Self(raw))
        }
    }

    /// Parses a submitted form value. Anything that isn't a whole number is
    /// rejected the same way as a count below one.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let count = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidGuestCount)?;
        Self::new(count)
    }

    pub const fn new_unchecked(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for GuestCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When a reservation begins. Always a real calendar date and time; text that
/// doesn't parse never becomes a `StartAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StartAt(NaiveDateTime);

impl StartAt {
    const FORMATS: [&'static str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();

        for format in Self::FORMATS {
            if let Ok(start_at) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self(start_at));
            }
        }
        if let Ok(start_at) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self(start_at.naive_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self(date.and_time(NaiveTime::MIN)));
        }

        Err(ValidationError::InvalidStartAt)
    }

    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Human rendering, e.g. `June 1st 2024, 3:00 pm`.
    pub fn to_display_string(&self) -> String {
        let day = self.0.day();
        format!(
            "{} {}{} {}",
            self.0.format("%B"),
            day,
            ordinal_suffix(day),
            self.0.format("%Y, %-I:%M %P"),
        )
    }

    /// The value an HTML `datetime-local` input expects.
    pub fn to_form_value(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M").to_string()
    }
}

impl From<NaiveDateTime> for StartAt {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// A booking held by a customer. The owning customer is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id: Option<i64>,
    customer_id: i64,
    num_guests: GuestCount,
    start_at: StartAt,
    notes: Option<String>,
}

impl Reservation {
    pub fn new(
        customer_id: i64,
        num_guests: i64,
        start_at: StartAt,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        let num_guests = GuestCount::new(num_guests)?;
        Ok(Self {
            id: None,
            customer_id,
            num_guests,
            start_at,
            notes,
        })
    }

    /// Rebuilds a stored reservation. Nothing is validated.
    pub const fn from_parts(
        id: i64,
        customer_id: i64,
        num_guests: GuestCount,
        start_at: StartAt,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Some(id),
            customer_id,
            num_guests,
            start_at,
            notes,
        }
    }

    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub const fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub const fn num_guests(&self) -> GuestCount {
        self.num_guests
    }

    pub fn set_num_guests(&mut self, num_guests: i64) -> Result<(), ValidationError> {
        self.num_guests = GuestCount::new(num_guests)?;
        Ok(())
    }

    pub const fn start_at(&self) -> StartAt {
        self.start_at
    }

    pub fn set_start_at(&mut self, start_at: StartAt) {
        self.start_at = start_at;
    }

    pub fn formatted_start_at(&self) -> String {
        self.start_at.to_display_string()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        GuestCount::new(self.num_guests.get()).map(|_| ())
    }
}

#[derive(Debug)]
pub struct FindReservationRequest {
    id: i64,
}

impl FindReservationRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindReservationError {
    #[error("No such reservation: {id}")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindReservationsError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
pub enum SaveReservationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("No such reservation: {id}")]
    NotFound { id: i64 },
    #[error("No such customer: {customer_id}")]
    CustomerNotFound { customer_id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}
