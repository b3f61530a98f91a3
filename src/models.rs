mod customer;
mod reservation;

pub use customer::{
    Customer, FindCustomerError, FindCustomerRequest, FindCustomersError, PhoneNumber,
    SaveCustomerError,
};
pub use reservation::{
    FindReservationError, FindReservationRequest, FindReservationsError, GuestCount, Reservation,
    SaveReservationError, StartAt,
};

use thiserror::Error;

/// Raised when a field is assigned a value outside its contract. The entity is
/// left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number must be empty or at least {min} characters long", min = PhoneNumber::MIN_LENGTH)]
    InvalidPhone,
    #[error("Number of guests must be at least 1")]
    InvalidGuestCount,
    #[error("Start date is not a valid date")]
    InvalidStartAt,
}
