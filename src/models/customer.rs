use crate::models::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const MIN_LENGTH: usize = 10;

    /// Accepts the empty string (no phone on file) or anything at least
    /// [`Self::MIN_LENGTH`] characters long. The format is not checked.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let len = raw.chars().count();
        if len > 0 && len < Self::MIN_LENGTH {
            Err(ValidationError::InvalidPhone)
        } else {
            Ok(Self(raw.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer of the restaurant. `id` is `None` until the first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    phone: PhoneNumber,
    notes: Option<String>,
}

impl Customer {
    pub fn new(
        first_name: &str,
        last_name: &str,
        phone: &str,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        let phone = PhoneNumber::new(phone)?;
        Ok(Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone,
            notes,
        })
    }

    /// Rebuilds a stored customer. Nothing is validated.
    pub const fn from_parts(
        id: i64,
        first_name: String,
        last_name: String,
        phone: PhoneNumber,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Some(id),
            first_name,
            last_name,
            phone,
            notes,
        }
    }

    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, first_name: &str) {
        self.first_name = first_name.into();
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, last_name: &str) {
        self.last_name = last_name.into();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub const fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn set_phone(&mut self, phone: &str) -> Result<(), ValidationError> {
        self.phone = PhoneNumber::new(phone)?;
        Ok(())
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Re-applies the field contracts. Needed before persisting a customer that
    /// was decoded from storage rather than built through [`Customer::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        PhoneNumber::new(self.phone.as_str()).map(|_| ())
    }
}

#[derive(Debug)]
pub struct FindCustomerRequest {
    id: i64,
}

impl FindCustomerRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindCustomerError {
    #[error("No such customer: {id}")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindCustomersError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
pub enum SaveCustomerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("No such customer: {id}")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}
