use auth::UnknownRoleError;
use thiserror::Error;

/// Rejected path or claim id
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Applies to first and last names alike
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Phone number is required")]
    Empty,

    #[error("Phone number contains invalid characters")]
    InvalidCharacters,
}

/// Failures surfaced by the user service and repository
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] PhoneNumberError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] UnknownRoleError),

    #[error("No user with id {0}")]
    NotFound(String),

    #[error("Email is already registered: {0}")]
    EmailAlreadyExists(String),

    #[error("Storage failure: {0}")]
    DatabaseError(String),
}
