//! Contact form payload and its validation rules.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum number of characters in a trimmed message.
pub const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Values submitted through the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Fields that are only required to be non-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Subject,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::Name => "name",
            RequiredField::Subject => "subject",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{field}` must not be empty")]
    EmptyField { field: RequiredField },
    #[error("email address must look like `local@domain.tld`")]
    InvalidEmailFormat,
    #[error("message must contain at least {min} characters")]
    MessageTooShort { min: usize },
}

impl ValidationError {
    /// Text shown in the form status area.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::EmptyField {
                field: RequiredField::Name,
            } => "Please enter your name.",
            ValidationError::EmptyField {
                field: RequiredField::Subject,
            } => "Please enter a subject.",
            ValidationError::InvalidEmailFormat => "Please enter a valid email address.",
            ValidationError::MessageTooShort { .. } => {
                "Please enter a message with at least 10 characters."
            }
        }
    }
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Check the rules in form order and report the first one that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: RequiredField::Name,
            });
        }

        if self.email.trim().is_empty() || !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmailFormat);
        }

        if self.subject.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: RequiredField::Subject,
            });
        }

        if self.message.trim().chars().count() < MIN_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooShort {
                min: MIN_MESSAGE_CHARS,
            });
        }

        Ok(())
    }
}

/// Accepts `local@domain.tld` shaped addresses without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
