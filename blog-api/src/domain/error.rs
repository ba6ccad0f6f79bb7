use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// Per-field validation messages, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub(crate) fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub(crate) fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(value)` when nothing was collected, `DomainError::Validation` otherwise.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, DomainError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {}", messages.join(" "))?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("password rejected by policy: {}", .0.join(" "))]
    WeakPassword(Vec<String>),

    #[error("{field} already exists")]
    AlreadyExists {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// Field-level view of the client-facing error kinds.
    pub(crate) fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors.clone()),
            DomainError::WeakPassword(violations) => {
                let mut errors = FieldErrors::new();
                for violation in violations {
                    errors.add("password", violation.clone());
                }
                Some(errors)
            }
            DomainError::AlreadyExists { field, message } => {
                Some(FieldErrors::single(field, *message))
            }
            DomainError::NotFound(_) | DomainError::Unexpected(_) => None,
        }
    }
}
