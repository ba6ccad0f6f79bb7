use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{DomainError, FieldErrors};
use super::fields::required_text;

pub(crate) const MAX_TAG_NAME_CHARS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Tag {
    pub(crate) id: Uuid,
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CreateTagRequest {
    pub(crate) name: Option<String>,
}

impl CreateTagRequest {
    /// Returns the normalized tag name.
    pub(crate) fn validate(self) -> Result<String, DomainError> {
        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", self.name, Some(MAX_TAG_NAME_CHARS));
        match name {
            Some(name) if errors.is_empty() => Ok(name),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

/// Exact-name filter for tag listing. Blank names impose no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagFilter {
    pub(crate) name: Option<String>,
}

impl TagFilter {
    pub(crate) fn from_query(name: Option<String>) -> Self {
        Self {
            name: name.filter(|name| !name.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateTagRequest, DomainError, TagFilter};

    #[test]
    fn validate_trims_name() {
        let req = CreateTagRequest {
            name: Some("  rust ".to_string()),
        };
        assert_eq!(req.validate().expect("must validate"), "rust");
    }

    #[test]
    fn validate_rejects_missing_and_long_names() {
        let err = CreateTagRequest::default()
            .validate()
            .expect_err("missing name must fail");
        assert_name_error(err, "This field is required.");

        let err = CreateTagRequest {
            name: Some("x".repeat(201)),
        }
        .validate()
        .expect_err("201 chars must fail");
        assert_name_error(err, "Ensure this field has no more than 200 characters.");
    }

    #[test]
    fn name_of_exactly_200_chars_is_accepted() {
        let req = CreateTagRequest {
            name: Some("x".repeat(200)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_filter_is_ignored() {
        assert_eq!(TagFilter::from_query(Some("  ".into())), TagFilter::default());
        assert_eq!(
            TagFilter::from_query(Some("rust".into())).name.as_deref(),
            Some("rust")
        );
    }

    fn assert_name_error(err: DomainError, expected: &str) {
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.get("name"), Some(&[expected.to_string()][..]))
            }
            other => panic!("expected DomainError::Validation, got {other:?}"),
        }
    }
}
