use validator::ValidateLength;

use super::error::{BLANK, FieldErrors, REQUIRED};

/// Trims a required text field and records its problems under `field`.
pub(crate) fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_chars: Option<u64>,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => checked_text(errors, field, &value, max_chars),
    }
}

/// Like [`required_text`], but absence is not an error.
pub(crate) fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_chars: Option<u64>,
) -> Option<String> {
    value.and_then(|value| checked_text(errors, field, &value, max_chars))
}

fn checked_text(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    max_chars: Option<u64>,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if let Some(max) = max_chars
        && !value.validate_length(None, Some(max), None)
    {
        errors.add(field, too_long(max));
        return None;
    }
    Some(value.to_string())
}

pub(crate) fn too_long(max: u64) -> String {
    format!("Ensure this field has no more than {max} characters.")
}
