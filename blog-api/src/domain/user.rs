use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use super::error::{BLANK, DomainError, FieldErrors, REQUIRED};
use super::fields::{optional_text, required_text};
use super::password_policy::PasswordPolicy;

pub(crate) const MAX_USERNAME_CHARS: u64 = 150;
pub(crate) const MAX_NAME_CHARS: u64 = 150;
pub(crate) const MAX_EMAIL_CHARS: u64 = 254;

pub(crate) const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub(crate) const EMAIL_TAKEN: &str = "A user with this email already exists.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SignupRequest {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
}

/// Signup data that passed field and password-policy validation.
#[derive(Debug, Clone)]
pub(crate) struct SignupForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

impl SignupRequest {
    pub(crate) fn validate(self, policy: &PasswordPolicy) -> Result<SignupForm, DomainError> {
        let mut errors = FieldErrors::new();

        let username = required_text(
            &mut errors,
            "username",
            self.username,
            Some(MAX_USERNAME_CHARS),
        )
        .filter(|username| {
            let valid = username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c));
            if !valid {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            }
            valid
        });

        let email = required_text(&mut errors, "email", self.email, Some(MAX_EMAIL_CHARS))
            .map(normalize_email)
            .filter(|email| {
                let valid = email.validate_email();
                if !valid {
                    errors.add("email", "Enter a valid email address.");
                }
                valid
            });

        let first_name = optional_text(
            &mut errors,
            "first_name",
            self.first_name,
            Some(MAX_NAME_CHARS),
        )
        .unwrap_or_default();
        let last_name =
            optional_text(&mut errors, "last_name", self.last_name, Some(MAX_NAME_CHARS))
                .unwrap_or_default();

        // passwords are never trimmed
        let password = match self.password {
            None => {
                errors.add("password", REQUIRED);
                None
            }
            Some(password) if password.is_empty() => {
                errors.add("password", BLANK);
                None
            }
            Some(password) => {
                let attributes = [
                    ("username", username.as_deref().unwrap_or_default()),
                    ("email address", email.as_deref().unwrap_or_default()),
                    ("first name", first_name.as_str()),
                    ("last name", last_name.as_str()),
                ];
                let violations = policy.check(&password, &attributes);
                if violations.is_empty() {
                    Some(password)
                } else if errors.is_empty() {
                    return Err(DomainError::WeakPassword(violations));
                } else {
                    for violation in violations {
                        errors.add("password", violation);
                    }
                    None
                }
            }
        };

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(SignupForm {
                username,
                password,
                email,
                first_name,
                last_name,
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

/// Lowercases the domain part only; the local part is case-sensitive.
fn normalize_email(email: String) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email,
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainError, SignupRequest, normalize_email};
    use crate::domain::password_policy::PasswordPolicy;

    fn valid_request() -> SignupRequest {
        SignupRequest {
            username: Some("  valid_user ".to_string()),
            password: Some("very-secure-password".to_string()),
            email: Some("  VALID@Example.COM ".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    #[test]
    fn validate_normalizes_username_and_email() {
        let form = valid_request()
            .validate(&PasswordPolicy::default())
            .expect("must validate");

        assert_eq!(form.username, "valid_user");
        assert_eq!(form.email, "VALID@example.com");
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.last_name, "");
    }

    #[test]
    fn email_domain_is_lowercased_but_local_part_kept() {
        assert_eq!(normalize_email("Alice@Example.COM".into()), "Alice@example.com");
        assert_eq!(normalize_email("a@b@EXAMPLE.org".into()), "a@b@example.org");
        assert_eq!(normalize_email("no-at-sign".into()), "no-at-sign");
    }

    #[test]
    fn validate_requires_username_email_and_password() {
        let err = SignupRequest::default()
            .validate(&PasswordPolicy::default())
            .expect_err("empty signup must fail");

        let DomainError::Validation(errors) = err else {
            panic!("expected DomainError::Validation");
        };
        for field in ["username", "email", "password"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
        assert!(errors.get("first_name").is_none());
    }

    #[test]
    fn validate_rejects_bad_username_characters_and_email() {
        let req = SignupRequest {
            username: Some("bad name!".to_string()),
            email: Some("not-an-email".to_string()),
            ..valid_request()
        };

        let DomainError::Validation(errors) = req
            .validate(&PasswordPolicy::default())
            .expect_err("must fail")
        else {
            panic!("expected DomainError::Validation");
        };
        assert!(errors.get("username").is_some());
        assert_eq!(
            errors.get("email"),
            Some(&["Enter a valid email address.".to_string()][..])
        );
    }

    #[test]
    fn weak_password_alone_is_a_policy_error() {
        let req = SignupRequest {
            password: Some("12345".to_string()),
            ..valid_request()
        };

        let err = req
            .validate(&PasswordPolicy::default())
            .expect_err("weak password must fail");
        let DomainError::WeakPassword(violations) = err else {
            panic!("expected DomainError::WeakPassword");
        };
        assert!(violations.contains(&"This password is entirely numeric.".to_string()));
    }

    #[test]
    fn weak_password_is_merged_with_other_field_errors() {
        let req = SignupRequest {
            password: Some("12345".to_string()),
            email: None,
            ..valid_request()
        };

        let DomainError::Validation(errors) = req
            .validate(&PasswordPolicy::default())
            .expect_err("must fail")
        else {
            panic!("expected DomainError::Validation");
        };
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some_and(|messages| messages.len() >= 2));
    }
}
