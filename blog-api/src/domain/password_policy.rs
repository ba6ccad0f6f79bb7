use std::collections::HashMap;

/// Strength rules applied to signup passwords. Every violated rule yields one message.
#[derive(Debug, Clone)]
pub(crate) struct PasswordPolicy {
    pub(crate) min_length: usize,
    /// `0.0` (the default) switches the similarity check off.
    pub(crate) max_similarity: f64,
    pub(crate) reject_common: bool,
    pub(crate) reject_numeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_similarity: 0.0,
            reject_common: true,
            reject_numeric: true,
        }
    }
}

/// A user attribute the password must not resemble, e.g. `("username", "alice")`.
pub(crate) type UserAttribute<'a> = (&'static str, &'a str);

impl PasswordPolicy {
    pub(crate) fn check(&self, password: &str, attributes: &[UserAttribute<'_>]) -> Vec<String> {
        let mut violations = Vec::new();

        if self.max_similarity > 0.0
            && let Some(label) = self.similar_attribute(password, attributes)
        {
            violations.push(format!("The password is too similar to the {label}."));
        }

        if password.chars().count() < self.min_length {
            violations.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }

        if self.reject_common && is_common(password) {
            violations.push("This password is too common.".to_string());
        }

        if self.reject_numeric && !password.is_empty() && password.chars().all(|c| c.is_numeric())
        {
            violations.push("This password is entirely numeric.".to_string());
        }

        violations
    }

    fn similar_attribute(
        &self,
        password: &str,
        attributes: &[UserAttribute<'_>],
    ) -> Option<&'static str> {
        let password = password.to_lowercase();
        let password_len = password.chars().count();

        for (label, value) in attributes {
            let value = value.to_lowercase();
            let parts = value
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .chain(std::iter::once(value.as_str()));

            for part in parts {
                if self.exceeds_length_ratio(password_len, part.chars().count()) {
                    continue;
                }
                if quick_ratio(&password, part) >= self.max_similarity {
                    return Some(label);
                }
            }
        }
        None
    }

    /// True when the lengths alone rule out reaching `max_similarity`.
    fn exceeds_length_ratio(&self, password_len: usize, value_len: usize) -> bool {
        let bound = self.max_similarity / 2.0 * password_len as f64;
        password_len >= 10 * value_len && (value_len as f64) < bound
    }
}

/// Upper bound of the Ratcliff/Obershelp similarity: shared character multiset over total length.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c)
            && *count > 0
        {
            *count -= 1;
            matches += 1;
        }
    }

    2.0 * matches as f64 / total as f64
}

fn is_common(password: &str) -> bool {
    let password = password.trim().to_lowercase();
    COMMON_PASSWORDS.contains(&password.as_str())
}

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "mobilemail", "mom",
    "monitor", "monitoring", "montana", "moon", "moscow", "password1", "password123",
    "passw0rd", "welcome", "welcome1", "admin", "administrator", "qwerty123", "abcd1234",
    "changeme", "secret", "letmein1", "football1", "baseball1", "iloveyou1", "princess1",
];
