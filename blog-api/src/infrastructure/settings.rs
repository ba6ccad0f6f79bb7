use anyhow::{Context, Result, anyhow};

use crate::domain::password_policy::PasswordPolicy;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: i64,
    pub jwt_refresh_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_request_timeout_secs: u64,
    pub(crate) password_policy: PasswordPolicy,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_u64_env("DATABASE_MAX_CONNECTIONS", 10)?
            .try_into()
            .context("DATABASE_MAX_CONNECTIONS is too large")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_access_ttl_seconds: i64 = std::env::var("JWT_ACCESS_TTL_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("Failed to parse JWT_ACCESS_TTL_SECONDS, expecting integer")?;
        let jwt_refresh_ttl_seconds: i64 = std::env::var("JWT_REFRESH_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("Failed to parse JWT_REFRESH_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;
        let password_policy = password_policy_from_env()?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_request_timeout_secs,
            password_policy,
        })
    }
}

fn password_policy_from_env() -> Result<PasswordPolicy> {
    let defaults = PasswordPolicy::default();

    let min_length = parse_usize_env("PASSWORD_MIN_LENGTH", defaults.min_length)?;
    let max_similarity = match std::env::var("PASSWORD_MAX_SIMILARITY") {
        Ok(raw) => parse_similarity(&raw)?,
        Err(_) => defaults.max_similarity,
    };
    let reject_common = parse_bool_env("PASSWORD_REJECT_COMMON", defaults.reject_common)?;
    let reject_numeric = parse_bool_env("PASSWORD_REJECT_NUMERIC", defaults.reject_numeric)?;

    Ok(PasswordPolicy {
        min_length,
        max_similarity,
        reject_common,
        reject_numeric,
    })
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_similarity(raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .context("Failed to parse PASSWORD_MAX_SIMILARITY, expecting number")?;
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("PASSWORD_MAX_SIMILARITY must be within 0..=1"));
    }
    Ok(value)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("Failed to parse {key}: '{other}' is not a boolean")),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, parse_cors_origins, parse_similarity};

    #[test]
    fn cors_origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test,".to_string());
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert!(parse_bool("K", "TRUE").expect("must parse"));
        assert!(parse_bool("K", " on ").expect("must parse"));
        assert!(!parse_bool("K", "0").expect("must parse"));
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn similarity_must_be_a_ratio() {
        assert_eq!(parse_similarity("0.5").expect("must parse"), 0.5);
        assert!(parse_similarity("1.5").is_err());
        assert!(parse_similarity("abc").is_err());
    }
}
