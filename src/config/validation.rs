//! Configuration validation.
//!
//! Serde handles the syntax; this checks value ranges and that addresses
//! parse. Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// Largest accepted request or shutdown timeout: one day.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{field} must be at most {max} seconds")]
    TooLarge { field: &'static str, max: u64 },

    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::NotPositive("listener.max_connections"));
    }
    for (field, secs) in [
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.shutdown_grace_secs", config.timeouts.shutdown_grace_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::NotPositive(field));
        } else if secs > MAX_TIMEOUT_SECS {
            errors.push(ValidationError::TooLarge {
                field,
                max: MAX_TIMEOUT_SECS,
            });
        }
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::NotPositive("security.max_body_size"));
    }
    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.shutdown_grace_secs = 0;
        config.auth.jwt_secret.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptySecret));
        assert!(errors.contains(&ValidationError::NotPositive("timeouts.shutdown_grace_secs")));
    }

    #[test]
    fn timeouts_are_bounded() {
        let mut config = ServiceConfig::default();
        config.timeouts.request_secs = i64::MAX as u64;
        config.timeouts.shutdown_grace_secs = MAX_TIMEOUT_SECS;

        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::TooLarge {
                field: "timeouts.request_secs",
                max: MAX_TIMEOUT_SECS,
            }]
        );
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}
