//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check URLs parse before any network use
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StakerConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::StakerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError {
            field,
            message: format!("invalid URL '{}': {}", value, e),
        });
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &StakerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "network.node_url", &config.network.node_url);
    for url in &config.network.failover_urls {
        check_url(&mut errors, "network.failover_urls", url);
    }
    check_url(&mut errors, "network.helper_url", &config.network.helper_url);
    check_url(&mut errors, "device.bridge_url", &config.device.bridge_url);

    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "network.rpc_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.network.lockup_base.is_empty() {
        errors.push(ValidationError {
            field: "network.lockup_base",
            message: "must not be empty".to_string(),
        });
    }
    if config.device.network_byte.len() != 1 {
        errors.push(ValidationError {
            field: "device.network_byte",
            message: "must be a single ASCII character".to_string(),
        });
    }
    if config.scan.max_paths == 0 {
        errors.push(ValidationError {
            field: "scan.max_paths",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.retries.enabled && config.retries.max_attempts == 0 {
        errors.push(ValidationError {
            field: "retries.max_attempts",
            message: "must be at least 1 when retries are enabled".to_string(),
        });
    }
    if config.storage.path.is_empty() {
        errors.push(ValidationError {
            field: "storage.path",
            message: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
