//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sleep range ordered, attempts > 0)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClaimerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::ClaimerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClaimerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "api.base_url", &config.api.base_url);
    if !config.api.base_url.ends_with('/') {
        errors.push(ValidationError::new("api.base_url", "must end with '/'"));
    }
    check_url(&mut errors, "indexer.url", &config.indexer.url);
    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    for url in &config.blockchain.failover_urls {
        check_url(&mut errors, "blockchain.failover_urls", url);
    }

    check_address(&mut errors, "indexer.collection_address", &config.indexer.collection_address);
    check_address(&mut errors, "blockchain.contract_address", &config.blockchain.contract_address);

    if config.indexer.page_size == 0 || config.indexer.page_size > 100 {
        errors.push(ValidationError::new("indexer.page_size", "must be between 1 and 100"));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if config.blockchain.gas_limit == Some(0) {
        errors.push(ValidationError::new("blockchain.gas_limit", "must be > 0 when set"));
    }
    if config.retry.max_receipt_attempts == 0 {
        errors.push(ValidationError::new("retry.max_receipt_attempts", "must be > 0"));
    }
    if config.schedule.sleep_min_secs > config.schedule.sleep_max_secs {
        errors.push(ValidationError::new(
            "schedule",
            format!(
                "sleep_min_secs ({}) exceeds sleep_max_secs ({})",
                config.schedule.sleep_min_secs, config.schedule.sleep_max_secs
            ),
        ));
    }
    for (key, policy) in &config.fees.overrides {
        if key.parse::<u64>().is_err() {
            errors.push(ValidationError::new(
                "fees.overrides",
                format!("'{}' is not a numeric chain id", key),
            ));
        }
        if let Err(problem) = policy.validate() {
            errors.push(ValidationError {
                field: format!("fees.overrides.{}", key),
                message: problem,
            });
        }
    }
    if config.files.keys_file.trim().is_empty() {
        errors.push(ValidationError::new("files.keys_file", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<Address>() {
        errors.push(ValidationError::new(field, format!("invalid address '{}': {}", value, e)));
    }
}
