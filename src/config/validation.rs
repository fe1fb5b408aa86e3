//! Configuration validation.
//!
//! Semantic checks run after serde has handled the syntactic layer.
//! Validation is a pure function and returns all errors, not just the first,
//! so a broken config file can be fixed in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("rate_limit.interval_ms must be greater than zero")]
    ZeroRateLimitWindow,

    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroRateLimitQuota,

    #[error("chat.max_input_chars must be greater than zero")]
    ZeroMaxInput,

    #[error("chat.max_output_chars must be greater than zero")]
    ZeroMaxOutput,

    #[error("chat.context_messages must be greater than zero")]
    ZeroContextWindow,

    #[error("chat.redirect must not be empty")]
    EmptyRedirect,

    #[error("topic.keywords must not be empty")]
    EmptyKeywords,

    #[error("provider.temperature {0} is outside 0.0..=2.0")]
    TemperatureOutOfRange(f32),

    #[error("provider.max_tokens must be greater than zero")]
    ZeroMaxTokens,
}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.rate_limit.interval_ms == 0 {
        errors.push(ValidationError::ZeroRateLimitWindow);
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroRateLimitQuota);
    }

    if config.chat.max_input_chars == 0 {
        errors.push(ValidationError::ZeroMaxInput);
    }
    if config.chat.max_output_chars == 0 {
        errors.push(ValidationError::ZeroMaxOutput);
    }
    if config.chat.context_messages == 0 {
        errors.push(ValidationError::ZeroContextWindow);
    }
    if config.chat.redirect.trim().is_empty() {
        errors.push(ValidationError::EmptyRedirect);
    }

    if config.topic.keywords.is_empty() {
        errors.push(ValidationError::EmptyKeywords);
    }

    if !(0.0..=2.0).contains(&config.provider.temperature) {
        errors.push(ValidationError::TemperatureOutOfRange(
            config.provider.temperature,
        ));
    }
    if config.provider.max_tokens == 0 {
        errors.push(ValidationError::ZeroMaxTokens);
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
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.rate_limit.interval_ms = 0;
        config.topic.keywords.clear();
        config.provider.temperature = 5.0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn zero_quota_is_rejected() {
        let mut config = GatewayConfig::default();
        config.rate_limit.max_requests = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::ZeroRateLimitQuota));
    }
}
