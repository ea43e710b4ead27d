//! Configuration validation.

use crate::config::schema::{Config, MessagingConfig};
use crate::error::{Error, Result};

/// Validates merged configuration.
///
/// # Examples
///
/// ```
/// use frontdesk::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { base_url: Some("ftp://desk".into()), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref url) = config.base_url {
            Self::validate_base_url(url)?;
        }

        if let Some(seconds) = config.recheck_interval_seconds {
            Self::validate_positive("recheck_interval_seconds", seconds)?;
        }

        if let Some(seconds) = config.maximum_lock_wait_seconds {
            Self::validate_positive("maximum_lock_wait_seconds", seconds)?;
        }

        if let Some(ref messaging) = config.messaging {
            Self::validate_messaging(messaging)?;
        }

        Ok(())
    }

    /// Registration links are built by appending a path, so the base must
    /// be an absolute http(s) origin without query or fragment.
    fn validate_base_url(url: &str) -> Result<()> {
        let invalid = |message: &str| Error::Validation {
            field: "base_url".into(),
            message: message.into(),
        };

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| invalid("Must start with http:// or https://"))?;

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(invalid("Missing host"));
        }
        if url.contains(char::is_whitespace) {
            return Err(invalid("Cannot contain whitespace"));
        }
        if url.contains(['?', '#']) {
            return Err(invalid("Cannot contain a query or fragment"));
        }
        Ok(())
    }

    fn validate_positive(field: &str, value: u64) -> Result<()> {
        if value == 0 {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must be greater than 0".into(),
            });
        }
        Ok(())
    }

    fn validate_messaging(messaging: &MessagingConfig) -> Result<()> {
        if let Some(seconds) = messaging.custom_spacing_seconds {
            Self::validate_positive("messaging.custom_spacing_seconds", seconds)?;
        }
        if let Some(seconds) = messaging.resto_checkout_after_seconds {
            Self::validate_positive("messaging.resto_checkout_after_seconds", seconds)?;
        }
        // a zero lead sends the checkout message at the checkout instant
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<()>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_base_url() {
        assert!(ConfigValidator::validate_base_url("https://desk.example.com").is_ok());
        assert!(ConfigValidator::validate_base_url("http://localhost:3000/app").is_ok());
        assert!(ConfigValidator::validate_base_url("desk.example.com").is_err());
        assert!(ConfigValidator::validate_base_url("https://").is_err());
        assert!(ConfigValidator::validate_base_url("https://a.test/?x=1").is_err());
        assert!(ConfigValidator::validate_base_url("https://a .test").is_err());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let config = Config {
            recheck_interval_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "recheck_interval_seconds");

        let config = Config {
            maximum_lock_wait_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "maximum_lock_wait_seconds");

        let config = Config {
            messaging: Some(MessagingConfig {
                custom_spacing_seconds: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            field_of(ConfigValidator::validate(&config)),
            "messaging.custom_spacing_seconds"
        );
    }

    #[test]
    fn test_zero_checkout_lead_allowed() {
        let config = Config {
            messaging: Some(MessagingConfig {
                checkout_lead_seconds: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
