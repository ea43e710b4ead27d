//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, MessagingConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use frontdesk::config::{Config, ConfigMerger};
///
/// let low = Config { base_url: Some("https://low.test".to_string()), ..Default::default() };
/// let high = Config { base_url: Some("https://high.test".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.base_url.as_deref(), Some("https://high.test"));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge configuration sources, given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge `source` into `target`; set fields in `source` win.
    ///
    /// The `messaging` section merges field by field, so a file can adjust
    /// one delay without restating the others.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.base_url.is_some() {
            target.base_url.clone_from(&source.base_url);
        }

        if source.recheck_interval_seconds.is_some() {
            target.recheck_interval_seconds = source.recheck_interval_seconds;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if let Some(ref messaging) = source.messaging {
            let merged = target.messaging.get_or_insert_with(MessagingConfig::default);
            Self::merge_messaging(merged, messaging);
        }
    }

    fn merge_messaging(target: &mut MessagingConfig, source: &MessagingConfig) {
        if source.custom_spacing_seconds.is_some() {
            target.custom_spacing_seconds = source.custom_spacing_seconds;
        }
        if source.checkout_lead_seconds.is_some() {
            target.checkout_lead_seconds = source.checkout_lead_seconds;
        }
        if source.resto_checkout_after_seconds.is_some() {
            target.resto_checkout_after_seconds = source.resto_checkout_after_seconds;
        }
    }
}
