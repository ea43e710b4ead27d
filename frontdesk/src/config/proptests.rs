//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::{Config, MessagingConfig, OutputFormat};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Tsv),
        Just(OutputFormat::Table),
    ]
}

fn messaging_strategy() -> impl Strategy<Value = MessagingConfig> {
    (
        prop::option::of(1u64..=3600),
        prop::option::of(0u64..=3600),
        prop::option::of(1u64..=3600),
    )
        .prop_map(|(spacing, lead, resto)| MessagingConfig {
            custom_spacing_seconds: spacing,
            checkout_lead_seconds: lead,
            resto_checkout_after_seconds: resto,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of("https://[a-z]{1,12}\\.test"),
        prop::option::of(1u64..=3600),
        prop::option::of(messaging_strategy()),
        prop::option::of(1u64..=120),
        prop::option::of(format_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(base_url, recheck, messaging, lock, format, autoinit)| Config {
            base_url,
            recheck_interval_seconds: recheck,
            messaging,
            maximum_lock_wait_seconds: lock,
            output_format: format,
            disable_autoinit: autoinit,
        })
}

proptest! {
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(merged.base_url.clone(), high.base_url.clone().or(low.base_url.clone()));
        prop_assert_eq!(merged.recheck_interval_seconds, high.recheck_interval_seconds.or(low.recheck_interval_seconds));
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));
        prop_assert_eq!(merged.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));

        let low_m = low.messaging();
        let high_m = high.messaging();
        let merged_m = merged.messaging();
        prop_assert_eq!(merged_m.custom_spacing_seconds, high_m.custom_spacing_seconds.or(low_m.custom_spacing_seconds));
        prop_assert_eq!(merged_m.checkout_lead_seconds, high_m.checkout_lead_seconds.or(low_m.checkout_lead_seconds));
    }

    #[test]
    fn merge_with_empty_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    #[test]
    fn merge_is_idempotent(low in config_strategy(), high in config_strategy()) {
        let mut once = low;
        ConfigMerger::merge_into(&mut once, &high);
        let mut twice = once.clone();
        ConfigMerger::merge_into(&mut twice, &high);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn generated_configs_validate(config in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&config).is_ok());
    }
}
