// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Migration of deprecated configuration fields.
//!
//! [`migrate`] is a pure function: it rewrites legacy fields into their
//! current equivalents and reports one [`Deprecation`] per legacy field in
//! use. Nothing here is fatal; callers decide how to surface the warnings.

use super::{Config, MappingMode};
use std::fmt;

/// An advisory produced while normalizing a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deprecation {
    /// `mapping.dedup` was set. Deduplication is always on.
    Dedup,
    /// `mapping.dedot` disagrees with whether the mapping mode is ECS.
    Dedot,
    /// `retry.max_requests` was set and migrated to `retry.max_retries`.
    MaxRequests,
    /// The top-level `index` option overrode a signal index.
    LegacyIndex,
}

impl Deprecation {
    /// The advisory text, as logged.
    pub fn message(&self) -> &'static str {
        match self {
            Deprecation::Dedup => "dedup is deprecated, and is always enabled",
            Deprecation::Dedot => {
                "dedot has been deprecated: in the future, dedotting will always be performed in ECS mode only"
            }
            Deprecation::MaxRequests => {
                "retry::max_requests has been deprecated, and will be removed in a future version. Use retry::max_retries instead."
            }
            Deprecation::LegacyIndex => {
                "index option are deprecated and replaced with logs_index and traces_index."
            }
        }
    }
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of [`migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    /// Configuration with legacy fields translated.
    pub config: Config,
    /// Advisories, in detection order.
    pub warnings: Vec<Deprecation>,
}

/// Translate deprecated fields into current ones.
///
/// Checks run in a fixed order and independently of each other:
///
/// 1. `mapping.dedup` present (either value)
/// 2. `mapping.dedot` disagreeing with ECS mode
/// 3. `retry.max_requests` non-zero, which sets `max_retries = max_requests - 1`
///
/// Legacy fields are left in place, so running this again yields the same
/// configuration and the same advisories.
pub fn migrate(mut config: Config) -> Migration {
    let mut warnings = Vec::new();

    if config.mapping.dedup.is_some() {
        warnings.push(Deprecation::Dedup);
    }

    let ecs = config.mapping_mode() == MappingMode::Ecs;
    if config.mapping.dedot != ecs {
        warnings.push(Deprecation::Dedot);
    }

    if config.retry.max_requests != 0 {
        config.retry.max_retries = config.retry.max_requests - 1;
        // retry stays enabled even for max_requests = 1
        warnings.push(Deprecation::MaxRequests);
    }

    Migration { config, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::with_default_config;

    /// Defaults with dedot aligned to the (non-ECS) default mode.
    fn clean_config() -> Config {
        with_default_config([|cfg: &mut Config| cfg.mapping.dedot = false])
    }

    #[test]
    fn test_clean_config_has_no_warnings() {
        let migration = migrate(clean_config());
        assert!(migration.warnings.is_empty());
        assert_eq!(migration.config, clean_config());
    }

    #[test]
    fn test_default_config_warns_about_dedot() {
        // dedot defaults to true while the default mode is not ECS
        let migration = migrate(Config::default());
        assert_eq!(migration.warnings, vec![Deprecation::Dedot]);
    }

    #[test]
    fn test_dedup_warns_for_either_value() {
        for value in [true, false] {
            let mut config = clean_config();
            config.mapping.dedup = Some(value);

            let migration = migrate(config);
            assert_eq!(migration.warnings, vec![Deprecation::Dedup]);
            assert_eq!(migration.config.mapping.dedup, Some(value));
        }
    }

    #[test]
    fn test_dedot_warning_iff_disagreeing_with_ecs() {
        let cases = [
            (MappingMode::Ecs, true, false),
            (MappingMode::Ecs, false, true),
            (MappingMode::Raw, true, true),
            (MappingMode::Raw, false, false),
            (MappingMode::None, true, true),
            (MappingMode::Otel, false, false),
        ];

        for (mode, dedot, expect_warning) in cases {
            let mut config = clean_config();
            config.mapping.mode = mode;
            config.mapping.dedot = dedot;

            let migration = migrate(config);
            assert_eq!(
                migration.warnings.contains(&Deprecation::Dedot),
                expect_warning,
                "mode={:?} dedot={}",
                mode,
                dedot
            );
        }
    }

    #[test]
    fn test_max_requests_migrates_to_max_retries() {
        let mut config = clean_config();
        config.retry.max_requests = 5;
        config.retry.max_retries = 10;

        let migration = migrate(config);
        assert_eq!(migration.config.retry.max_retries, 4);
        assert!(migration.config.retry.enabled);
        assert_eq!(migration.warnings, vec![Deprecation::MaxRequests]);
    }

    #[test]
    fn test_max_requests_of_one_keeps_retry_enabled() {
        let mut config = clean_config();
        config.retry.max_requests = 1;

        let migration = migrate(config);
        assert_eq!(migration.config.retry.max_retries, 0);
        assert!(migration.config.retry.enabled);
    }

    #[test]
    fn test_max_requests_does_not_reenable_disabled_retry() {
        let mut config = clean_config();
        config.retry.enabled = false;
        config.retry.max_requests = 3;

        let migration = migrate(config);
        assert!(!migration.config.retry.enabled);
        assert_eq!(migration.config.retry.max_retries, 2);
    }

    #[test]
    fn test_warnings_follow_fixed_order() {
        let mut config = Config::default();
        config.mapping.dedup = Some(true);
        config.retry.max_requests = 2;

        let migration = migrate(config);
        assert_eq!(
            migration.warnings,
            vec![
                Deprecation::Dedup,
                Deprecation::Dedot,
                Deprecation::MaxRequests
            ]
        );
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let mut config = clean_config();
        config.retry.max_requests = 3;
        config.mapping.dedup = Some(false);

        let first = migrate(config);
        let second = migrate(first.config.clone());
        assert_eq!(first.config, second.config);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Deprecation::Dedup.to_string(),
            "dedup is deprecated, and is always enabled"
        );
        assert!(Deprecation::MaxRequests
            .message()
            .contains("Use retry::max_retries instead."));
    }
}
