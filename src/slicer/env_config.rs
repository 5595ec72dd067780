//! Environment variable and config file support for
//! [`SlicerBuilder`](super::builder::SlicerBuilder).
//!
//! # Configuration Precedence
//!
//! Settings are resolved in this order (highest priority first):
//!
//! 1. **Programmatic** — values set via builder methods (`budget_millis(2)`)
//! 2. **Environment variables** — values from `TIMESLICE_*` env vars
//! 3. **Config file** — values loaded from a TOML file (requires the
//!    `config-file` feature)
//! 4. **Defaults** — built-in defaults from [`SlicerConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `TIMESLICE_BUDGET_MS` | `u64` | `budget` (milliseconds) |
//! | `TIMESLICE_UNLIMITED` | `bool` | `budget` (unlimited sentinel, wins over `TIMESLICE_BUDGET_MS`) |
//! | `TIMESLICE_WORK_CAPACITY` | `usize` | `work_capacity` |

use crate::slicer::config::SlicerConfig;
use crate::types::{BuildError, TickBudget};

/// Environment variable name for the per-tick budget in milliseconds.
pub const ENV_BUDGET_MS: &str = "TIMESLICE_BUDGET_MS";
/// Environment variable name for the unlimited-budget toggle.
pub const ENV_UNLIMITED: &str = "TIMESLICE_UNLIMITED";
/// Environment variable name for the work queue capacity hint.
pub const ENV_WORK_CAPACITY: &str = "TIMESLICE_WORK_CAPACITY";

/// Apply environment variable overrides to a [`SlicerConfig`].
///
/// Only variables that are set in the environment are applied.
/// Returns an error if a variable is set but contains an unparseable value.
pub fn apply_env_overrides(config: &mut SlicerConfig) -> Result<(), BuildError> {
    if let Some(val) = read_env(ENV_BUDGET_MS) {
        config.budget = TickBudget::from_millis(parse_u64(ENV_BUDGET_MS, &val)?);
    }
    if let Some(val) = read_env(ENV_UNLIMITED) {
        if parse_bool(ENV_UNLIMITED, &val)? {
            config.budget = TickBudget::UNLIMITED;
        }
    }
    if let Some(val) = read_env(ENV_WORK_CAPACITY) {
        config.work_capacity = parse_usize(ENV_WORK_CAPACITY, &val)?;
    }
    Ok(())
}

/// Read an environment variable, returning `None` if unset.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_u64(var_name: &'static str, val: &str) -> Result<u64, BuildError> {
    val.trim().parse::<u64>().map_err(|e| {
        BuildError::invalid_value(var_name, format!("expected unsigned integer, got {val:?} ({e})"))
    })
}

fn parse_usize(var_name: &'static str, val: &str) -> Result<usize, BuildError> {
    val.trim().parse::<usize>().map_err(|e| {
        BuildError::invalid_value(var_name, format!("expected unsigned integer, got {val:?} ({e})"))
    })
}

fn parse_bool(var_name: &'static str, val: &str) -> Result<bool, BuildError> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(BuildError::invalid_value(
            var_name,
            format!("expected bool (true/false/1/0/yes/no), got {val:?}"),
        )),
    }
}

// =========================================================================
// TOML config file support (feature-gated)
// =========================================================================

/// TOML-deserializable scheduler configuration.
///
/// ```toml
/// [slicer]
/// budget_ms = 4
/// unlimited = false
/// work_capacity = 16
/// ```
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct SlicerToml {
    /// Scheduler settings.
    #[serde(default)]
    pub slicer: SlicerTomlSection,
}

/// Slicer section of the TOML config.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct SlicerTomlSection {
    /// Per-tick budget in milliseconds.
    pub budget_ms: Option<u64>,
    /// Disable slicing entirely (wins over `budget_ms`).
    pub unlimited: Option<bool>,
    /// Work queue capacity hint.
    pub work_capacity: Option<usize>,
}

/// Apply a parsed TOML config to a [`SlicerConfig`].
///
/// Only fields that are `Some` in the TOML struct override the config.
#[cfg(feature = "config-file")]
pub fn apply_toml_config(config: &mut SlicerConfig, toml: &SlicerToml) {
    if let Some(ms) = toml.slicer.budget_ms {
        config.budget = TickBudget::from_millis(ms);
    }
    if toml.slicer.unlimited == Some(true) {
        config.budget = TickBudget::UNLIMITED;
    }
    if let Some(capacity) = toml.slicer.work_capacity {
        config.work_capacity = capacity;
    }
}

/// Load and parse a TOML config file.
#[cfg(feature = "config-file")]
pub fn load_toml_config(path: &std::path::Path) -> Result<SlicerToml, BuildError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BuildError::custom(format!("cannot read config file {}: {e}", path.display()))
    })?;
    toml::from_str(&contents).map_err(|e| {
        BuildError::custom(format!("cannot parse config file {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::env_lock;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn unset_vars_leave_defaults() {
        init_test("unset_vars_leave_defaults");
        let _guard = env_lock();
        std::env::remove_var(ENV_BUDGET_MS);
        std::env::remove_var(ENV_UNLIMITED);
        std::env::remove_var(ENV_WORK_CAPACITY);

        let mut config = SlicerConfig::default();
        apply_env_overrides(&mut config).expect("no overrides");
        crate::assert_with_log!(
            config == SlicerConfig::default(),
            "config untouched",
            SlicerConfig::default(),
            config
        );
        crate::test_complete!("unset_vars_leave_defaults");
    }

    #[test]
    fn budget_ms_override_applies() {
        init_test("budget_ms_override_applies");
        let _guard = env_lock();
        std::env::set_var(ENV_BUDGET_MS, "12");
        std::env::remove_var(ENV_UNLIMITED);
        std::env::remove_var(ENV_WORK_CAPACITY);

        let mut config = SlicerConfig::default();
        apply_env_overrides(&mut config).expect("valid override");
        std::env::remove_var(ENV_BUDGET_MS);

        crate::assert_with_log!(
            config.budget == TickBudget::from_millis(12),
            "budget override",
            TickBudget::from_millis(12),
            config.budget
        );
        crate::test_complete!("budget_ms_override_applies");
    }

    #[test]
    fn unlimited_wins_over_budget_ms() {
        init_test("unlimited_wins_over_budget_ms");
        let _guard = env_lock();
        std::env::set_var(ENV_BUDGET_MS, "12");
        std::env::set_var(ENV_UNLIMITED, "yes");
        std::env::remove_var(ENV_WORK_CAPACITY);

        let mut config = SlicerConfig::default();
        apply_env_overrides(&mut config).expect("valid overrides");
        std::env::remove_var(ENV_BUDGET_MS);
        std::env::remove_var(ENV_UNLIMITED);

        crate::assert_with_log!(
            config.budget.is_unlimited(),
            "unlimited wins",
            true,
            config.budget.is_unlimited()
        );
        crate::test_complete!("unlimited_wins_over_budget_ms");
    }

    #[test]
    fn invalid_value_is_a_typed_error() {
        init_test("invalid_value_is_a_typed_error");
        let _guard = env_lock();
        std::env::set_var(ENV_BUDGET_MS, "soon");

        let mut config = SlicerConfig::default();
        let err = apply_env_overrides(&mut config);
        std::env::remove_var(ENV_BUDGET_MS);

        let is_invalid = matches!(
            err,
            Err(BuildError::InvalidValue { field, .. }) if field == ENV_BUDGET_MS
        );
        crate::assert_with_log!(is_invalid, "typed parse error", true, is_invalid);
        crate::test_complete!("invalid_value_is_a_typed_error");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_overrides_apply_in_order() {
        init_test("toml_overrides_apply_in_order");
        let toml: SlicerToml = toml::from_str(
            r#"
            [slicer]
            budget_ms = 9
            work_capacity = 64
            "#,
        )
        .expect("valid toml");

        let mut config = SlicerConfig::default();
        apply_toml_config(&mut config, &toml);
        crate::assert_with_log!(
            config.budget == TickBudget::from_millis(9),
            "budget from file",
            TickBudget::from_millis(9),
            config.budget
        );
        crate::assert_with_log!(
            config.work_capacity == 64,
            "capacity from file",
            64,
            config.work_capacity
        );
        crate::test_complete!("toml_overrides_apply_in_order");
    }
}
