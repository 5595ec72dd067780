//! Scheduler builder.

use crate::slicer::config::SlicerConfig;
use crate::slicer::env_config;
use crate::slicer::Slicer;
use crate::types::{BuildError, TickBudget};

/// Move-based builder for [`Slicer`].
///
/// Each method takes `self` by value and returns `Self` for chaining.
/// Settings resolve with the usual precedence: programmatic values win over
/// `TIMESLICE_*` environment variables, which win over the config file
/// (with the `config-file` feature), which wins over defaults.
///
/// ```
/// use timeslice::SlicerBuilder;
///
/// let slicer = SlicerBuilder::new().budget_millis(2).build()?;
/// # Ok::<(), timeslice::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlicerBuilder {
    budget: Option<TickBudget>,
    work_capacity: Option<usize>,
    #[cfg(feature = "config-file")]
    config_path: Option<std::path::PathBuf>,
}

impl SlicerBuilder {
    /// Create a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-tick budget.
    #[must_use]
    pub fn budget(mut self, budget: TickBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Set the per-tick budget in milliseconds.
    #[must_use]
    pub fn budget_millis(self, ms: u64) -> Self {
        self.budget(TickBudget::from_millis(ms))
    }

    /// Disable slicing: all queued work runs in a single tick pass.
    #[must_use]
    pub fn unlimited(self) -> Self {
        self.budget(TickBudget::UNLIMITED)
    }

    /// Set the work queue capacity hint.
    #[must_use]
    pub fn work_capacity(mut self, capacity: usize) -> Self {
        self.work_capacity = Some(capacity);
        self
    }

    /// Load settings from a TOML config file during [`build`](Self::build).
    #[cfg(feature = "config-file")]
    #[must_use]
    pub fn config_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Low-latency preset: a tight 2 ms slice per tick.
    #[must_use]
    pub fn low_latency() -> Self {
        Self::new().budget_millis(2)
    }

    /// Throughput preset: a generous 8 ms slice per tick.
    #[must_use]
    pub fn high_throughput() -> Self {
        Self::new().budget_millis(8)
    }

    /// Build a scheduler from this configuration.
    pub fn build(self) -> Result<Slicer, BuildError> {
        let mut config = SlicerConfig::default();
        #[cfg(feature = "config-file")]
        if let Some(path) = &self.config_path {
            let toml = env_config::load_toml_config(path)?;
            env_config::apply_toml_config(&mut config, &toml);
        }
        env_config::apply_env_overrides(&mut config)?;
        if let Some(budget) = self.budget {
            config.budget = budget;
        }
        if let Some(capacity) = self.work_capacity {
            config.work_capacity = capacity;
        }
        Ok(Slicer::with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::env_config::ENV_BUDGET_MS;
    use crate::test_utils::env_lock;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn build_with_defaults() {
        init_test("build_with_defaults");
        let _guard = env_lock();
        std::env::remove_var(ENV_BUDGET_MS);

        let slicer = SlicerBuilder::new().build().expect("default build");
        crate::assert_with_log!(
            slicer.budget() == SlicerConfig::default().budget,
            "default budget",
            SlicerConfig::default().budget,
            slicer.budget()
        );
        crate::test_complete!("build_with_defaults");
    }

    #[test]
    fn programmatic_beats_env() {
        init_test("programmatic_beats_env");
        let _guard = env_lock();
        std::env::set_var(ENV_BUDGET_MS, "50");

        let slicer = SlicerBuilder::new()
            .budget_millis(3)
            .build()
            .expect("build");
        std::env::remove_var(ENV_BUDGET_MS);

        crate::assert_with_log!(
            slicer.budget() == TickBudget::from_millis(3),
            "programmatic wins",
            TickBudget::from_millis(3),
            slicer.budget()
        );
        crate::test_complete!("programmatic_beats_env");
    }

    #[test]
    fn env_beats_defaults() {
        init_test("env_beats_defaults");
        let _guard = env_lock();
        std::env::set_var(ENV_BUDGET_MS, "25");

        let slicer = SlicerBuilder::new().build().expect("build");
        std::env::remove_var(ENV_BUDGET_MS);

        crate::assert_with_log!(
            slicer.budget() == TickBudget::from_millis(25),
            "env wins over default",
            TickBudget::from_millis(25),
            slicer.budget()
        );
        crate::test_complete!("env_beats_defaults");
    }

    #[test]
    fn presets_pick_expected_budgets() {
        init_test("presets_pick_expected_budgets");
        let _guard = env_lock();
        std::env::remove_var(ENV_BUDGET_MS);

        let low = SlicerBuilder::low_latency().build().expect("build");
        crate::assert_with_log!(
            low.budget() == TickBudget::from_millis(2),
            "low_latency budget",
            TickBudget::from_millis(2),
            low.budget()
        );
        let high = SlicerBuilder::high_throughput().build().expect("build");
        crate::assert_with_log!(
            high.budget() == TickBudget::from_millis(8),
            "high_throughput budget",
            TickBudget::from_millis(8),
            high.budget()
        );
        crate::test_complete!("presets_pick_expected_budgets");
    }

    #[test]
    fn unlimited_preset_disables_slicing() {
        init_test("unlimited_preset_disables_slicing");
        let _guard = env_lock();
        std::env::remove_var(ENV_BUDGET_MS);

        let slicer = SlicerBuilder::new().unlimited().build().expect("build");
        crate::assert_with_log!(
            slicer.budget().is_unlimited(),
            "unlimited",
            true,
            slicer.budget().is_unlimited()
        );
        crate::test_complete!("unlimited_preset_disables_slicing");
    }
}
