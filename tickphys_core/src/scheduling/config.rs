//! Scheduler configuration with presets and file loading.

use crate::error::{TickError, TickResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default fixed step: 50 Hz.
pub const DEFAULT_FIXED_DELTA_TIME: f64 = 0.02;

/// Tunables for a [`TickScheduler`](super::TickScheduler).
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```toml
/// fixed_delta_time = 0.008333333333333333
/// max_catch_up_steps = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Seconds simulated by one fixed step. Zero pauses the simulation.
    pub fixed_delta_time: f64,
    /// Physics gate. When false a tick only fires read-input.
    pub is_physic_updated: bool,
    /// Whether a [`FrameDriver`](super::FrameDriver) should drive the scheduler.
    pub auto_update: bool,
    /// Upper bound on fixed steps per tick. `None` catches up fully.
    ///
    /// Without a cap a long stall turns into one very long tick (each step
    /// making the next frame slower). With a cap the backlog is carried to
    /// later ticks instead of being dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_catch_up_steps: Option<u32>,
    /// Pre-allocated registry slots.
    pub registry_capacity: usize,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl TickConfig {
    /// 50 Hz, physics on, externally driven, unbounded catch-up.
    pub fn standard() -> Self {
        Self {
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            is_physic_updated: true,
            auto_update: false,
            max_catch_up_steps: None,
            registry_capacity: 256,
        }
    }

    /// 240 Hz stepping for stiff simulations.
    pub fn high_rate() -> Self {
        Self::standard().with_fixed_rate_hz(240.0)
    }

    /// 50 Hz with at most 8 catch-up steps per tick.
    pub fn bounded() -> Self {
        Self::standard().with_max_catch_up_steps(8)
    }

    /// Set the fixed step from a rate. A non-positive rate pauses stepping.
    pub fn with_fixed_rate_hz(mut self, rate_hz: f64) -> Self {
        self.fixed_delta_time = if rate_hz > 0.0 { 1.0 / rate_hz } else { 0.0 };
        self
    }

    pub fn with_fixed_delta_time(mut self, fixed_delta_time: f64) -> Self {
        self.fixed_delta_time = fixed_delta_time;
        self
    }

    pub fn with_max_catch_up_steps(mut self, steps: u32) -> Self {
        self.max_catch_up_steps = Some(steps);
        self
    }

    pub fn with_auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }

    pub fn with_physics(mut self, enabled: bool) -> Self {
        self.is_physic_updated = enabled;
        self
    }

    /// Fixed steps per second, or `None` when stepping is paused.
    pub fn fixed_rate_hz(&self) -> Option<f64> {
        (self.fixed_delta_time > 0.0).then(|| 1.0 / self.fixed_delta_time)
    }

    pub fn validate(&self) -> TickResult<()> {
        if !self.fixed_delta_time.is_finite() {
            return Err(TickError::config("fixed_delta_time must be finite"));
        }
        if self.fixed_delta_time < 0.0 {
            return Err(TickError::config(format!(
                "fixed_delta_time must not be negative (got {})",
                self.fixed_delta_time
            )));
        }
        if self.max_catch_up_steps == Some(0) {
            return Err(TickError::config(
                "max_catch_up_steps must be at least 1 (omit it to disable the cap)",
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> TickResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> TickResult<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> TickResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_yaml_string(&self) -> TickResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a `.toml`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> TickResult<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => Self::from_toml_str(&source)?,
            ConfigFormat::Yaml => Self::from_yaml_str(&source)?,
        };
        log::debug!("Loaded tick config from {}", path.display());
        Ok(config)
    }

    /// Write to a `.toml`, `.yaml` or `.yml` file, creating parent directories.
    pub fn save(&self, path: &Path) -> TickResult<()> {
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => self.to_toml_string()?,
            ConfigFormat::Yaml => self.to_yaml_string()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> TickResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            other => Err(TickError::unsupported(format!(
                "config format {:?} for {} (expected .toml, .yaml or .yml)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets() {
        let standard = TickConfig::standard();
        assert_eq!(standard.fixed_delta_time, 0.02);
        assert!(standard.is_physic_updated);
        assert!(!standard.auto_update);
        assert_eq!(standard.max_catch_up_steps, None);

        assert_relative_eq!(TickConfig::high_rate().fixed_rate_hz().unwrap(), 240.0);
        assert_eq!(TickConfig::bounded().max_catch_up_steps, Some(8));
        assert_eq!(TickConfig::default(), TickConfig::standard());
    }

    #[test]
    fn test_paused_rate() {
        let paused = TickConfig::standard().with_fixed_rate_hz(0.0);
        assert_eq!(paused.fixed_delta_time, 0.0);
        assert_eq!(paused.fixed_rate_hz(), None);
        assert!(paused.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let negative = TickConfig::standard().with_fixed_delta_time(-0.1);
        assert!(matches!(negative.validate(), Err(TickError::Config(_))));

        let nan = TickConfig::standard().with_fixed_delta_time(f64::NAN);
        assert!(nan.validate().is_err());

        let zero_cap = TickConfig::standard().with_max_catch_up_steps(0);
        assert!(zero_cap.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TickConfig::from_toml_str("max_catch_up_steps = 4\nauto_update = true\n").unwrap();
        assert_eq!(config.max_catch_up_steps, Some(4));
        assert!(config.auto_update);
        assert_eq!(config.fixed_delta_time, DEFAULT_FIXED_DELTA_TIME);
        assert_eq!(config.registry_capacity, 256);
    }

    #[test]
    fn test_yaml_parsing() {
        let config = TickConfig::from_yaml_str("fixed_delta_time: 0.01\nis_physic_updated: false\n").unwrap();
        assert_eq!(config.fixed_delta_time, 0.01);
        assert!(!config.is_physic_updated);
    }

    #[test]
    fn test_invalid_file_contents_are_rejected() {
        assert!(matches!(
            TickConfig::from_toml_str("fixed_delta_time = \"fast\""),
            Err(TickError::TomlParse(_))
        ));
        assert!(matches!(
            TickConfig::from_toml_str("fixed_delta_time = -1.0"),
            Err(TickError::Config(_))
        ));
    }
}
