//! Configuration for the splash screen.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::animation::FrameSequence;
use crate::transition::{Curve, Offset, SlideTransition};

/// Error types for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// YAML could not be parsed or emitted
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Values parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a splash screen instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Frame sequence to play
    pub animation: FrameSequence,
    /// Minimum display timer
    pub readiness: ReadinessConfig,
    /// Handoff transition
    pub transition: TransitionConfig,
    /// Navigation gate behavior
    pub gate: GateConfig,
}

impl SplashConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the splash cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.animation
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("animation: {}", e)))?;

        if self.transition.duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "transition.duration_ms must be positive".to_string(),
            ));
        }
        if self.gate.probe_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "gate.probe_timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Minimum display timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Minimum time the splash stays up (ms)
    pub min_display_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            min_display_ms: 1000,
        }
    }
}

impl ReadinessConfig {
    pub fn min_display(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }
}

/// Handoff transition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Slide duration (ms)
    pub duration_ms: u64,
    /// Start offset of the incoming screen
    pub begin: Offset,
    /// Resting offset of the incoming screen
    pub end: Offset,
    pub curve: Curve,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        let slide = SlideTransition::default();
        Self {
            duration_ms: slide.duration.as_millis() as u64,
            begin: slide.begin,
            end: slide.end,
            curve: slide.curve,
        }
    }
}

impl TransitionConfig {
    /// Build the slide transition.
    pub fn slide(&self) -> SlideTransition {
        SlideTransition {
            begin: self.begin,
            end: self.end,
            duration: Duration::from_millis(self.duration_ms),
            curve: self.curve,
        }
    }
}

/// What the gate does when the animation finishes before the readiness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateReadinessPolicy {
    /// Ignore the terminal event; no navigation this pass
    #[default]
    Drop,
    /// Hold the terminal event until the flag is set
    WaitForReadiness,
}

/// Navigation gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub late_readiness: LateReadinessPolicy,
    /// Upper bound on the login probe (ms); `None` waits indefinitely
    pub probe_timeout_ms: Option<u64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            late_readiness: LateReadinessPolicy::Drop,
            probe_timeout_ms: Some(5000),
        }
    }
}

impl GateConfig {
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SplashConfig::default();
        assert_eq!(config.animation.fps, 30);
        assert_eq!(config.animation.frame_count(), 34);
        assert_eq!(config.transition.slide().duration, Duration::from_millis(1500));
        assert_eq!(config.transition.begin, Offset::new(1.0, 0.0));
        assert_eq!(config.gate.late_readiness, LateReadinessPolicy::Drop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = SplashConfig::default();
        config.readiness.min_display_ms = 2500;
        config.gate.late_readiness = LateReadinessPolicy::WaitForReadiness;

        let yaml = config.to_yaml().unwrap();
        let parsed = SplashConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "readiness:\n  min_display_ms: 200\n\
                    gate:\n  late_readiness: wait_for_readiness\n";
        let config = SplashConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.readiness.min_display(), Duration::from_millis(200));
        assert_eq!(config.gate.late_readiness, LateReadinessPolicy::WaitForReadiness);
        assert_eq!(config.gate.probe_timeout_ms, Some(5000));
        assert_eq!(config.animation, FrameSequence::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let looping = "animation:\n  looping: true\n";
        assert!(matches!(
            SplashConfig::from_yaml(looping),
            Err(ConfigError::Invalid(_))
        ));

        let instant = "transition:\n  duration_ms: 0\n";
        assert!(matches!(
            SplashConfig::from_yaml(instant),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_widest_frame_range_loads() {
        let yaml = "animation:\n  start: 0\n  end: 4294967295\n";
        let config = SplashConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.animation.frame_count(), 4_294_967_296);
    }
}
