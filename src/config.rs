//! Loop pacing configuration.
//!
//! The system has exactly two knobs, both fixed for the process lifetime:
//! the inter-step/blink delay and the number of steps per iteration. They
//! can be loaded from a TOML file (with the `std` feature) or constructed
//! directly.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Seconds the original demo slept between steps and blinks.
const DEFAULT_DELAY_SECS: f32 = 0.001;

/// Steps per loop iteration in the original demo.
const DEFAULT_STEPS: u32 = 1;

/// The two pacing constants of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopConfig {
    /// Seconds slept after each motor step and after the LED turns off.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f32,

    /// Motor steps issued per loop iteration, while the LED is on.
    #[serde(default = "default_steps")]
    pub steps: u32,
}

fn default_delay_secs() -> f32 {
    DEFAULT_DELAY_SECS
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_DELAY_SECS,
            steps: DEFAULT_STEPS,
        }
    }
}

impl LoopConfig {
    /// Create a configuration and validate it in one go.
    pub fn new(delay_secs: f32, steps: u32) -> Result<Self> {
        let config = Self { delay_secs, steps };
        config.validate()?;
        Ok(config)
    }

    /// Check the constants against their invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` is zero or `delay_secs` is not a finite
    /// positive number.
    pub fn validate(&self) -> Result<()> {
        if self.steps < 1 {
            return Err(ConfigError::InvalidSteps(self.steps).into());
        }
        if !self.delay_secs.is_finite() || self.delay_secs <= 0.0 {
            return Err(ConfigError::InvalidDelay(self.delay_secs).into());
        }
        Ok(())
    }

    /// The delay as the nanosecond count `DelayNs` consumes.
    ///
    /// Saturates at `u32::MAX` (about 4.29 s) for oversized delays.
    pub fn delay_ns(&self) -> u32 {
        let ns = (self.delay_secs * 1_000_000_000.0) as u64;
        ns.min(u32::MAX as u64) as u32
    }
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the parsed
/// constants fail validation.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_blink::load_config;
///
/// let config = load_config("blink.toml")?;
/// ```
#[cfg(feature = "std")]
pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> Result<LoopConfig> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        crate::error::Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
#[cfg(feature = "std")]
pub fn parse_config(content: &str) -> Result<LoopConfig> {
    let config: LoopConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        crate::error::Error::Config(ConfigError::ParseError(msg))
    })?;

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_match_original_demo() {
        let config = LoopConfig::default();
        assert!((config.delay_secs - 0.001).abs() < 1e-9);
        assert_eq!(config.steps, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delay_ns_conversion() {
        assert_eq!(LoopConfig::default().delay_ns(), 1_000_000);

        let half_second = LoopConfig::new(0.5, 1).unwrap();
        assert_eq!(half_second.delay_ns(), 500_000_000);
    }

    #[test]
    fn test_delay_ns_saturates() {
        // 10 s exceeds the u32 nanosecond range
        let long = LoopConfig {
            delay_secs: 10.0,
            steps: 1,
        };
        assert_eq!(long.delay_ns(), u32::MAX);
    }

    #[test]
    fn test_zero_steps_rejected() {
        match LoopConfig::new(0.001, 0) {
            Err(Error::Config(ConfigError::InvalidSteps(0))) => {}
            other => panic!("expected InvalidSteps, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_delay_rejected() {
        assert!(LoopConfig::new(0.0, 1).is_err());
        assert!(LoopConfig::new(-0.5, 1).is_err());
        assert!(LoopConfig::new(f32::NAN, 1).is_err());
        assert!(LoopConfig::new(f32::INFINITY, 1).is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_full_config() {
        let toml = r#"
delay_secs = 0.002
steps = 5
"#;

        let config = parse_config(toml).unwrap();
        assert!((config.delay_secs - 0.002).abs() < 1e-9);
        assert_eq!(config.steps, 5);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, LoopConfig::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_rejects_invalid_steps() {
        assert!(parse_config("steps = 0").is_err());
    }
}
