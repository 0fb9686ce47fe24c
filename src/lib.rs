//! # stepper-blink
//!
//! Blocking LED-blink and stepper-step control loop with embedded-hal 1.0 support.
//!
//! Drives one status LED and one stepper motor on a PCA9685-based motor
//! shield: each iteration turns the LED on, advances the motor a configured
//! number of single-coil steps backward with a fixed inter-step delay, turns
//! the LED off, and waits the same delay before repeating. The loop runs
//! until the process is killed or a hardware fault propagates out.
//!
//! ## Features
//!
//! - **embedded-hal 1.0**: `OutputPin` for the LED, `I2c` for the motor
//!   shield bus, `DelayNs` for timing
//! - **no_std compatible**: core library works without the standard library
//! - **Configuration-driven**: the two pacing constants load from TOML
//! - **Driver seam**: the loop is generic over a [`StepperDriver`] trait,
//!   so any stepper backend (or a test mock) plugs in
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_blink::{ControlLoop, LoopConfig, MotorKit};
//!
//! // Bring up the motor shield on the platform's I2C bus
//! let stepper = MotorKit::new(i2c)?.stepper1();
//!
//! // DELAY = 1 ms, STEPS = 1 per blink
//! let config = LoopConfig::default();
//!
//! // Runs forever; only a pin or bus fault gets out
//! ControlLoop::new(led_pin, stepper, delay, config)?.run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod control;
pub mod error;
pub mod motor;

// Re-exports for ergonomic API
pub use config::LoopConfig;
pub use control::ControlLoop;
pub use error::{Error, Result};
pub use motor::{Direction, MotorKit, StepStyle, Stepper, StepperDriver};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;
