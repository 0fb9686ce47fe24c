//! Stepper motor drivers.
//!
//! The control loop only ever sees the [`StepperDriver`] trait; the
//! concrete backend for the Adafruit-style PCA9685 motor shield lives in
//! [`motorkit`].

mod sequence;

pub mod motorkit;

pub use motorkit::{MotorKit, Stepper};
pub use sequence::StepSequencer;

use crate::error::MotorError;

/// Rotational sense for a step, as defined by the driver's coil ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Traverse the coil cycle in ascending phase order.
    Forward,
    /// Traverse the coil cycle in descending phase order.
    Backward,
}

/// Coil energize pattern used for each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepStyle {
    /// One coil at a time (lower torque, lower power).
    Single,
    /// Two adjacent coils at a time (full torque).
    Double,
    /// Alternate between one and two coils (half steps).
    Interleave,
}

/// A stepper motor reachable through some hardware backend.
///
/// The one seam the control loop is generic over. Implementations advance
/// the physical motor by exactly one step per [`step`](Self::step) call;
/// failures are fatal and bubble up unchanged.
pub trait StepperDriver {
    /// Advance one step in the given direction and style.
    fn step(&mut self, direction: Direction, style: StepStyle) -> Result<(), MotorError>;

    /// De-energize all coils so the motor spins freely.
    fn release(&mut self) -> Result<(), MotorError>;
}
