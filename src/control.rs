//! The control loop.
//!
//! One object owns the status LED, the stepper and the delay provider for
//! the whole process lifetime and cycles them forever: LED on, a burst of
//! backward single-coil steps with the configured pause after each, LED
//! off, one more pause. Single-threaded, fully blocking; the only
//! suspension points are the timed sleeps.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::LoopConfig;
use crate::error::{MotorError, Result};
use crate::motor::{Direction, StepStyle, StepperDriver};

/// Blink-and-step loop over one LED, one stepper and one delay provider.
///
/// Generic over:
/// - `LED`: status LED line (must implement `OutputPin`)
/// - `MOTOR`: stepper backend (must implement [`StepperDriver`])
/// - `DELAY`: delay provider (must implement `DelayNs`)
pub struct ControlLoop<LED, MOTOR, DELAY>
where
    LED: OutputPin,
    MOTOR: StepperDriver,
    DELAY: DelayNs,
{
    /// Status LED line.
    led: LED,

    /// Stepper backend.
    motor: MOTOR,

    /// Delay provider for step and blink pacing.
    delay: DELAY,

    /// The two pacing constants, validated at construction.
    config: LoopConfig,

    /// Pause between steps and after LED-off, precomputed from the config.
    pause_ns: u32,
}

impl<LED, MOTOR, DELAY> ControlLoop<LED, MOTOR, DELAY>
where
    LED: OutputPin,
    MOTOR: StepperDriver,
    DELAY: DelayNs,
{
    /// Take ownership of the hardware and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(led: LED, motor: MOTOR, delay: DELAY, config: LoopConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            led,
            motor,
            delay,
            pause_ns: config.delay_ns(),
            config,
        })
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Execute exactly one iteration of the loop.
    ///
    /// LED on, `steps` backward single-coil steps with a pause after each,
    /// LED off, one trailing pause. Every step command lands strictly
    /// inside the LED-on window.
    ///
    /// # Errors
    ///
    /// The first pin or bus failure aborts the iteration and propagates.
    pub fn run_once(&mut self) -> Result<()> {
        self.led.set_high().map_err(|_| MotorError::Pin)?;

        for _ in 0..self.config.steps {
            self.motor.step(Direction::Backward, StepStyle::Single)?;
            self.delay.delay_ns(self.pause_ns);
        }

        self.led.set_low().map_err(|_| MotorError::Pin)?;
        self.delay.delay_ns(self.pause_ns);

        Ok(())
    }

    /// Run forever.
    ///
    /// Never returns `Ok`: the success type is uninhabited. The only way
    /// out is a hardware error, which the caller lets terminate the
    /// process; there is no retry or recovery.
    pub fn run(mut self) -> Result<Infallible> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "control loop: {} step(s) per blink, {} ns pause",
            self.config.steps,
            self.pause_ns
        );

        loop {
            self.run_once()?;
        }
    }

    /// Dismantle the loop and hand the hardware back.
    pub fn into_parts(self) -> (LED, MOTOR, DELAY) {
        (self.led, self.motor, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    /// Stepper that counts commands and never fails.
    #[derive(Default)]
    struct CountingStepper {
        commands: Vec<(Direction, StepStyle)>,
    }

    impl StepperDriver for CountingStepper {
        fn step(&mut self, direction: Direction, style: StepStyle) -> core::result::Result<(), MotorError> {
            self.commands.push((direction, style));
            Ok(())
        }

        fn release(&mut self) -> core::result::Result<(), MotorError> {
            Ok(())
        }
    }

    /// Stepper that fails on the nth command.
    struct FailingStepper {
        remaining_ok: u32,
    }

    impl StepperDriver for FailingStepper {
        fn step(&mut self, _: Direction, _: StepStyle) -> core::result::Result<(), MotorError> {
            if self.remaining_ok == 0 {
                return Err(MotorError::Bus);
            }
            self.remaining_ok -= 1;
            Ok(())
        }

        fn release(&mut self) -> core::result::Result<(), MotorError> {
            Ok(())
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut led = PinMock::new(&[]);
        let result = ControlLoop::new(
            led.clone(),
            CountingStepper::default(),
            NoopDelay,
            LoopConfig {
                delay_secs: 0.001,
                steps: 0,
            },
        );
        assert!(matches!(result.err(), Some(Error::Config(_))));
        led.done();
    }

    #[test]
    fn test_one_iteration_toggles_led_once() {
        let expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut led = PinMock::new(&expectations);

        let mut ctl = ControlLoop::new(
            led.clone(),
            CountingStepper::default(),
            NoopDelay,
            LoopConfig::default(),
        )
        .unwrap();
        ctl.run_once().unwrap();

        let (_, motor, _) = ctl.into_parts();
        assert_eq!(motor.commands, vec![(Direction::Backward, StepStyle::Single)]);
        led.done();
    }

    #[test]
    fn test_step_failure_propagates() {
        let expectations = [PinTransaction::set(PinState::High)];
        let mut led = PinMock::new(&expectations);

        let mut ctl = ControlLoop::new(
            led.clone(),
            FailingStepper { remaining_ok: 2 },
            NoopDelay,
            LoopConfig::new(0.001, 5).unwrap(),
        )
        .unwrap();

        assert_eq!(
            ctl.run_once().err(),
            Some(Error::Motor(MotorError::Bus))
        );
        led.done();
    }
}
