//! PCA9685 motor shield backend.
//!
//! Drives an Adafruit-style motor shield: a PCA9685 16-channel PWM chip at
//! a fixed I2C address feeding dual H-bridges. The stepper on terminals
//! M1/M2 occupies the six contiguous channels 8..=13, so every step is one
//! auto-increment register burst.
//!
//! Generic over `embedded_hal::i2c::I2c`; all bus failures surface as
//! [`MotorError::Bus`] and are fatal to the caller.

use embedded_hal::i2c::I2c;

use crate::error::MotorError;

use super::sequence::StepSequencer;
use super::{Direction, StepStyle, StepperDriver};

/// Fixed shield address on the system bus.
const SHIELD_ADDR: u8 = 0x60;

/// MODE1 register.
const MODE1: u8 = 0x00;
/// Prescale register (writable only while sleeping).
const PRESCALE: u8 = 0xFE;
/// First LED output register; each channel takes four registers.
const LED0_ON_L: u8 = 0x06;

/// MODE1: oscillator off.
const MODE1_SLEEP: u8 = 0x10;
/// MODE1: register auto-increment.
const MODE1_AUTO_INC: u8 = 0x20;

/// Prescale for the shield's 1.6 kHz PWM: 25 MHz / (4096 * 1600) - 1.
const PRESCALE_1600HZ: u8 = 0x03;

/// Stepper on terminals M1/M2: first of six contiguous channels.
///
/// Channel layout: 8 = winding A PWM, 9 = AIN2, 10 = AIN1, 11 = BIN1,
/// 12 = BIN2, 13 = winding B PWM.
const STEPPER1_FIRST_CHANNEL: u8 = 8;

/// Indices of the coil-lead channels within the six-channel burst, in the
/// sequencer's lead order (AIN2, BIN1, AIN1, BIN2).
const LEAD_SLOTS: [usize; 4] = [1, 3, 2, 4];

/// Indices of the two winding PWM channels within the burst.
const PWM_SLOTS: [usize; 2] = [0, 5];

/// Register burst for six channels: start register plus four bytes each.
type ChannelBurst = [u8; 1 + 6 * 4];

/// The motor shield, owning the bus.
pub struct MotorKit<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> MotorKit<I2C> {
    /// Bring up the shield's PWM chip.
    ///
    /// Puts the oscillator to sleep, programs the 1.6 kHz prescale, then
    /// wakes with auto-increment enabled. Any bus failure here is fatal.
    pub fn new(mut i2c: I2C) -> Result<Self, MotorError> {
        i2c.write(SHIELD_ADDR, &[MODE1, MODE1_SLEEP])
            .map_err(|_| MotorError::Bus)?;
        i2c.write(SHIELD_ADDR, &[PRESCALE, PRESCALE_1600HZ])
            .map_err(|_| MotorError::Bus)?;
        i2c.write(SHIELD_ADDR, &[MODE1, MODE1_AUTO_INC])
            .map_err(|_| MotorError::Bus)?;

        Ok(Self { i2c })
    }

    /// Hand out the stepper on terminals M1/M2, consuming the kit.
    ///
    /// The stepper owns the bus for the rest of the process lifetime; this
    /// is a single-motor system.
    pub fn stepper1(self) -> Stepper<I2C> {
        Stepper {
            i2c: self.i2c,
            sequencer: StepSequencer::new(),
            first_channel: STEPPER1_FIRST_CHANNEL,
        }
    }
}

/// One stepper channel of the shield.
///
/// Created via [`MotorKit::stepper1`]. Tracks the electrical phase across
/// steps and writes the full six-channel state on every step.
pub struct Stepper<I2C> {
    i2c: I2C,
    sequencer: StepSequencer,
    first_channel: u8,
}

impl<I2C: I2c> Stepper<I2C> {
    /// Give the bus back, e.g. to shut the shield down elsewhere.
    pub fn into_inner(self) -> I2C {
        self.i2c
    }

    /// Current electrical half-phase (0..8), for diagnostics.
    #[inline]
    pub fn half_phase(&self) -> u8 {
        self.sequencer.half_phase()
    }

    fn write_channels(&mut self, leads: [bool; 4], pwm_on: bool) -> Result<(), MotorError> {
        let mut burst: ChannelBurst = [0; 25];
        burst[0] = LED0_ON_L + 4 * self.first_channel;

        let mut set_slot = |slot: usize, on: bool| {
            let regs = &mut burst[1 + slot * 4..1 + slot * 4 + 4];
            // Full on drives ON_H bit 4, full off drives OFF_H bit 4
            if on {
                regs.copy_from_slice(&[0x00, 0x10, 0x00, 0x00]);
            } else {
                regs.copy_from_slice(&[0x00, 0x00, 0x00, 0x10]);
            }
        };

        for slot in PWM_SLOTS {
            set_slot(slot, pwm_on);
        }
        for (lead, slot) in LEAD_SLOTS.into_iter().enumerate() {
            set_slot(slot, leads[lead]);
        }

        self.i2c
            .write(SHIELD_ADDR, &burst)
            .map_err(|_| MotorError::Bus)
    }
}

impl<I2C: I2c> StepperDriver for Stepper<I2C> {
    fn step(&mut self, direction: Direction, style: StepStyle) -> Result<(), MotorError> {
        let leads = self.sequencer.advance(direction, style);
        self.write_channels(leads, true)
    }

    fn release(&mut self) -> Result<(), MotorError> {
        self.write_channels([false; 4], false)
    }
}
