//! Blink-and-step demo.
//!
//! Wires the control loop to mock hardware and runs a handful of
//! iterations so the LED/step interleaving is visible on the console.
//! On a real board the mocks are replaced by the platform HAL's pin,
//! I2C bus and delay, and `run()` is called instead of `run_once()`.

use stepper_blink::{ControlLoop, Direction, LoopConfig, StepStyle, StepperDriver};

/// Mock delay provider for demonstration.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        // In real code, this would use a hardware timer
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Mock output pin for demonstration.
struct MockPin {
    state: bool,
}

impl MockPin {
    fn new() -> Self {
        Self { state: false }
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        println!("LED  -> on");
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        println!("LED  -> off");
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

/// Stepper that prints each command instead of talking to a shield.
struct ConsoleStepper {
    total_steps: u32,
}

impl StepperDriver for ConsoleStepper {
    fn step(
        &mut self,
        direction: Direction,
        style: StepStyle,
    ) -> Result<(), stepper_blink::error::MotorError> {
        self.total_steps += 1;
        println!("STEP -> {:?} / {:?} (total {})", direction, style, self.total_steps);
        Ok(())
    }

    fn release(&mut self) -> Result<(), stepper_blink::error::MotorError> {
        println!("STEP -> released");
        Ok(())
    }
}

fn main() {
    println!("=== Blink-and-step demo ===\n");

    // The two constants, as they would come from a file
    let toml_content = r#"
delay_secs = 0.001
steps = 3
"#;

    let config = stepper_blink::config::parse_config(toml_content).expect("Failed to parse config");
    println!(
        "Config: {} step(s) per blink, {} s pause\n",
        config.steps, config.delay_secs
    );

    let mut ctl = ControlLoop::new(MockPin::new(), ConsoleStepper { total_steps: 0 }, MockDelay, config)
        .expect("Failed to build control loop");

    for iteration in 1..=4 {
        println!("--- iteration {} ---", iteration);
        ctl.run_once().expect("Hardware fault");
    }

    println!("\n=== Demo complete ===");
    println!("On hardware, call ctl.run() instead: it never returns.");
}
