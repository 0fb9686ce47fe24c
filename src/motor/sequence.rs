//! Coil-phase sequencing.
//!
//! Pure state machine that turns "one step in this direction and style"
//! into the energize pattern for the four winding leads. Kept free of any
//! bus I/O so it can be tested exhaustively on the host.

use super::{Direction, StepStyle};

/// Half-phases in one full electrical cycle.
const HALF_PHASES: i8 = 8;

/// Energize patterns indexed by half-phase.
///
/// Lead order is the shield's coil ordering: AIN2, BIN1, AIN1, BIN2.
/// Even half-phases energize one lead, odd half-phases two adjacent leads.
const PATTERNS: [[bool; 4]; 8] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Tracks the motor's electrical phase across steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepSequencer {
    half_phase: i8,
}

impl StepSequencer {
    /// Start at phase zero (no step issued yet).
    pub const fn new() -> Self {
        Self { half_phase: 0 }
    }

    /// Advance one step and return the lead pattern to drive.
    ///
    /// `Single` and `Double` move a full phase (two half-phases),
    /// `Interleave` a half-phase. When the style changes between calls the
    /// phase snaps one extra half-phase so single-coil steps always land on
    /// one-lead patterns and double-coil steps on two-lead patterns.
    pub fn advance(&mut self, direction: Direction, style: StepStyle) -> [bool; 4] {
        let magnitude: i8 = match style {
            StepStyle::Interleave => 1,
            StepStyle::Single | StepStyle::Double => 2,
        };
        let sign: i8 = match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };

        let mut next = (self.half_phase + sign * magnitude).rem_euclid(HALF_PHASES);

        let parity = match style {
            StepStyle::Single => Some(0),
            StepStyle::Double => Some(1),
            StepStyle::Interleave => None,
        };
        if let Some(parity) = parity {
            if next % 2 != parity {
                next = (next + sign).rem_euclid(HALF_PHASES);
            }
        }

        self.half_phase = next;
        PATTERNS[next as usize]
    }

    /// Current half-phase (0..8).
    #[inline]
    pub fn half_phase(&self) -> u8 {
        self.half_phase as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energized(pattern: [bool; 4]) -> usize {
        pattern.iter().filter(|&&on| on).count()
    }

    #[test]
    fn test_single_cycles_one_lead_at_a_time() {
        let mut seq = StepSequencer::new();
        for _ in 0..8 {
            let pattern = seq.advance(Direction::Forward, StepStyle::Single);
            assert_eq!(energized(pattern), 1);
        }
    }

    #[test]
    fn test_single_forward_order() {
        let mut seq = StepSequencer::new();
        let leads: Vec<usize> = (0..4)
            .map(|_| {
                let pattern = seq.advance(Direction::Forward, StepStyle::Single);
                pattern.iter().position(|&on| on).unwrap()
            })
            .collect();
        assert_eq!(leads, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_single_backward_reverses_order() {
        let mut seq = StepSequencer::new();
        let leads: Vec<usize> = (0..4)
            .map(|_| {
                let pattern = seq.advance(Direction::Backward, StepStyle::Single);
                pattern.iter().position(|&on| on).unwrap()
            })
            .collect();
        assert_eq!(leads, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_forward_then_backward_returns_to_start() {
        let mut seq = StepSequencer::new();
        seq.advance(Direction::Forward, StepStyle::Single);
        seq.advance(Direction::Backward, StepStyle::Single);
        assert_eq!(seq.half_phase(), 0);
    }

    #[test]
    fn test_double_energizes_two_leads() {
        let mut seq = StepSequencer::new();
        for _ in 0..8 {
            let pattern = seq.advance(Direction::Forward, StepStyle::Double);
            assert_eq!(energized(pattern), 2);
        }
    }

    #[test]
    fn test_interleave_half_steps_through_all_phases() {
        let mut seq = StepSequencer::new();
        let mut seen = [false; 8];
        for _ in 0..8 {
            seq.advance(Direction::Forward, StepStyle::Interleave);
            seen[seq.half_phase() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_style_change_snaps_parity() {
        let mut seq = StepSequencer::new();
        seq.advance(Direction::Forward, StepStyle::Interleave);
        // Odd half-phase; a single-coil step must land back on an even one
        let pattern = seq.advance(Direction::Forward, StepStyle::Single);
        assert_eq!(energized(pattern), 1);
        assert_eq!(seq.half_phase() % 2, 0);
    }
}
