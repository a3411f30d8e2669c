//! # Steering fault avoidance
//!
//! The EPS faults if torque is applied while the steering angle is above 90
//! degrees for more than a second. Once actuation near the limit has gone on
//! for too long the request bit is cut for a few ticks, which resets the
//! EPS's own timer without releasing the wheel.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

// All slightly below the EPS thresholds.

/// Steering angle above which actuation counts towards the fault.
///
/// Units: degrees
pub const MAX_ANGLE_DEG: f64 = 85.0;

/// Number of ticks actuation may continue above `MAX_ANGLE_DEG`.
pub const MAX_ANGLE_FRAMES: u32 = 89;

/// Number of ticks the request is cut for once `MAX_ANGLE_FRAMES` is
/// exceeded.
pub const MAX_ANGLE_CONSECUTIVE_FRAMES: u32 = 2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Counter based hold-off on the steering request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultAvoidance {
    /// Number of ticks the fault condition has held while requesting.
    above_limit_frames: u32,

    /// Ticks of actuation allowed above the limit.
    max_frames: u32,

    /// Ticks the request is cut for.
    max_consecutive_frames: u32
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FaultAvoidance {
    pub fn new(max_frames: u32, max_consecutive_frames: u32) -> Self {
        Self {
            above_limit_frames: 0,
            max_frames,
            max_consecutive_frames
        }
    }

    /// Update the counter and return whether the request may be sent.
    ///
    /// The counter only advances while both `fault_condition` and `request`
    /// hold, and resets otherwise. Once it exceeds `max_frames` the request is
    /// cut until it reaches `max_frames + max_consecutive_frames`, after which
    /// it starts again from zero.
    pub fn update(&mut self, fault_condition: bool, request: bool) -> bool {
        let mut allow = request;

        if request && fault_condition {
            self.above_limit_frames += 1;
        }
        else {
            self.above_limit_frames = 0;
        }

        if self.above_limit_frames > self.max_frames {
            if allow {
                debug!(
                    "Fault avoidance cutting steer request ({} ticks above limit)",
                    self.above_limit_frames
                );
            }
            allow = false;
        }

        if self.above_limit_frames >= self.max_frames + self.max_consecutive_frames {
            self.above_limit_frames = 0;
        }

        allow
    }

    /// Number of consecutive ticks the fault condition has held.
    pub fn above_limit_frames(&self) -> u32 {
        self.above_limit_frames
    }
}

impl Default for FaultAvoidance {
    fn default() -> Self {
        Self::new(MAX_ANGLE_FRAMES, MAX_ANGLE_CONSECUTIVE_FRAMES)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cut_after_max_frames() {
        let mut fa = FaultAvoidance::default();

        // Allowed for the first MAX_ANGLE_FRAMES ticks
        for i in 0..MAX_ANGLE_FRAMES {
            assert!(fa.update(true, true), "tick {}", i);
        }

        // Cut for the next MAX_ANGLE_CONSECUTIVE_FRAMES ticks
        for i in 0..MAX_ANGLE_CONSECUTIVE_FRAMES {
            assert!(!fa.update(true, true), "cut tick {}", i);
        }

        // The counter restarted, so actuation resumes
        assert_eq!(fa.above_limit_frames(), 0);
        assert!(fa.update(true, true));
        assert_eq!(fa.above_limit_frames(), 1);
    }

    #[test]
    fn test_reset_when_condition_clears() {
        let mut fa = FaultAvoidance::default();

        for _ in 0..50 {
            assert!(fa.update(true, true));
        }
        assert_eq!(fa.above_limit_frames(), 50);

        // Dropping below the angle resets the counter
        assert!(fa.update(false, true));
        assert_eq!(fa.above_limit_frames(), 0);

        // So does not requesting
        fa.update(true, true);
        assert!(!fa.update(true, false));
        assert_eq!(fa.above_limit_frames(), 0);
    }

    #[test]
    fn test_never_allows_without_request() {
        let mut fa = FaultAvoidance::default();

        for _ in 0..200 {
            assert!(!fa.update(true, false));
            assert_eq!(fa.above_limit_frames(), 0);
        }
    }
}
