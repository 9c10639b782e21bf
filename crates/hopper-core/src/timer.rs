use serde::{Deserialize, Serialize};

/// A countdown that decays toward zero once per tick.
///
/// Replaces wall-clock callbacks: the owner advances it explicitly with the
/// tick's delta, so decay is reproducible under replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn armed(duration: f32) -> Self {
        let mut c = Self::idle();
        c.arm(duration);
        c
    }

    /// Restart at `duration`. Negative or non-finite durations leave it idle.
    pub fn arm(&mut self, duration: f32) {
        self.remaining = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = decay(self.remaining, dt);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_expired(&self) -> bool {
        !self.is_active()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Decrease `value` by `dt`, never below zero.
pub fn decay(value: f32, dt: f32) -> f32 {
    (value - dt).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_countdown_expires() {
        let mut c = Countdown::armed(0.15);
        assert!(c.is_active());
        c.tick(0.1);
        assert!(c.is_active());
        c.tick(0.1);
        assert!(c.is_expired());
        assert_eq!(c.remaining(), 0.0);
    }

    #[test]
    fn tick_never_goes_negative() {
        let mut c = Countdown::armed(0.05);
        c.tick(10.0);
        assert_eq!(c.remaining(), 0.0);
        c.tick(1.0);
        assert_eq!(c.remaining(), 0.0);
    }

    #[test]
    fn invalid_durations_stay_idle() {
        assert!(Countdown::armed(-1.0).is_expired());
        assert!(Countdown::armed(f32::NAN).is_expired());
        assert!(Countdown::armed(f32::INFINITY).is_expired());
    }

    #[test]
    fn clear_resets() {
        let mut c = Countdown::armed(1.0);
        c.clear();
        assert!(c.is_expired());
    }
}
