use serde::{Deserialize, Serialize};

/// Abstract control snapshot for one simulation tick.
///
/// `left`, `right` and `jump_held` are level signals; the `*_pressed` fields
/// are edge-triggered and true only on the tick the control went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSignals {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub dash_pressed: bool,
    pub restart_pressed: bool,
}

impl ControlSignals {
    pub fn idle() -> Self {
        Self::default()
    }

    /// -1 for left, +1 for right, 0 for neither. Left wins when both are held.
    pub fn horizontal(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }

    /// Same level signals with every edge cleared.
    pub fn without_edges(&self) -> Self {
        Self {
            jump_pressed: false,
            dash_pressed: false,
            restart_pressed: false,
            ..*self
        }
    }

    pub fn has_edges(&self) -> bool {
        self.jump_pressed || self.dash_pressed || self.restart_pressed
    }
}

/// Raw held state of each control as sampled from a device mapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeldControls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub restart: bool,
}

/// Derives edge-triggered presses from successive held snapshots.
#[derive(Debug, Clone, Default)]
pub struct ControlTracker {
    previous: HeldControls,
}

impl ControlTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, held: HeldControls) -> ControlSignals {
        let signals = ControlSignals {
            left: held.left,
            right: held.right,
            jump_held: held.jump,
            jump_pressed: held.jump && !self.previous.jump,
            dash_pressed: held.dash && !self.previous.dash,
            restart_pressed: held.restart && !self.previous.restart,
        };
        self.previous = held;
        signals
    }
}

/// Collects input frames that arrive between simulation ticks.
///
/// Level signals always take the most recent frame. Edge flags accumulate
/// until the next `take`, so a press seen in frame N survives a release in
/// frame N+1 that lands before the tick runs.
#[derive(Debug, Clone, Default)]
pub struct ControlLatch {
    pending: Option<ControlSignals>,
}

impl ControlLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: ControlSignals) {
        match self.pending.as_mut() {
            Some(existing) => {
                existing.left = frame.left;
                existing.right = frame.right;
                existing.jump_held = frame.jump_held;
                existing.jump_pressed |= frame.jump_pressed;
                existing.dash_pressed |= frame.dash_pressed;
                existing.restart_pressed |= frame.restart_pressed;
            },
            None => self.pending = Some(frame),
        }
    }

    /// Merged signals for the next tick; idle when nothing arrived.
    pub fn take(&mut self) -> ControlSignals {
        self.pending.take().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
