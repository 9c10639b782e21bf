pub mod collision;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod levels;
pub mod movement;
pub mod player;
pub mod scoring;
pub mod simulation;

use serde::{Deserialize, Serialize};

use hopper_core::controls::{ControlLatch, ControlSignals};
use hopper_core::level::LevelProvider;

use config::HopperConfig;
use levels::BuiltinLevels;
use movement::JumpKind;
pub use simulation::{SimulationState, step};

/// Something collaborators (audio, HUD) may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Jumped { kind: JumpKind },
    Dashed,
    Landed,
    EnemyStomped { id: String },
    PlayerHit { damage: i32, health: i32 },
    GameOver,
    Restarted,
}

/// Result of one call to [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub score_delta: i32,
    pub events: Vec<SimEvent>,
    /// Health reached zero during this tick.
    pub game_over: bool,
}

/// Owns a run: configuration, content provider, state and pending input.
pub struct Simulation {
    config: HopperConfig,
    provider: Box<dyn LevelProvider>,
    state: SimulationState,
    pending: ControlLatch,
}

impl Simulation {
    /// Level 1 from `provider`, waiting in `Ready`.
    pub fn new(provider: impl LevelProvider + 'static, config: HopperConfig) -> Self {
        let state = SimulationState::new(1, &provider, &config);
        Self {
            config,
            provider: Box::new(provider),
            state,
            pending: ControlLatch::new(),
        }
    }

    pub fn with_builtin_levels(config: HopperConfig) -> Self {
        Self::new(BuiltinLevels, config)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &HopperConfig {
        &self.config
    }

    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    pub fn restart(&mut self) {
        self.pending = ControlLatch::new();
        self.state.restart(self.provider.as_ref(), &self.config);
    }

    pub fn advance_level(&mut self) {
        self.pending = ControlLatch::new();
        self.state.advance_level(self.provider.as_ref(), &self.config);
    }

    pub fn end(&mut self) {
        self.state.end();
    }

    /// Queue a raw input frame for the next [`Simulation::tick`].
    pub fn push_input(&mut self, frame: ControlSignals) {
        self.pending.push(frame);
    }

    /// Advance using every frame queued since the last tick. A zero,
    /// negative or non-finite `delta` is a no-op that keeps the queue.
    pub fn tick(&mut self, delta: f32) -> TickOutcome {
        if !delta.is_finite() || delta <= 0.0 {
            return TickOutcome::default();
        }
        let input = self.pending.take();
        self.step(&input, delta)
    }

    /// Advance with an explicit control snapshot.
    pub fn step(&mut self, input: &ControlSignals, delta: f32) -> TickOutcome {
        self.state
            .advance(input, delta, self.provider.as_ref(), &self.config)
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        self.state.snapshot()
    }

    /// Replace the current state with a decoded snapshot. On error the
    /// current state is kept.
    pub fn apply_snapshot(&mut self, bytes: &[u8]) -> Result<(), rmp_serde::decode::Error> {
        self.state = SimulationState::from_snapshot(bytes)?;
        Ok(())
    }
}
