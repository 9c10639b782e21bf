use hopper_core::controls::ControlSignals;
use hopper_core::geometry::{Axis, Vec3};
use hopper_core::level::{LevelProvider, Platform};
use hopper_engine::config::HopperConfig;
use hopper_engine::{SimEvent, SimulationState};

pub const DT: f32 = 1.0 / 60.0;

pub fn config() -> HopperConfig {
    HopperConfig::default()
}

/// Level 1 from `provider`, already started.
pub fn playing(provider: &dyn LevelProvider) -> SimulationState {
    let mut state = SimulationState::new(1, provider, &config());
    state.start();
    state
}

/// Run `ticks` ticks with the same input, collecting every event.
pub fn run(
    state: &mut SimulationState,
    input: ControlSignals,
    ticks: usize,
    provider: &dyn LevelProvider,
) -> Vec<SimEvent> {
    let cfg = config();
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(state.advance(&input, DT, provider, &cfg).events);
    }
    events
}

/// Put the player flush on top of `platform` at horizontal position `x`,
/// using the same expression the resolver snaps to.
pub fn rest_on(state: &mut SimulationState, platform: &Platform, x: f32) {
    let reach = state.player.size.half(Axis::Y) + platform.size.half(Axis::Y);
    state.player.position = Vec3::new(x, platform.position.y + reach, 0.0);
    state.player.velocity = Vec3::ZERO;
    state.player.grounded = true;
    state.timers.was_grounded = true;
}

pub fn count_jumps(events: &[SimEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::Jumped { .. }))
        .count()
}
