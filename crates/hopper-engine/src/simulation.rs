use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hopper_core::controls::ControlSignals;
use hopper_core::level::{LevelContent, LevelProvider, Platform};
use hopper_core::phase::GamePhase;

use crate::collision;
use crate::combat::{self, Contact};
use crate::config::HopperConfig;
use crate::enemy::{self, EnemyState};
use crate::movement::{self, MovementTimers};
use crate::player::PlayerState;
use crate::scoring;
use crate::{SimEvent, TickOutcome};

/// Complete authoritative state of one run.
///
/// Everything a tick reads or writes lives here, so cloning it forks the
/// simulation and encoding it captures the run exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub phase: GamePhase,
    pub level: u32,
    pub score: i32,
    pub player: PlayerState,
    pub timers: MovementTimers,
    /// Keyed by id so iteration order is stable and removal is direct.
    pub enemies: BTreeMap<String, EnemyState>,
    pub platforms: Vec<Platform>,
}

impl SimulationState {
    /// Load `level` from the provider and wait in `Ready`.
    pub fn new(level: u32, provider: &dyn LevelProvider, config: &HopperConfig) -> Self {
        let mut state = Self {
            phase: GamePhase::Ready,
            level,
            score: 0,
            player: PlayerState::spawn(config),
            timers: MovementTimers::default(),
            enemies: BTreeMap::new(),
            platforms: Vec::new(),
        };
        state.load(provider.content(level), config);
        state
    }

    fn load(&mut self, content: LevelContent, config: &HopperConfig) {
        self.player = PlayerState::spawn(config);
        self.timers = MovementTimers::default();
        self.platforms = content.platforms;
        self.enemies.clear();
        for spawn in &content.enemies {
            if self.enemies.insert(spawn.id.clone(), EnemyState::from_spawn(spawn)).is_some() {
                tracing::warn!(
                    id = %spawn.id,
                    "Duplicate enemy id in level content, keeping the last"
                );
            }
        }
    }

    /// Ready to Playing. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.phase = GamePhase::Playing;
        tracing::info!(level = self.level, "Run started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Replace player, timers and content with fresh copies for the current
    /// level and resume play. Score and level carry over.
    pub fn restart(&mut self, provider: &dyn LevelProvider, config: &HopperConfig) {
        self.load(provider.content(self.level), config);
        self.phase = GamePhase::Playing;
        tracing::info!(level = self.level, score = self.score, "Run restarted");
    }

    /// Move to the next level with fresh content. Score carries over.
    pub fn advance_level(&mut self, provider: &dyn LevelProvider, config: &HopperConfig) {
        self.level = self.level.saturating_add(1);
        self.load(provider.content(self.level), config);
        self.phase = GamePhase::Playing;
        tracing::info!(level = self.level, score = self.score, "Advanced level");
    }

    /// Terminate the run. Only a restart leaves `Ended`.
    pub fn end(&mut self) {
        if self.phase != GamePhase::Ended {
            self.phase = GamePhase::Ended;
            tracing::info!(level = self.level, score = self.score, "Game over");
        }
    }

    /// Advance by `delta` seconds.
    ///
    /// Non-positive or non-finite deltas are ignored. A restart press is
    /// honored in every phase; otherwise nothing moves unless `Playing`.
    /// Long ticks are split into equal substeps no longer than
    /// `world.max_step` (up to `world.max_substeps`), with edge-triggered
    /// signals delivered on the first substep only.
    pub fn advance(
        &mut self,
        input: &ControlSignals,
        delta: f32,
        provider: &dyn LevelProvider,
        config: &HopperConfig,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !delta.is_finite() || delta <= 0.0 {
            return outcome;
        }

        if input.restart_pressed {
            self.restart(provider, config);
            outcome.events.push(SimEvent::Restarted);
            return outcome;
        }

        if !self.phase.is_active() {
            return outcome;
        }

        let substeps = substep_count(delta, config);
        let sub_dt = delta / substeps as f32;
        let held = input.without_edges();
        for i in 0..substeps {
            let signals = if i == 0 { *input } else { held };
            self.substep(&signals, sub_dt, config, &mut outcome);
            if !self.phase.is_active() {
                break;
            }
        }

        outcome
    }

    fn substep(
        &mut self,
        input: &ControlSignals,
        dt: f32,
        config: &HopperConfig,
        outcome: &mut TickOutcome,
    ) {
        self.player.tick_invincibility(dt);

        let report = movement::tick_player(
            &mut self.player,
            &mut self.timers,
            input,
            &self.platforms,
            config,
            dt,
        );
        if report.dashed {
            tracing::debug!(direction = self.player.dash_direction, "Dash");
            self.award(scoring::dash_points(&config.scoring), outcome);
            outcome.events.push(SimEvent::Dashed);
        }
        if let Some(kind) = report.jump {
            tracing::debug!(?kind, remaining = self.player.jumps_remaining, "Jump");
            self.award(scoring::jump_points(kind, &config.scoring), outcome);
            outcome.events.push(SimEvent::Jumped { kind });
        }
        if report.landed {
            tracing::debug!(y = self.player.position.y, "Landed");
            outcome.events.push(SimEvent::Landed);
        }

        for enemy in self.enemies.values_mut() {
            enemy::tick_enemy(enemy, &self.platforms, config, dt);
        }

        self.resolve_contacts(config, outcome);
    }

    /// Classify every live enemy against the player as it stood after
    /// movement, then apply stomps before the first damaging hit.
    fn resolve_contacts(&mut self, config: &HopperConfig, outcome: &mut TickOutcome) {
        let player = &self.player;
        let mut stomped = Vec::new();
        let mut hit = None;
        for (id, enemy) in self.enemies.iter().filter(|(_, e)| e.alive) {
            match combat::classify_contact(
                player.position,
                player.size,
                player.velocity,
                enemy.position,
                enemy.size,
                &config.enemy,
            ) {
                Contact::Stomp => stomped.push(id.clone()),
                Contact::Hit { direction } if hit.is_none() => hit = Some(direction),
                Contact::Hit { .. } => {},
                Contact::None => {},
            }
        }

        if !stomped.is_empty() {
            combat::apply_stomp(&mut self.player, &config.enemy);
            self.timers.jump_hold.close();
            self.award(scoring::stomp_points(stomped.len(), &config.scoring), outcome);
        }
        for id in stomped {
            if let Some(mut enemy) = self.enemies.remove(&id) {
                enemy.alive = false;
                tracing::debug!(%id, "Enemy stomped");
                outcome.events.push(SimEvent::EnemyStomped { id });
            }
        }

        if let Some(direction) = hit
            && combat::apply_hit(&mut self.player, direction, config)
        {
            tracing::debug!(health = self.player.health, "Player hit");
            // Knockback is not a ledge walk-off.
            self.timers.was_grounded = false;
            self.timers.coyote.clear();
            self.timers.dash_active.clear();
            self.timers.jump_hold.close();
            outcome.events.push(SimEvent::PlayerHit {
                damage: config.enemy.contact_damage,
                health: self.player.health,
            });
            if !self.player.is_alive() {
                self.end();
                outcome.events.push(SimEvent::GameOver);
                outcome.game_over = true;
            }
        }
    }

    fn award(&mut self, points: i32, outcome: &mut TickOutcome) {
        self.score = self.score.saturating_add(points);
        outcome.score_delta = outcome.score_delta.saturating_add(points);
    }

    /// Diagnostic ground check: is a platform top within
    /// `world.grounded_tolerance` of the player's feet? Does not affect play.
    pub fn player_supported(&self, config: &HopperConfig) -> bool {
        collision::check_grounded(
            self.player.position,
            self.player.size,
            &self.platforms,
            config.world.grounded_tolerance,
        )
    }

    /// Live enemies in id order.
    pub fn live_enemies(&self) -> impl Iterator<Item = &EnemyState> {
        self.enemies.values().filter(|e| e.alive)
    }

    /// Encode the full state as MessagePack.
    pub fn snapshot(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }

    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}

/// `ceil(delta / max_step)` clamped to `1..=max_substeps`.
pub fn substep_count(delta: f32, config: &HopperConfig) -> u32 {
    let max_substeps = config.world.max_substeps.max(1);
    let wanted = (delta / config.world.max_step).ceil();
    if wanted.is_finite() && wanted >= 1.0 {
        (wanted as u32).min(max_substeps)
    } else {
        1
    }
}

/// Pure form of [`SimulationState::advance`]: returns the next state and
/// leaves `state` untouched.
pub fn step(
    state: &SimulationState,
    input: &ControlSignals,
    delta: f32,
    provider: &dyn LevelProvider,
    config: &HopperConfig,
) -> (SimulationState, TickOutcome) {
    let mut next = state.clone();
    let outcome = next.advance(input, delta, provider, config);
    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_core::geometry::Vec3;
    use hopper_core::level::{Facing, StaticLevel};
    use hopper_core::test_helpers::{enemy_spawn, floor, press_jump, press_restart, static_level};

    use crate::levels::BuiltinLevels;
    use crate::movement::JumpKind;

    const DT: f32 = 1.0 / 60.0;

    fn playing(provider: &dyn LevelProvider) -> SimulationState {
        let mut state = SimulationState::new(1, provider, &HopperConfig::default());
        state.start();
        state
    }

    fn advance(
        state: &mut SimulationState,
        input: ControlSignals,
        provider: &dyn LevelProvider,
    ) -> TickOutcome {
        state.advance(&input, DT, provider, &HopperConfig::default())
    }

    /// Floor at y=0 with one enemy parked far away.
    fn arena() -> StaticLevel {
        let far = enemy_spawn("far", 15.0, 0.4, 10.0, 18.0, Facing::Right);
        static_level(vec![floor(0.0)], vec![far])
    }

    // ================================================================
    // Lifecycle
    // ================================================================

    #[test]
    fn new_state_is_ready_and_idle() {
        let provider = BuiltinLevels;
        let mut state = SimulationState::new(1, &provider, &HopperConfig::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.platforms.len(), 24);
        assert_eq!(state.enemies.len(), 6);

        let before = state.clone();
        let outcome = advance(&mut state, press_jump(), &provider);
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state, before, "Ready must not advance");
    }

    #[test]
    fn phase_transitions() {
        let provider = arena();
        let mut state = SimulationState::new(1, &provider, &HopperConfig::default());
        assert!(!state.pause());
        assert!(state.start());
        assert!(!state.start());
        assert!(state.pause());
        assert!(!state.pause());
        assert!(state.resume());
        assert_eq!(state.phase, GamePhase::Playing);
        state.end();
        assert!(state.phase.is_terminal());
        assert!(!state.resume());
    }

    #[test]
    fn paused_state_is_frozen() {
        let provider = arena();
        let mut state = playing(&provider);
        state.pause();
        let before = state.clone();
        advance(&mut state, press_jump(), &provider);
        assert_eq!(state, before);
    }

    #[test]
    fn restart_press_revives_ended_run() {
        let provider = arena();
        let mut state = playing(&provider);
        state.score = 42;
        state.player.health = 0;
        state.end();

        let outcome = advance(&mut state, press_restart(), &provider);
        assert_eq!(outcome.events, vec![SimEvent::Restarted]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 42, "Restart keeps the score");
        assert_eq!(state.player, PlayerState::spawn(&HopperConfig::default()));
    }

    #[test]
    fn advance_level_loads_next_layout() {
        let provider = BuiltinLevels;
        let mut state = playing(&provider);
        state.score = 7;
        state.advance_level(&provider, &HopperConfig::default());
        assert_eq!(state.level, 2);
        assert_eq!(state.platforms.len(), 32);
        assert_eq!(state.enemies.len(), 10);
        assert_eq!(state.score, 7);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    // ================================================================
    // Ticks
    // ================================================================

    #[test]
    fn degenerate_deltas_are_noops() {
        let provider = arena();
        let mut state = playing(&provider);
        let before = state.clone();
        let config = HopperConfig::default();
        for delta in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let outcome = state.advance(&press_jump(), delta, &provider, &config);
            assert_eq!(outcome, TickOutcome::default());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn jump_scores_and_reports() {
        let provider = arena();
        let mut state = playing(&provider);
        state.player.position = Vec3::new(0.0, 0.5, 0.0);
        state.player.grounded = true;
        let outcome = advance(&mut state, press_jump(), &provider);
        assert_eq!(
            outcome.events,
            vec![SimEvent::Jumped {
                kind: JumpKind::Ground
            }]
        );
        assert_eq!(outcome.score_delta, 1);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn long_tick_is_subdivided() {
        let config = HopperConfig::default();
        assert_eq!(substep_count(DT, &config), 1);
        assert_eq!(substep_count(0.09, &config), 3);
        assert_eq!(substep_count(10.0, &config), 8);
    }

    #[test]
    fn substeps_deliver_edges_once() {
        let provider = arena();
        let mut state = playing(&provider);
        state.player.position = Vec3::new(0.0, 0.5, 0.0);
        state.player.grounded = true;
        let config = HopperConfig::default();
        let outcome = state.advance(&press_jump(), 0.1, &provider, &config);
        let jumps = outcome
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Jumped { .. }))
            .count();
        assert_eq!(jumps, 1, "One press must yield one jump across substeps");
        assert_eq!(state.player.jumps_remaining, 1);
    }

    #[test]
    fn pure_step_leaves_input_state_untouched() {
        let provider = arena();
        let state = playing(&provider);
        let before = state.clone();
        let cfg = HopperConfig::default();
        let (next, _) = step(&state, &ControlSignals::idle(), DT, &provider, &cfg);
        assert_eq!(state, before);
        assert_ne!(next, before);
    }

    #[test]
    fn duplicate_enemy_ids_keep_one_entry() {
        let provider = static_level(
            vec![floor(0.0)],
            vec![
                enemy_spawn("twin", 1.0, 0.4, 0.0, 2.0, Facing::Left),
                enemy_spawn("twin", 5.0, 0.4, 4.0, 6.0, Facing::Right),
            ],
        );
        let state = SimulationState::new(1, &provider, &HopperConfig::default());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies["twin"].position.x, 5.0);
    }

    #[test]
    fn snapshot_restores_identical_state() {
        let provider = BuiltinLevels;
        let mut state = playing(&provider);
        for _ in 0..30 {
            advance(&mut state, press_jump(), &provider);
        }
        let bytes = state.snapshot().unwrap();
        let restored = SimulationState::from_snapshot(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn support_query_follows_the_floor() {
        let provider = arena();
        let config = HopperConfig::default();
        let mut state = playing(&provider);
        state.player.position = Vec3::new(0.0, 0.55, 0.0);
        assert!(state.player_supported(&config));
        state.player.position.y = 2.0;
        assert!(!state.player_supported(&config));
    }

    #[test]
    fn garbage_snapshot_is_rejected() {
        assert!(SimulationState::from_snapshot(&[0xc1, 0x00, 0xff]).is_err());
    }
}
