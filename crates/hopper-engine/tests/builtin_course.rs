//! Smoke runs over the built-in courses through the owning `Simulation`.

#[allow(dead_code)]
mod common;

use hopper_core::controls::ControlSignals;
use hopper_core::geometry::Vec3;
use hopper_core::phase::GamePhase;
use hopper_core::test_helpers::{hold_right, press_jump};
use hopper_engine::{SimEvent, Simulation};

use common::{DT, config, count_jumps};

fn idle(sim: &mut Simulation, ticks: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.step(&ControlSignals::idle(), DT).events);
    }
    events
}

fn started() -> Simulation {
    let mut sim = Simulation::with_builtin_levels(config());
    assert!(sim.start());
    sim
}

#[test]
fn spawn_settles_on_the_ground_untouched() {
    let mut sim = started();
    let events = idle(&mut sim, 300);

    assert_eq!(events, vec![SimEvent::Landed]);
    let state = sim.state();
    assert_eq!(state.player.position, Vec3::new(0.0, -4.0, 0.0));
    assert!(state.player.grounded);
    assert_eq!(state.player.health, 3);
    assert_eq!(state.live_enemies().count(), 6);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn patrols_stay_on_their_platforms() {
    let mut sim = started();
    let spawns: Vec<_> = sim.state().enemies.values().cloned().collect();
    idle(&mut sim, 600);

    for spawn in spawns {
        let enemy = &sim.state().enemies[&spawn.id];
        assert!(
            (enemy.position.y - spawn.position.y).abs() < 0.5,
            "{} drifted vertically to {}",
            spawn.id,
            enemy.position.y
        );
        assert!(enemy.grounded, "{} is not standing on anything", spawn.id);
    }
}

#[test]
fn jump_from_the_ground_scores_once() {
    let mut sim = started();
    idle(&mut sim, 120);

    let outcome = sim.step(&press_jump(), DT);
    assert_eq!(count_jumps(&outcome.events), 1);
    assert_eq!(outcome.score_delta, 1);
    assert_eq!(sim.state().score, 1);
}

#[test]
fn running_right_hits_nothing_before_the_edge() {
    let mut sim = started();
    idle(&mut sim, 120);
    for _ in 0..30 {
        let outcome = sim.step(&hold_right(), DT);
        assert!(
            !outcome
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::PlayerHit { .. })),
            "ground run should be clear"
        );
    }
    assert!(sim.state().player.position.x > 5.0);
    assert!(sim.state().player.grounded);
}

#[test]
fn second_course_adds_the_upper_tier() {
    let mut sim = started();
    idle(&mut sim, 60);
    sim.advance_level();

    let state = sim.state();
    assert_eq!(state.level, 2);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.platforms.len(), 32);
    assert_eq!(state.enemies.len(), 10);

    let events = idle(&mut sim, 300);
    assert!(!events.iter().any(|e| matches!(e, SimEvent::PlayerHit { .. })));
    assert_eq!(sim.state().player.position, Vec3::new(0.0, -4.0, 0.0));
}

#[test]
fn pause_freezes_the_whole_course() {
    let mut sim = started();
    idle(&mut sim, 30);
    assert!(sim.pause());
    let frozen = sim.state().clone();
    idle(&mut sim, 30);
    assert_eq!(sim.state(), &frozen);
    assert!(sim.resume());
    idle(&mut sim, 1);
    assert_ne!(sim.state().enemies, frozen.enemies);
}
