use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hopper_core::controls::{ControlTracker, HeldControls};
use hopper_core::geometry::Vec3;
use hopper_core::phase::GamePhase;
use hopper_engine::config::{ConfigError, HopperConfig};
use hopper_engine::{SimEvent, Simulation};

fn default_delta() -> f32 {
    1.0 / 60.0
}

/// A scripted run: fixed tick length plus a list of held-control segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_delta")]
    pub delta: f32,
    #[serde(default, rename = "segment")]
    pub segments: Vec<Segment>,
}

/// Hold the same controls for `ticks` ticks. Presses fire on the first tick
/// of a segment whose control was up in the segment before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub ticks: u32,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub dash: bool,
    #[serde(default)]
    pub restart: bool,
}

impl Segment {
    pub fn held(&self) -> HeldControls {
        HeldControls {
            left: self.left,
            right: self.right,
            jump: self.jump,
            dash: self.dash,
            restart: self.restart,
        }
    }
}

#[derive(Debug)]
pub enum ReplayError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
    Config(ConfigError),
    Snapshot(rmp_serde::encode::Error),
    Report(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Parse(e) => write!(f, "invalid replay script: {e}"),
            Self::Invalid(m) => write!(f, "invalid replay script: {m}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Snapshot(e) => write!(f, "snapshot encoding failed: {e}"),
            Self::Report(e) => write!(f, "report encoding failed: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
            Self::Config(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

impl From<toml::de::Error> for ReplayError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for ReplayError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl ReplayScript {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ReplayError> {
        let script: Self = toml::from_str(content)?;
        if !script.delta.is_finite() || script.delta <= 0.0 {
            return Err(ReplayError::Invalid(format!(
                "delta must be positive and finite, got {}",
                script.delta
            )));
        }
        Ok(script)
    }

    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

/// How often each event kind fired during a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub jumps: u32,
    pub dashes: u32,
    pub landings: u32,
    pub stomps: u32,
    pub hits: u32,
    pub game_overs: u32,
    pub restarts: u32,
}

impl EventCounts {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            let slot = match event {
                SimEvent::Jumped { .. } => &mut self.jumps,
                SimEvent::Dashed => &mut self.dashes,
                SimEvent::Landed => &mut self.landings,
                SimEvent::EnemyStomped { .. } => &mut self.stomps,
                SimEvent::PlayerHit { .. } => &mut self.hits,
                SimEvent::GameOver => &mut self.game_overs,
                SimEvent::Restarted => &mut self.restarts,
            };
            *slot = slot.saturating_add(1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub position: Vec3,
    pub velocity: Vec3,
    pub health: i32,
    pub grounded: bool,
    /// Diagnostic ground check, independent of the collision result.
    pub supported: bool,
    pub jumps_remaining: u8,
}

/// Final state of a replay, printed as JSON by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub ticks: u64,
    pub phase: GamePhase,
    pub level: u32,
    pub score: i32,
    pub player: PlayerSummary,
    /// Ids of enemies still alive, in id order.
    pub enemies: Vec<String>,
    pub events: EventCounts,
    /// Size of the MessagePack snapshot of the final state.
    pub snapshot_bytes: usize,
}

impl ReplayReport {
    fn new(sim: &Simulation, ticks: u64, events: EventCounts, snapshot_bytes: usize) -> Self {
        let state = sim.state();
        Self {
            ticks,
            phase: state.phase,
            level: state.level,
            score: state.score,
            player: PlayerSummary {
                position: state.player.position,
                velocity: state.player.velocity,
                health: state.player.health,
                grounded: state.player.grounded,
                supported: state.player_supported(sim.config()),
                jumps_remaining: state.player.jumps_remaining,
            },
            enemies: state.live_enemies().map(|e| e.id.clone()).collect(),
            events,
            snapshot_bytes,
        }
    }
}

/// Play `script` on the built-in levels from a fresh start.
pub fn replay(script: &ReplayScript, config: HopperConfig) -> Result<ReplayReport, ReplayError> {
    let mut sim = Simulation::with_builtin_levels(config);
    sim.start();

    let mut tracker = ControlTracker::new();
    let mut counts = EventCounts::default();
    let mut ticks = 0u64;
    for (index, segment) in script.segments.iter().enumerate() {
        tracing::debug!(index, ticks = segment.ticks, ?segment, "Segment");
        for _ in 0..segment.ticks {
            sim.push_input(tracker.sample(segment.held()));
            let outcome = sim.tick(script.delta);
            counts.record(&outcome.events);
            ticks += 1;
            if outcome.game_over {
                tracing::info!(tick = ticks, score = sim.state().score, "Run ended during replay");
            }
        }
    }

    let snapshot = sim.snapshot().map_err(ReplayError::Snapshot)?;
    Ok(ReplayReport::new(&sim, ticks, counts, snapshot.len()))
}
