use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hopper_core::geometry::{BoxExtent, Vec3};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "HOPPER_CONFIG";
/// Path tried when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/hopper.toml";

/// Base motion parameters shared by the player and enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration (units/s^2, negative is down).
    pub gravity: f32,
    /// Horizontal speed scale; acceleration per tick is `move_speed * delta * acceleration_factor`.
    pub move_speed: f32,
    pub acceleration_factor: f32,
    /// Multiplier applied to vx each tick when no direction is held.
    pub friction: f32,
    /// Terminal fall velocity (negative).
    pub max_fall_speed: f32,
    pub max_move_speed: f32,
    /// Initial vertical velocity of a ground or coyote jump.
    pub jump_force: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -25.0,
            move_speed: 8.0,
            acceleration_factor: 8.0,
            friction: 0.85,
            max_fall_speed: -20.0,
            max_move_speed: 15.0,
            jump_force: 12.0,
        }
    }
}

/// Advanced movement: air jumps, wall mechanics, dash, variable jump, grace windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub double_jump_force: f32,
    pub max_jumps: u8,
    /// Fall-speed floor while sliding down a wall (negative, slower than free fall).
    pub wall_slide_speed: f32,
    pub wall_jump_force_x: f32,
    pub wall_jump_force_y: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Exponential decay rate of upward velocity after an early jump release.
    pub jump_force_decay_rate: f32,
    pub jump_hold_time: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            double_jump_force: 11.0,
            max_jumps: 2,
            wall_slide_speed: -5.0,
            wall_jump_force_x: 10.0,
            wall_jump_force_y: 12.0,
            dash_speed: 25.0,
            dash_duration: 0.15,
            dash_cooldown: 1.0,
            jump_force_decay_rate: 30.0,
            jump_hold_time: 0.25,
            coyote_time: 0.15,
            jump_buffer_time: 0.1,
        }
    }
}

/// Enemy patrol and player-enemy contact parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub patrol_speed: f32,
    /// Player vy must be below this (negative) for a stomp.
    pub stomp_velocity_threshold: f32,
    /// Exclusive band for `player_bottom - enemy_top` that counts as "on top".
    pub stomp_gap_min: f32,
    pub stomp_gap_max: f32,
    pub stomp_bounce: f32,
    pub knockback_force: f32,
    pub knockback_up_force: f32,
    pub contact_damage: i32,
    /// Edge probe: horizontal distance past the leading edge.
    pub edge_probe_ahead: f32,
    /// Edge probe: distance below the feet.
    pub edge_probe_below: f32,
    /// Edge probe: accepted vertical distance between probe and a platform top.
    pub edge_probe_tolerance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 3.0,
            stomp_velocity_threshold: -2.0,
            stomp_gap_min: -0.3,
            stomp_gap_max: 0.1,
            stomp_bounce: 8.0,
            knockback_force: 8.0,
            knockback_up_force: 6.0,
            contact_damage: 1,
            edge_probe_ahead: 0.2,
            edge_probe_below: 0.3,
            edge_probe_tolerance: 0.5,
        }
    }
}

/// Player body, spawn and health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: BoxExtent,
    pub spawn: Vec3,
    pub max_health: i32,
    pub invincibility_duration: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: BoxExtent::cube(1.0),
            spawn: Vec3::new(0.0, -3.0, 0.0),
            max_health: 3,
            invincibility_duration: 1.5,
        }
    }
}

/// Collision tolerances and tick subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gap left after side and underside pushes so the same contact does not re-trigger.
    pub contact_skin: f32,
    /// Lowest allowed player center height; below it the player is snapped back and grounded.
    pub safety_floor_y: f32,
    /// Tolerance for the diagnostic grounded query.
    pub grounded_tolerance: f32,
    /// Longest physics step; longer ticks are subdivided.
    pub max_step: f32,
    /// Upper bound on subdivisions of a single tick.
    pub max_substeps: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            contact_skin: 0.01,
            safety_floor_y: -4.5,
            grounded_tolerance: 0.1,
            max_step: 1.0 / 30.0,
            max_substeps: 8,
        }
    }
}

/// Points awarded per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub ground_jump: i32,
    pub air_jump: i32,
    pub wall_jump: i32,
    pub dash: i32,
    pub stomp: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ground_jump: 1,
            air_jump: 2,
            wall_jump: 5,
            dash: 2,
            stomp: 100,
        }
    }
}

/// Top-level simulation configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopperConfig {
    pub physics: PhysicsConfig,
    pub movement: MovementConfig,
    pub enemy: EnemyConfig,
    pub player: PlayerConfig,
    pub world: WorldConfig,
    pub scoring: ScoringConfig,
}

/// Failure to read or accept a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::Parse(e) => write!(f, "invalid TOML: {e}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl HopperConfig {
    /// Load from `$HOPPER_CONFIG`, then `config/hopper.toml`, falling back to
    /// defaults. A file that exists but fails to parse or validate is logged
    /// and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match Self::from_path(&path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, trying {DEFAULT_CONFIG_PATH}")
                },
            }
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            match Self::from_path(DEFAULT_CONFIG_PATH) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load {DEFAULT_CONFIG_PATH}: {e}, using defaults")
                },
            }
        }
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would corrupt the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all_finite = [
            self.physics.gravity,
            self.physics.move_speed,
            self.physics.acceleration_factor,
            self.physics.friction,
            self.physics.max_fall_speed,
            self.physics.max_move_speed,
            self.physics.jump_force,
            self.movement.double_jump_force,
            self.movement.wall_slide_speed,
            self.movement.wall_jump_force_x,
            self.movement.wall_jump_force_y,
            self.movement.dash_speed,
            self.movement.dash_duration,
            self.movement.dash_cooldown,
            self.movement.jump_force_decay_rate,
            self.movement.jump_hold_time,
            self.movement.coyote_time,
            self.movement.jump_buffer_time,
            self.enemy.patrol_speed,
            self.enemy.stomp_velocity_threshold,
            self.enemy.stomp_gap_min,
            self.enemy.stomp_gap_max,
            self.enemy.stomp_bounce,
            self.enemy.knockback_force,
            self.enemy.knockback_up_force,
            self.player.invincibility_duration,
            self.world.contact_skin,
            self.world.safety_floor_y,
            self.world.grounded_tolerance,
            self.world.max_step,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::Invalid("all values must be finite".into()));
        }
        if self.movement.max_jumps == 0 {
            return Err(ConfigError::Invalid("movement.max_jumps must be at least 1".into()));
        }
        if self.physics.max_fall_speed >= 0.0 || self.movement.wall_slide_speed >= 0.0 {
            return Err(ConfigError::Invalid(
                "max_fall_speed and wall_slide_speed must be negative".into(),
            ));
        }
        let durations = [
            ("movement.dash_duration", self.movement.dash_duration),
            ("movement.dash_cooldown", self.movement.dash_cooldown),
            ("movement.jump_hold_time", self.movement.jump_hold_time),
            ("movement.coyote_time", self.movement.coyote_time),
            ("movement.jump_buffer_time", self.movement.jump_buffer_time),
            ("movement.jump_force_decay_rate", self.movement.jump_force_decay_rate),
            ("player.invincibility_duration", self.player.invincibility_duration),
        ];
        if let Some((name, value)) = durations.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")));
        }
        if self.physics.max_move_speed <= 0.0 {
            return Err(ConfigError::Invalid("physics.max_move_speed must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.physics.friction) {
            return Err(ConfigError::Invalid("physics.friction must be in [0, 1]".into()));
        }
        if self.enemy.stomp_gap_min >= self.enemy.stomp_gap_max {
            return Err(ConfigError::Invalid(
                "enemy.stomp_gap_min must be below stomp_gap_max".into(),
            ));
        }
        if !self.player.size.is_valid() {
            return Err(ConfigError::Invalid("player.size must be positive".into()));
        }
        if !self.player.spawn.is_finite() {
            return Err(ConfigError::Invalid("player.spawn must be finite".into()));
        }
        if self.player.max_health <= 0 || self.enemy.contact_damage < 0 {
            return Err(ConfigError::Invalid(
                "player.max_health must be positive and enemy.contact_damage non-negative".into(),
            ));
        }
        if self.world.max_step <= 0.0 || self.world.max_substeps == 0 {
            return Err(ConfigError::Invalid(
                "world.max_step and world.max_substeps must be positive".into(),
            ));
        }
        if self.world.contact_skin < 0.0 || self.world.grounded_tolerance < 0.0 {
            return Err(ConfigError::Invalid("world tolerances must be non-negative".into()));
        }
        Ok(())
    }
}
