use serde::{Deserialize, Serialize};

use crate::geometry::{BoxExtent, Vec3};

/// A static rectangular obstacle. Owned by the content provider and read-only
/// to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub position: Vec3,
    pub size: BoxExtent,
    /// Display tag for the renderer; physics ignores it.
    pub color: String,
}

impl Platform {
    pub fn new(position: Vec3, size: BoxExtent, color: impl Into<String>) -> Self {
        Self {
            position,
            size,
            color: color.into(),
        }
    }
}

/// Horizontal travel limits for a patrolling enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolBounds {
    pub left: f32,
    pub right: f32,
}

/// Horizontal facing of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing for a signed value; zero resolves to `Right`.
    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Where and how an enemy enters a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub id: String,
    pub position: Vec3,
    pub size: BoxExtent,
    pub patrol_bounds: PatrolBounds,
    pub facing: Facing,
}

/// Everything the simulation needs from the content provider for one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelContent {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<EnemySpawn>,
}

/// Supplies platform and enemy placement for a level index.
///
/// The simulation calls this on start, restart and level advance; content is
/// expected to be deterministic for a given index.
pub trait LevelProvider: Send + Sync {
    fn content(&self, level: u32) -> LevelContent;
}

/// Provider that hands out the same content for every level.
#[derive(Debug, Clone, Default)]
pub struct StaticLevel(pub LevelContent);

impl LevelProvider for StaticLevel {
    fn content(&self, _level: u32) -> LevelContent {
        self.0.clone()
    }
}
