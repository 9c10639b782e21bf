use crate::config::ScoringConfig;
use crate::movement::JumpKind;

/// Points for a jump.
///
/// Ground and coyote jumps share the base value; air and wall jumps pay more.
pub fn jump_points(kind: JumpKind, table: &ScoringConfig) -> i32 {
    match kind {
        JumpKind::Ground | JumpKind::Coyote => table.ground_jump,
        JumpKind::Air => table.air_jump,
        JumpKind::Wall => table.wall_jump,
    }
}

pub fn dash_points(table: &ScoringConfig) -> i32 {
    table.dash
}

/// Points for defeating `count` enemies in one tick.
pub fn stomp_points(count: usize, table: &ScoringConfig) -> i32 {
    table.stomp.saturating_mul(i32::try_from(count).unwrap_or(i32::MAX))
}
