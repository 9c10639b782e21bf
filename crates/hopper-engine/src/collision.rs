use serde::{Deserialize, Serialize};

use hopper_core::geometry::{Axis, BoxExtent, Vec3, boxes_overlap, bottom, horizontal_span, top};
use hopper_core::level::Platform;

/// Contact flags produced by one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub grounded: bool,
    /// Obstacle on the actor's left (actor was pushed right).
    pub walled_left: bool,
    /// Obstacle on the actor's right (actor was pushed left).
    pub walled_right: bool,
}

impl Contacts {
    pub fn walled(&self) -> bool {
        self.walled_left || self.walled_right
    }
}

/// Corrected kinematics after resolving against every obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub position: Vec3,
    pub velocity: Vec3,
    pub contacts: Contacts,
}

/// Per-axis penetration depth of two overlapping boxes, or `None` if they do
/// not overlap.
pub fn penetration(pos_a: Vec3, size_a: BoxExtent, pos_b: Vec3, size_b: BoxExtent) -> Option<Vec3> {
    if !boxes_overlap(pos_a, size_a, pos_b, size_b) {
        return None;
    }
    let depth = |axis: Axis| {
        size_a.half(axis) + size_b.half(axis) - (pos_a.get(axis) - pos_b.get(axis)).abs()
    };
    Some(Vec3::new(depth(Axis::X), depth(Axis::Y), depth(Axis::Z)))
}

/// Axis with the smallest penetration. A tie goes to the later axis.
fn separation_axis(pen: Vec3) -> Axis {
    if pen.x < pen.y && pen.x < pen.z {
        Axis::X
    } else if pen.y < pen.z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// Push an actor out of every overlapping obstacle along the axis of minimum
/// penetration.
///
/// Obstacles are visited once each, in slice order, and each one sees the
/// position left by the previous corrections. Resolution is not iterated, so
/// a concave corner can leave a residual overlap until the next tick.
///
/// Side and underside pushes leave a `skin` gap. Landings on top snap flush
/// to the surface so a resting actor re-contacts the same face every tick.
pub fn resolve(
    position: Vec3,
    size: BoxExtent,
    velocity: Vec3,
    obstacles: &[Platform],
    skin: f32,
) -> CollisionResult {
    let mut pos = position;
    let mut vel = velocity;
    let mut contacts = Contacts::default();

    for obstacle in obstacles {
        let Some(pen) = penetration(pos, size, obstacle.position, obstacle.size) else {
            continue;
        };

        let axis = separation_axis(pen);
        let reach = size.half(axis) + obstacle.size.half(axis);
        let center = obstacle.position.get(axis);

        match axis {
            Axis::X => {
                if pos.x < center {
                    pos.x = center - reach - skin;
                    contacts.walled_right = true;
                } else {
                    pos.x = center + reach + skin;
                    contacts.walled_left = true;
                }
                vel.x = 0.0;
            },
            Axis::Y => {
                if pos.y < center {
                    pos.y = center - reach - skin;
                    if vel.y > 0.0 {
                        vel.y = 0.0;
                    }
                } else {
                    pos.y = center + reach;
                    if vel.y <= 0.0 {
                        vel.y = 0.0;
                        contacts.grounded = true;
                    }
                }
            },
            Axis::Z => {
                pos.z = if pos.z < center {
                    center - reach - skin
                } else {
                    center + reach + skin
                };
                vel.z = 0.0;
            },
        }
    }

    CollisionResult {
        position: pos,
        velocity: vel,
        contacts,
    }
}

/// Read-only ground check: is the actor's bottom within `tolerance` of a
/// platform top that it horizontally overlaps?
pub fn check_grounded(
    position: Vec3,
    size: BoxExtent,
    platforms: &[Platform],
    tolerance: f32,
) -> bool {
    let feet = bottom(position, size);
    let (left, right) = horizontal_span(position, size);
    platforms.iter().any(|p| {
        let (p_left, p_right) = horizontal_span(p.position, p.size);
        right > p_left && left < p_right && (feet - top(p.position, p.size)).abs() < tolerance
    })
}
