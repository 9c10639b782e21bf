use serde::{Deserialize, Serialize};

/// One of the three world axes. Gameplay is 2D (x horizontal, y vertical);
/// z exists so boxes can be handed to a 3D renderer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Position or velocity in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Full extents of an axis-aligned box. Collision math works on half-extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxExtent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxExtent {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// A cube with the given edge length.
    pub const fn cube(edge: f32) -> Self {
        Self::new(edge, edge, edge)
    }

    pub fn half(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width / 2.0,
            Axis::Y => self.height / 2.0,
            Axis::Z => self.depth / 2.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth]
            .iter()
            .all(|e| e.is_finite() && *e > 0.0)
    }
}

/// True when two center-positioned boxes overlap on every axis.
///
/// Touching faces do not count as overlap: the comparison is strict, so a box
/// resting flush on another is not considered intersecting.
pub fn boxes_overlap(pos_a: Vec3, size_a: BoxExtent, pos_b: Vec3, size_b: BoxExtent) -> bool {
    [Axis::X, Axis::Y, Axis::Z].into_iter().all(|axis| {
        (pos_a.get(axis) - pos_b.get(axis)).abs() < size_a.half(axis) + size_b.half(axis)
    })
}

/// Bottom edge of a box centered at `pos`.
pub fn bottom(pos: Vec3, size: BoxExtent) -> f32 {
    pos.y - size.half(Axis::Y)
}

/// Top edge of a box centered at `pos`.
pub fn top(pos: Vec3, size: BoxExtent) -> f32 {
    pos.y + size.half(Axis::Y)
}

/// Horizontal span `(left, right)` of a box centered at `pos`.
pub fn horizontal_span(pos: Vec3, size: BoxExtent) -> (f32, f32) {
    let half = size.half(Axis::X);
    (pos.x - half, pos.x + half)
}
