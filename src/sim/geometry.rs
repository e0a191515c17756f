//! Collision and bounds tests
//!
//! Everything here works in canvas coordinates: origin at the top-left
//! corner, x to the right, y down.

use glam::Vec2;

use crate::direction;

/// Axis-aligned extent of the visible arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Inclusive axis-aligned rectangle (button hit regions, overlay panels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Open interval on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    /// Band spanning `center ± half_extent`
    fn around(center: f32, half_extent: f32) -> Self {
        let (min, max) = (center - half_extent.abs(), center + half_extent.abs());
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// Strict containment; a zero-width band contains nothing
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value > self.min && value < self.max
    }
}

/// Per-axis bands of the segment crossing the defense zone along a heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseBox {
    pub x: Band,
    pub y: Band,
}

/// True iff the distance between centers is strictly less than the sum of radii
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}

/// True iff the point lies outside `[0, width] x [0, height]`
#[inline]
pub fn is_outside_arena(point: Vec2, bounds: Bounds) -> bool {
    point.x < 0.0 || point.x > bounds.width || point.y < 0.0 || point.y > bounds.height
}

/// Bounding box of the segment `center ± (defense_radius + enemy_radius) * dir(heading)`
pub fn defense_box(
    heading: f32,
    center: Vec2,
    defense_radius: f32,
    enemy_radius: f32,
) -> DefenseBox {
    let reach = direction(heading) * (defense_radius + enemy_radius);
    DefenseBox {
        x: Band::around(center.x, reach.x),
        y: Band::around(center.y, reach.y),
    }
}

/// Has an enemy on `heading` entered the defense zone?
///
/// The test is an approximation: the enemy counts as breaching when its x
/// lies inside the box's x-band OR its y lies inside the y-band. For an enemy
/// travelling along its heading line through the center, both conditions
/// reduce to "closer than `defense_radius + enemy_radius`".
pub fn breaches_defense(
    enemy_pos: Vec2,
    heading: f32,
    center: Vec2,
    defense_radius: f32,
    enemy_radius: f32,
) -> bool {
    let zone = defense_box(heading, center, defense_radius, enemy_radius);
    zone.x.contains(enemy_pos.x) || zone.y.contains(enemy_pos.y)
}
