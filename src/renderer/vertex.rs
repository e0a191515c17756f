//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const ATTACKER: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BEAK: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const ARROW: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.8];
    pub const BUTTON: [f32; 4] = [0.204, 0.596, 0.859, 1.0]; // #3498db
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CURSOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
}
