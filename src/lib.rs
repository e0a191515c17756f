//! Attacker Game - defend the center against converging enemies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity stores, spawning, motion, collisions, scoring)
//! - `session`: Start / game over / restart state machine driven by a scheduler
//! - `scheduler`: Periodic task scheduling on a manually advanced clock
//! - `renderer`: Presentation adapter (draw list for any canvas backend)
//! - `config`: Data-driven game tuning
//! - `autopilot`: Demo player that aims and fires on its own

pub mod autopilot;
pub mod config;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use session::{InputEvent, Session};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Render/update frames per second
    pub const FPS: u32 = 60;

    /// Defender (attacker) radius, also the defense zone radius
    pub const ATTACKER_RADIUS: f32 = 30.0;
    /// Distance from the center to the firing point
    pub const BEAK_LENGTH: f32 = 50.0;
    /// Size of the aim cursor image
    pub const AIM_RADIUS: f32 = 40.0;

    /// Projectile defaults (speed is pixels per tick)
    pub const ARROW_RADIUS: f32 = 5.0;
    pub const ARROW_SPEED: f32 = 10.0;

    /// Enemy defaults (speed is pixels per tick)
    pub const ENEMY_RADIUS: f32 = 15.0;
    pub const ENEMY_SPEED: f32 = 2.0;

    /// Lives at session start
    pub const LIFE_AMOUNT: u32 = 3;

    /// Enemy spawn cadence
    pub const SPAWN_INTERVAL_MS: u64 = 1000;
    /// Delay between pressing Start and the spawn schedule kicking in
    pub const SPAWN_START_DELAY_MS: u64 = 1000;
    /// Extra distance beyond the half-diagonal where enemies appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Start/Restart button, relative to the arena center
    pub const BUTTON_HALF_WIDTH: f32 = 75.0;
    pub const BUTTON_TOP_OFFSET: f32 = 50.0;
    pub const BUTTON_HEIGHT: f32 = 50.0;

    /// Overlay panel behind start/game over screens
    pub const PANEL_WIDTH: f32 = 500.0;
    pub const PANEL_HEIGHT: f32 = 400.0;
}

/// Unit vector for a heading
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
