//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, timer or platform dependencies

pub mod geometry;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use geometry::{Bounds, Rect, breaches_defense, circles_overlap, is_outside_arena};
pub use spawner::{fire_projectile, spawn_enemy};
pub use state::{Aim, Arena, Enemy, GameState, Projectile, Scores, SessionPhase};
pub use store::{EntityId, EntityStore};
pub use tick::{TickReport, precision, tick};
