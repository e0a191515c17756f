//! Enemy and projectile creation

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameState, Projectile};
use super::store::EntityId;
use crate::polar_to_cartesian;

/// Point at `heading` on the circle that encloses the whole viewport plus `margin`
pub fn enemy_spawn_point(center: Vec2, heading: f32, margin: f32) -> Vec2 {
    center + polar_to_cartesian(center.length() + margin, heading)
}

/// Spawn one enemy at a random angle outside the arena, headed for the center
pub fn spawn_enemy(state: &mut GameState) -> EntityId {
    let heading: f32 = state.rng().random_range(0.0..TAU);
    let pos = enemy_spawn_point(state.arena.center, heading, state.config.spawn_margin);
    let radius = state.config.enemy_radius;
    let speed = state.config.enemy_speed;

    let id = state.enemies.insert_with(|_| Enemy {
        pos,
        radius,
        speed,
        heading,
    });
    log::debug!("Spawned enemy {} at ({:.0}, {:.0})", id, pos.x, pos.y);
    id
}

/// Fire from the beak along the current aim. Ignored outside the running phase.
pub fn fire_projectile(state: &mut GameState) -> Option<EntityId> {
    if !state.is_running() {
        return None;
    }

    let projectile = Projectile {
        pos: state.aim.beak,
        radius: state.config.arrow_radius,
        speed: state.config.arrow_speed,
        heading: state.aim.heading,
    };
    let id = state.projectiles.insert_with(|_| projectile);
    log::debug!("Fired projectile {}", id);
    Some(id)
}
