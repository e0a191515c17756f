//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; the session and
//! presentation layers only read it or go through the spawner/tick functions.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::geometry::{Bounds, Rect};
use super::store::EntityStore;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{cartesian_to_polar, direction, polar_to_cartesian};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Start screen, waiting for the Start button
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended, waiting for the Restart button
    GameOver,
}

/// Visible play field, sized to the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    /// Center in canvas coordinates (half the viewport size)
    pub center: Vec2,
}

impl Arena {
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let mut arena = Self {
            center: Vec2::new(1.0, 1.0),
        };
        if !arena.resize(width, height) {
            log::warn!("Unusable initial viewport {}x{}, using 2x2", width, height);
        }
        arena
    }

    /// Recompute the center from new viewport dimensions.
    ///
    /// Returns false (and keeps the old center) for zero, negative or
    /// non-finite sizes.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let usable = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if usable {
            self.center = Vec2::new(width / 2.0, height / 2.0);
        }
        usable
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.center.x * 2.0,
            height: self.center.y * 2.0,
        }
    }

    /// Half the viewport diagonal: any point further from the center is off-screen
    pub fn half_diagonal(&self) -> f32 {
        self.center.length()
    }

    /// Hit region of the Start/Restart button
    pub fn button(&self) -> Rect {
        Rect {
            min: self.center + Vec2::new(-BUTTON_HALF_WIDTH, BUTTON_TOP_OFFSET),
            max: self.center + Vec2::new(BUTTON_HALF_WIDTH, BUTTON_TOP_OFFSET + BUTTON_HEIGHT),
        }
    }

    /// Dimmed panel behind the start/game over overlays
    pub fn overlay_panel(&self) -> Rect {
        let half = Vec2::new(PANEL_WIDTH, PANEL_HEIGHT) / 2.0;
        Rect {
            min: self.center - half,
            max: self.center + half,
        }
    }
}

/// A projectile ("arrow") flying away from the defender
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Direction of travel (radians)
    pub heading: f32,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.pos += direction(self.heading) * self.speed;
    }
}

/// An enemy converging on the center
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Angle of the spawn point as seen from the center; motion is opposite to it
    pub heading: f32,
}

impl Enemy {
    pub fn advance(&mut self) {
        self.pos -= direction(self.heading) * self.speed;
    }
}

/// The defender's aim, derived from the pointer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aim {
    /// Last pointer position (where the cursor is drawn)
    pub cursor: Vec2,
    /// Heading from the center toward the pointer
    pub heading: f32,
    /// Firing point. Stays at the origin until the pointer first moves.
    pub beak: Vec2,
}

impl Aim {
    pub fn point_at(&mut self, pointer: Vec2, center: Vec2, beak_length: f32) {
        let (_, heading) = cartesian_to_polar(pointer - center);
        self.cursor = pointer;
        self.heading = heading;
        self.beak = center + polar_to_cartesian(beak_length, heading);
    }
}

/// Running score of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub kills: u32,
    pub life: u32,
    /// Lifetime accuracy in whole percent
    pub precision: u32,
}

impl Scores {
    pub fn new(life: u32) -> Self {
        Self {
            kills: 0,
            life,
            precision: 0,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning in effect (never changed by restart)
    pub config: GameConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub phase: SessionPhase,
    pub arena: Arena,
    pub aim: Aim,
    pub scores: Scores,
    /// Live projectiles (ids from their own counter)
    pub projectiles: EntityStore<Projectile>,
    /// Live enemies (ids from their own counter)
    pub enemies: EntityStore<Enemy>,
    /// Simulation ticks run since the last start/restart
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64, width: f32, height: f32) -> Self {
        let scores = Scores::new(config.life_amount);
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::NotStarted,
            arena: Arena::from_viewport(width, height),
            aim: Aim::default(),
            scores,
            projectiles: EntityStore::new(),
            enemies: EntityStore::new(),
            time_ticks: 0,
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Projectiles fired since the last restart, plus one.
    ///
    /// This is the projectile id counter and serves as the precision
    /// denominator, so precision never divides by zero.
    pub fn shots_counter(&self) -> u32 {
        self.projectiles.id_counter()
    }

    /// Clear scores, entities and id counters. Config, arena and aim survive.
    pub fn reset(&mut self) {
        self.scores = Scores::new(self.config.life_amount);
        self.projectiles.reset();
        self.enemies.reset();
        self.time_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_arena_from_viewport() {
        let arena = Arena::from_viewport(800.0, 600.0);
        assert_eq!(arena.center, Vec2::new(400.0, 300.0));
        assert_eq!(arena.bounds().width, 800.0);
        assert_eq!(arena.half_diagonal(), 500.0);
    }

    #[test]
    fn test_resize_ignores_bad_sizes() {
        let mut arena = Arena::from_viewport(800.0, 600.0);
        assert!(!arena.resize(0.0, 600.0));
        assert!(!arena.resize(-5.0, 10.0));
        assert!(!arena.resize(f32::NAN, 10.0));
        assert_eq!(arena.center, Vec2::new(400.0, 300.0));
        assert!(arena.resize(1000.0, 500.0));
        assert_eq!(arena.center, Vec2::new(500.0, 250.0));
    }

    #[test]
    fn test_button_region() {
        let arena = Arena::from_viewport(800.0, 600.0);
        let button = arena.button();
        assert!(button.contains(Vec2::new(325.0, 350.0)));
        assert!(button.contains(Vec2::new(475.0, 400.0)));
        assert!(!button.contains(Vec2::new(400.0, 349.0)));
        assert!(!button.contains(Vec2::new(476.0, 375.0)));
    }

    #[test]
    fn test_aim_points_beak_at_pointer() {
        let center = Vec2::new(400.0, 300.0);
        let mut aim = Aim::default();
        assert_eq!(aim.beak, Vec2::ZERO);

        aim.point_at(Vec2::new(400.0, 500.0), center, 50.0);
        assert!((aim.heading - FRAC_PI_2).abs() < 1e-6);
        assert!((aim.beak - Vec2::new(400.0, 350.0)).length() < 1e-3);
        assert_eq!(aim.cursor, Vec2::new(400.0, 500.0));
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = GameConfig {
            enemy_speed: 7.0,
            ..Default::default()
        };
        let mut state = GameState::new(config.clone(), 1, 800.0, 600.0);
        state.scores.kills = 4;
        state.scores.life = 1;
        state.enemies.insert_with(|_| Enemy {
            pos: Vec2::ZERO,
            radius: 1.0,
            speed: 1.0,
            heading: 0.0,
        });
        state.scores.precision = 80;
        state.reset();
        assert_eq!(state.scores, Scores::new(config.life_amount));
        assert_eq!(state.scores.precision, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.enemies.id_counter(), 1);
        assert_eq!(state.config, config);
    }
}
