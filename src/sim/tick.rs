//! Fixed timestep simulation tick
//!
//! One call advances the running session by one frame. Step order is fixed so
//! that a seeded session replays identically:
//! enemies move, breaches cost lives, projectiles move, projectiles leaving
//! the arena are dropped, impacts are resolved, then precision and game over
//! are evaluated.

use super::geometry::{breaches_defense, circles_overlap, is_outside_arena};
use super::state::{GameState, SessionPhase};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Enemies that reached the defense zone
    pub breaches: u32,
    /// Projectiles that left the arena
    pub escaped: u32,
    /// Enemies destroyed by projectiles
    pub kills: u32,
    /// The session ended during this tick
    pub game_over: bool,
}

/// Advance the game state by one tick. Does nothing unless running.
pub fn tick(state: &mut GameState) -> TickReport {
    let mut report = TickReport::default();
    if state.phase != SessionPhase::Running {
        return report;
    }
    state.time_ticks += 1;

    // Enemies close in; breaching ones are consumed and cost a life
    let center = state.arena.center;
    let defense_radius = state.config.attacker_radius;
    let enemy_radius = state.config.enemy_radius;
    for id in state.enemies.ids() {
        let Some(enemy) = state.enemies.get_mut(id) else {
            continue;
        };
        enemy.advance();
        if breaches_defense(enemy.pos, enemy.heading, center, defense_radius, enemy_radius) {
            state.enemies.remove(id);
            state.scores.life = state.scores.life.saturating_sub(1);
            report.breaches += 1;
            log::debug!("Enemy {} breached the defense zone", id);
        }
    }

    // Projectiles fly out; those leaving the arena are dropped before any impact test
    let bounds = state.arena.bounds();
    let mut in_flight = Vec::with_capacity(state.projectiles.len());
    for id in state.projectiles.ids() {
        let Some(projectile) = state.projectiles.get_mut(id) else {
            continue;
        };
        projectile.advance();
        if is_outside_arena(projectile.pos, bounds) {
            state.projectiles.remove(id);
            report.escaped += 1;
        } else {
            in_flight.push(id);
        }
    }

    // Impacts. A projectile is checked against every enemy with no early exit,
    // so one shot overlapping several enemies kills all of them.
    for id in in_flight {
        let Some(projectile) = state.projectiles.get(id) else {
            continue;
        };
        let (pos, radius) = (projectile.pos, projectile.radius);

        let mut hit = false;
        for enemy_id in state.enemies.ids() {
            let overlaps = state
                .enemies
                .get(enemy_id)
                .is_some_and(|enemy| circles_overlap(pos, radius, enemy.pos, enemy.radius));
            if overlaps {
                state.enemies.remove(enemy_id);
                state.scores.kills += 1;
                report.kills += 1;
                hit = true;
                log::debug!("Projectile {} destroyed enemy {}", id, enemy_id);
            }
        }
        if hit {
            state.projectiles.remove(id);
        }
    }

    state.scores.precision = precision(state.scores.kills, state.shots_counter());

    // Any lost life ends the run
    if state.scores.life < state.config.life_amount {
        state.phase = SessionPhase::GameOver;
        report.game_over = true;
    }

    report
}

/// Whole-percent accuracy: `floor(kills / shots_counter * 100)`
pub fn precision(kills: u32, shots_counter: u32) -> u32 {
    if shots_counter == 0 {
        return 0;
    }
    (kills as u64 * 100 / shots_counter as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::spawner::{enemy_spawn_point, fire_projectile, spawn_enemy};
    use crate::sim::state::{Enemy, Projectile};
    use crate::sim::store::EntityId;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn running_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 12345, 800.0, 600.0);
        state.phase = SessionPhase::Running;
        state
    }

    fn parked_enemy(state: &mut GameState, pos: Vec2) -> EntityId {
        let radius = state.config.enemy_radius;
        state.enemies.insert_with(|_| Enemy {
            pos,
            radius,
            speed: 0.0,
            heading: 0.0,
        })
    }

    fn projectile(state: &mut GameState, pos: Vec2, heading: f32, speed: f32) -> EntityId {
        let radius = state.config.arrow_radius;
        state.projectiles.insert_with(|_| Projectile {
            pos,
            radius,
            speed,
            heading,
        })
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let mut state = GameState::new(GameConfig::default(), 1, 800.0, 600.0);
        parked_enemy(&mut state, Vec2::new(400.0, 300.0));
        let report = tick(&mut state);
        assert_eq!(report, TickReport::default());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_enemy_moves_toward_center() {
        let mut state = running_state();
        let id = spawn_enemy(&mut state);
        let center = state.arena.center;
        let before = state.enemies.get(id).unwrap().pos.distance(center);
        tick(&mut state);
        let after = state.enemies.get(id).unwrap().pos.distance(center);
        assert!((before - after - state.config.enemy_speed).abs() < 1e-3);
    }

    #[test]
    fn test_breach_costs_life_and_ends_game() {
        let mut state = running_state();
        assert_eq!(state.scores.life, 3);
        // Heading 0, one step (2px) away from crossing x = 445
        state.enemies.insert_with(|_| Enemy {
            pos: Vec2::new(446.0, 300.0),
            radius: 15.0,
            speed: 2.0,
            heading: 0.0,
        });

        let report = tick(&mut state);
        assert_eq!(report.breaches, 1);
        assert!(report.game_over);
        assert!(state.enemies.is_empty());
        assert_eq!(state.scores.life, 2);
        // Life 2 is already below the starting 3: one breach ends the run
        assert_eq!(state.phase, SessionPhase::GameOver);

        // Nothing moves once the game is over
        parked_enemy(&mut state, Vec2::new(10.0, 10.0));
        assert_eq!(tick(&mut state), TickReport::default());
    }

    #[test]
    fn test_projectile_hits_overlapping_enemy() {
        let mut state = running_state();
        let enemy = parked_enemy(&mut state, Vec2::new(600.0, 300.0));
        let shot = projectile(&mut state, Vec2::new(580.0, 300.0), 0.0, 10.0);

        let report = tick(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(state.scores.kills, 1);
        assert!(!state.enemies.contains(enemy));
        assert!(!state.projectiles.contains(shot));
        assert!(!report.game_over);
    }

    #[test]
    fn test_one_projectile_can_kill_several_enemies() {
        let mut state = running_state();
        parked_enemy(&mut state, Vec2::new(600.0, 290.0));
        parked_enemy(&mut state, Vec2::new(600.0, 310.0));
        let far = parked_enemy(&mut state, Vec2::new(100.0, 100.0));
        projectile(&mut state, Vec2::new(590.0, 300.0), 0.0, 10.0);

        let report = tick(&mut state);
        assert_eq!(report.kills, 2);
        assert_eq!(state.scores.kills, 2);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies.ids(), vec![far]);
    }

    #[test]
    fn test_enemy_killed_once_even_if_two_projectiles_overlap() {
        let mut state = running_state();
        parked_enemy(&mut state, Vec2::new(600.0, 300.0));
        let first = projectile(&mut state, Vec2::new(590.0, 298.0), 0.0, 5.0);
        let second = projectile(&mut state, Vec2::new(590.0, 302.0), 0.0, 5.0);

        tick(&mut state);
        assert_eq!(state.scores.kills, 1);
        // The first shot takes the enemy; the second flies on
        assert!(!state.projectiles.contains(first));
        assert!(state.projectiles.contains(second));
    }

    #[test]
    fn test_projectile_leaving_arena_is_removed() {
        let mut state = running_state();
        // Fired before the pointer ever moved: beak at the origin, heading 0
        let stay = fire_projectile(&mut state).unwrap();
        let leave = projectile(&mut state, Vec2::ZERO, PI, 10.0);

        let report = tick(&mut state);
        assert_eq!(report.escaped, 1);
        assert!(state.projectiles.contains(stay));
        assert!(!state.projectiles.contains(leave));
    }

    #[test]
    fn test_escaped_projectile_skips_impact_check() {
        let mut state = running_state();
        // Enemy sits just past the right edge where the projectile will land
        let enemy = parked_enemy(&mut state, Vec2::new(805.0, 300.0));
        projectile(&mut state, Vec2::new(795.0, 300.0), 0.0, 10.0);

        let report = tick(&mut state);
        assert_eq!(report.escaped, 1);
        assert_eq!(report.kills, 0);
        assert!(state.enemies.contains(enemy));
    }

    #[test]
    fn test_precision_uses_lifetime_counter() {
        let mut state = running_state();
        state.aim.point_at(Vec2::new(800.0, 300.0), state.arena.center, 50.0);
        for _ in 0..3 {
            fire_projectile(&mut state);
        }
        parked_enemy(&mut state, Vec2::new(462.0, 300.0));

        tick(&mut state);
        // 1 kill, counter at 4 (three shots fired)
        assert_eq!(state.scores.kills, 1);
        assert_eq!(state.shots_counter(), 4);
        assert_eq!(state.scores.precision, 25);
    }

    #[test]
    fn test_precision_formula() {
        assert_eq!(precision(0, 1), 0);
        assert_eq!(precision(1, 3), 33);
        assert_eq!(precision(29, 100), 29);
        assert_eq!(precision(3, 2), 150);
        assert_eq!(precision(5, 0), 0);
    }

    proptest! {
        #[test]
        fn fastest_valid_enemy_still_breaches(heading in 0.0f32..std::f32::consts::TAU) {
            let config = GameConfig {
                enemy_speed: 89.0,
                ..Default::default()
            };
            prop_assert!(config.validate().is_ok());
            let mut state = GameState::new(config, 1, 800.0, 600.0);
            state.phase = SessionPhase::Running;
            let pos = enemy_spawn_point(state.arena.center, heading, state.config.spawn_margin);
            let id = state.enemies.insert_with(|_| Enemy {
                pos,
                radius: 15.0,
                speed: 89.0,
                heading,
            });

            let mut breached = false;
            for _ in 0..20 {
                if tick(&mut state).breaches > 0 {
                    breached = true;
                    break;
                }
            }
            prop_assert!(breached);
            prop_assert!(!state.enemies.contains(id));
            prop_assert_eq!(state.scores.life, 2);
        }

        #[test]
        fn enemies_approach_center_monotonically(seed in any::<u64>(), ticks in 1usize..200) {
            let mut state = GameState::new(GameConfig::default(), seed, 800.0, 600.0);
            state.phase = SessionPhase::Running;
            let id = spawn_enemy(&mut state);
            let center = state.arena.center;
            let mut last = state.enemies.get(id).unwrap().pos.distance(center);
            for _ in 0..ticks {
                tick(&mut state);
                let Some(enemy) = state.enemies.get(id) else { break };
                let now = enemy.pos.distance(center);
                prop_assert!(now < last);
                last = now;
            }
        }

        #[test]
        fn precision_tracks_kills_over_counter(shots in 0u32..50, seed in any::<u64>()) {
            let mut state = GameState::new(GameConfig::default(), seed, 800.0, 600.0);
            state.phase = SessionPhase::Running;
            let mut counter = state.shots_counter();
            for i in 0..shots {
                state.aim.point_at(Vec2::new(i as f32 * 16.0, 0.0), state.arena.center, 50.0);
                fire_projectile(&mut state);
                spawn_enemy(&mut state);
                tick(&mut state);
                prop_assert!(state.shots_counter() >= counter);
                counter = state.shots_counter();
                prop_assert_eq!(
                    state.scores.precision,
                    precision(state.scores.kills, state.shots_counter())
                );
                if state.phase != SessionPhase::Running {
                    break;
                }
            }
        }
    }
}
