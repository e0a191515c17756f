//! Demo player
//!
//! Produces the same input events a human would: it presses the button on
//! the start screen, tracks the enemy nearest the center and fires at a fixed
//! cadence. The native binary uses it for a headless run.

use glam::Vec2;

use crate::session::InputEvent;
use crate::sim::{GameState, SessionPhase};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Fire once every this many frames
    pub fire_every: u32,
    /// Press Restart after a game over
    pub restart: bool,
    frames: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            fire_every: 15,
            restart: false,
            frames: 0,
        }
    }
}

impl Autopilot {
    pub fn new(fire_every: u32, restart: bool) -> Self {
        Self {
            fire_every: fire_every.max(1),
            restart,
            frames: 0,
        }
    }

    /// Inputs for the coming frame
    pub fn inputs(&mut self, state: &GameState) -> Vec<InputEvent> {
        match state.phase {
            SessionPhase::NotStarted => vec![click(state.arena.button().center())],
            SessionPhase::GameOver if self.restart => {
                self.frames = 0;
                vec![click(state.arena.button().center())]
            }
            SessionPhase::GameOver => Vec::new(),
            SessionPhase::Running => {
                let Some(target) = nearest_enemy(state) else {
                    return Vec::new();
                };
                let mut events = vec![InputEvent::PointerMove {
                    x: target.x,
                    y: target.y,
                }];
                self.frames += 1;
                if self.frames % self.fire_every == 0 {
                    events.push(click(target));
                }
                events
            }
        }
    }
}

/// Position of the live enemy closest to the center
fn nearest_enemy(state: &GameState) -> Option<Vec2> {
    let center = state.arena.center;
    state
        .enemies
        .values()
        .map(|e| e.pos)
        .min_by(|a, b| {
            a.distance_squared(center)
                .partial_cmp(&b.distance_squared(center))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

fn click(pos: Vec2) -> InputEvent {
    InputEvent::Click { x: pos.x, y: pos.y }
}
