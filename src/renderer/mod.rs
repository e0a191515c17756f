//! Presentation adapter
//!
//! [`present`] turns the current [`GameState`] into drawing calls on any
//! [`Canvas`]. The simulation never draws; backends never mutate state.

pub mod batch;
pub mod shapes;
pub mod vertex;

pub use batch::VertexBatch;
pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::sim::{GameState, SessionPhase};

/// Horizontal anchoring of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos` is the left end of the baseline
    Left,
    /// `pos` is the visual center of the label
    Center,
}

/// Drawing surface. Colors are linear RGBA in `[0, 1]`.
pub trait Canvas {
    fn clear(&mut self, color: [f32; 4]);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]);
    /// Aim cursor of `size` centered on `center`
    fn draw_cursor(&mut self, center: Vec2, size: f32);
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: [f32; 4]);
}

const BEAK_WIDTH: f32 = 20.0;
const HUD_FONT: f32 = 14.0;
const HUD_LINE: f32 = 20.0;

/// Draw one frame of the current state
pub fn present(state: &GameState, canvas: &mut impl Canvas) {
    canvas.clear(colors::BACKGROUND);

    match state.phase {
        SessionPhase::Running => {
            draw_field(state, canvas);
            draw_cursor(state, canvas);
            draw_hud(state, canvas);
        }
        SessionPhase::NotStarted => {
            draw_panel(state, canvas, "Attacker Game", 50.0, "Start");
            draw_cursor(state, canvas);
        }
        SessionPhase::GameOver => {
            draw_panel(state, canvas, "Game Over", 64.0, "Restart");
            let c = state.arena.center;
            canvas.fill_text(
                &format!("Killed enemies: {}", state.scores.kills),
                Vec2::new(c.x, c.y - 150.0),
                36.0,
                TextAlign::Center,
                colors::TEXT,
            );
            canvas.fill_text(
                &format!("Precision: {} %", state.scores.precision),
                Vec2::new(c.x, c.y - 100.0),
                36.0,
                TextAlign::Center,
                colors::TEXT,
            );
            draw_cursor(state, canvas);
        }
    }
}

fn draw_field(state: &GameState, canvas: &mut impl Canvas) {
    let center = state.arena.center;
    canvas.fill_circle(center, state.config.attacker_radius, colors::ATTACKER);

    // No beak until the pointer has moved
    if state.aim.beak != Vec2::ZERO {
        canvas.stroke_line(center, state.aim.beak, BEAK_WIDTH, colors::BEAK);
    }

    for arrow in state.projectiles.values() {
        canvas.fill_circle(arrow.pos, arrow.radius, colors::ARROW);
    }
    for enemy in state.enemies.values() {
        canvas.fill_circle(enemy.pos, enemy.radius, colors::ENEMY);
    }
}

fn draw_hud(state: &GameState, canvas: &mut impl Canvas) {
    let origin = state.arena.center * 0.05;
    let lines = [
        format!("Life: {}", state.scores.life),
        format!("Killed enemies: {}", state.scores.kills),
        format!("Precision: {} %", state.scores.precision),
        format!("Live enemies: {}", state.enemies.len()),
    ];
    for (i, line) in lines.iter().enumerate() {
        let pos = origin + Vec2::new(0.0, i as f32 * HUD_LINE);
        canvas.fill_text(line, pos, HUD_FONT, TextAlign::Left, colors::TEXT);
    }
}

fn draw_panel(
    state: &GameState,
    canvas: &mut impl Canvas,
    title: &str,
    title_size: f32,
    button: &str,
) {
    let panel = state.arena.overlay_panel();
    canvas.fill_rect(panel.min, panel.size(), colors::OVERLAY);
    canvas.fill_text(title, state.arena.center, title_size, TextAlign::Center, colors::TEXT);

    let hit = state.arena.button();
    canvas.fill_rect(hit.min, hit.size(), colors::BUTTON);
    canvas.fill_text(button, hit.center(), 24.0, TextAlign::Center, colors::TEXT);
}

fn draw_cursor(state: &GameState, canvas: &mut impl Canvas) {
    canvas.draw_cursor(state.aim.cursor, state.config.aim_size);
}
