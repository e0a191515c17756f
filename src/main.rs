//! Attacker Game entry point
//!
//! Web: hooks the session up to an HTML canvas, mouse events and
//! requestAnimationFrame. Native: runs a headless autopilot session and
//! prints the final stats.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use attacker_game::renderer::{Canvas, TextAlign, present};
    use attacker_game::{GameConfig, InputEvent, Session};

    /// Longest gap fed to the scheduler in one animation frame (tab was hidden, etc.)
    const MAX_FRAME_GAP_MS: f64 = 100.0;

    fn css(color: [f32; 4]) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(color[0]),
            channel(color[1]),
            channel(color[2]),
            color[3]
        )
    }

    /// Canvas 2D implementation of the presentation adapter
    struct CanvasPainter {
        ctx: CanvasRenderingContext2d,
        cursor: HtmlImageElement,
        size: (f64, f64),
    }

    impl Canvas for CanvasPainter {
        fn clear(&mut self, color: [f32; 4]) {
            let (w, h) = self.size;
            self.ctx.clear_rect(0.0, 0.0, w, h);
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }

        fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx
                .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.fill();
        }

        fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
            self.ctx.begin_path();
            self.ctx.move_to(from.x as f64, from.y as f64);
            self.ctx.line_to(to.x as f64, to.y as f64);
            self.ctx.set_stroke_style_str(&css(color));
            self.ctx.set_line_width(width as f64);
            self.ctx.stroke();
        }

        fn draw_cursor(&mut self, center: Vec2, size: f32) {
            let half = size as f64 / 2.0;
            if self.cursor.complete() && self.cursor.natural_width() > 0 {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &self.cursor,
                    center.x as f64 - half,
                    center.y as f64 - half,
                    size as f64,
                    size as f64,
                );
            } else {
                self.ctx.begin_path();
                let _ = self.ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    half,
                    0.0,
                    std::f64::consts::TAU,
                );
                self.ctx.set_stroke_style_str("white");
                self.ctx.set_line_width(2.0);
                self.ctx.stroke();
            }
        }

        fn fill_text(
            &mut self,
            text: &str,
            pos: Vec2,
            size: f32,
            align: TextAlign,
            color: [f32; 4],
        ) {
            self.ctx.set_font(&format!("{}px Arial", size));
            self.ctx.set_fill_style_str(&css(color));
            let (mut x, mut y) = (pos.x as f64, pos.y as f64);
            if align == TextAlign::Center {
                if let Ok(metrics) = self.ctx.measure_text(text) {
                    let height = metrics.actual_bounding_box_ascent()
                        + metrics.actual_bounding_box_descent();
                    x -= metrics.width() / 2.0;
                    y += height / 2.0;
                }
            }
            let _ = self.ctx.fill_text(text, x, y);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        painter: CanvasPainter,
        canvas: HtmlCanvasElement,
        last_time: f64,
    }

    impl Game {
        fn resize(&mut self, width: f64, height: f64) {
            self.canvas.set_width(width.max(0.0) as u32);
            self.canvas.set_height(height.max(0.0) as u32);
            self.painter.size = (width, height);
            self.session.dispatch(InputEvent::Resize {
                width: width as f32,
                height: height as f32,
            });
        }

        /// Canvas-relative position of a mouse event
        fn local_pos(&self, event: &MouseEvent) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            (
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            )
        }

        fn frame(&mut self, time: f64) {
            let elapsed_ms = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_GAP_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.session
                .advance(Duration::from_secs_f64(elapsed_ms / 1000.0));
            present(self.session.state(), &mut self.painter);
        }
    }

    fn window_size(window: &web_sys::Window) -> (f64, f64) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w, h)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Attacker Game starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let cursor = HtmlImageElement::new()?;
        cursor.set_src("aim.svg");

        let config = GameConfig::load();
        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        let (width, height) = window_size(&window);
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(config, seed, width as f32, height as f32),
            painter: CanvasPainter {
                ctx,
                cursor,
                size: (width, height),
            },
            canvas: canvas.clone(),
            last_time: 0.0,
        }));
        game.borrow_mut().resize(width, height);

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&window, game.clone());
        request_animation_frame(game);

        log::info!("Attacker Game running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, y) = g.local_pos(&event);
                g.session.dispatch(InputEvent::PointerMove { x, y });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, y) = g.local_pos(&event);
                g.session.dispatch(InputEvent::Click { x, y });
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = window_size(&window);
            game.borrow_mut().resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game.borrow_mut().frame(time);
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::Serialize;

    use attacker_game::autopilot::Autopilot;
    use attacker_game::renderer::{VertexBatch, present};
    use attacker_game::sim::{Scores, SessionPhase};
    use attacker_game::{ConfigError, GameConfig, Session};

    const VIEWPORT: (f32, f32) = (1280.0, 720.0);
    /// Stop a run that outlives this much simulated time
    const TIME_LIMIT: Duration = Duration::from_secs(300);

    #[derive(Debug, Serialize)]
    struct RunReport {
        seed: u64,
        seconds: f32,
        /// Simulation ticks since the last start
        ticks: u64,
        phase: SessionPhase,
        shots: u32,
        scores: Scores,
        last_frame_triangles: usize,
        /// Tuning the run used
        config: GameConfig,
    }

    fn load_config() -> Result<GameConfig, ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => GameConfig::load_from_path(Path::new(&path)),
            None => Ok(GameConfig::load()),
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let config = load_config()?;
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        let frame = config.frame_period();
        let mut session = Session::new(config, seed, VIEWPORT.0, VIEWPORT.1);
        let mut pilot = Autopilot::default();
        let mut batch = VertexBatch::new();

        while session.now() < TIME_LIMIT {
            for event in pilot.inputs(session.state()) {
                session.dispatch(event);
            }
            let summary = session.advance(frame);
            present(session.state(), &mut batch);
            if summary.game_over {
                break;
            }
        }

        let state = session.state();
        let report = RunReport {
            seed,
            seconds: session.now().as_secs_f32(),
            ticks: state.time_ticks,
            phase: state.phase,
            shots: state.shots_counter() - 1,
            scores: state.scores,
            last_frame_triangles: batch.triangle_count(),
            config: state.config.clone(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode report: {}", e),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Attacker Game (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use the web build to play");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
