//! Session state machine
//!
//! NotStarted -> Running (Start button) -> GameOver (life lost) -> Running
//! (Restart button). The session owns the [`GameState`] and a [`Scheduler`];
//! the host feeds it input events and elapsed time.

use std::time::Duration;

use glam::Vec2;

use crate::config::GameConfig;
use crate::scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};
use crate::sim::{GameState, SessionPhase, TickReport, fire_projectile, spawn_enemy, tick};

/// Input delivered by the host, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
}

/// Totals for one [`Session::advance`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceSummary {
    /// Frames (simulation ticks) run
    pub frames: u32,
    /// Enemies spawned
    pub spawned: u32,
    pub breaches: u32,
    pub kills: u32,
    pub game_over: bool,
}

impl AdvanceSummary {
    fn absorb(&mut self, report: TickReport) {
        self.frames += 1;
        self.breaches += report.breaches;
        self.kills += report.kills;
        self.game_over |= report.game_over;
    }
}

pub struct Session<S: Scheduler = ManualScheduler> {
    state: GameState,
    scheduler: S,
    /// Pending BeginSpawning or live SpawnEnemy task
    spawn_task: Option<TaskHandle>,
    restarts: u32,
}

impl Session<ManualScheduler> {
    pub fn new(config: GameConfig, seed: u64, width: f32, height: f32) -> Self {
        Self::with_scheduler(config, seed, width, height, ManualScheduler::new())
    }
}

impl<S: Scheduler> Session<S> {
    pub fn with_scheduler(
        config: GameConfig,
        seed: u64,
        width: f32,
        height: f32,
        mut scheduler: S,
    ) -> Self {
        let period = config.frame_period();
        scheduler.register_periodic(Task::Frame, period, period);
        log::info!("Session created with seed: {}", seed);
        Self {
            state: GameState::new(config, seed, width, height),
            scheduler,
            spawn_task: None,
            restarts: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Elapsed scheduler time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Is the enemy spawn schedule (or its start delay) active?
    pub fn spawning(&self) -> bool {
        self.spawn_task.is_some()
    }

    /// Apply one input event
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => {
                let Some(pointer) = finite_point(x, y) else {
                    log::warn!("Ignoring pointer move to ({}, {})", x, y);
                    return;
                };
                let center = self.state.arena.center;
                let beak_length = self.state.config.beak_length;
                self.state.aim.point_at(pointer, center, beak_length);
            }
            InputEvent::Click { x, y } => {
                let Some(pointer) = finite_point(x, y) else {
                    log::warn!("Ignoring click at ({}, {})", x, y);
                    return;
                };
                self.on_click(pointer);
            }
            InputEvent::Resize { width, height } => {
                if !self.state.arena.resize(width, height) {
                    log::warn!("Ignoring resize to {}x{}", width, height);
                }
            }
        }
    }

    fn on_click(&mut self, pointer: Vec2) {
        if self.state.arena.button().contains(pointer) {
            match self.state.phase {
                SessionPhase::NotStarted => {
                    self.start();
                    return;
                }
                SessionPhase::GameOver => {
                    self.restart();
                    return;
                }
                SessionPhase::Running => {}
            }
        }
        fire_projectile(&mut self.state);
    }

    /// Run every task due within the next `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> AdvanceSummary {
        let until = self.scheduler.now() + elapsed;
        let mut summary = AdvanceSummary::default();
        while let Some(task) = self.scheduler.next_due(until) {
            self.run_task(task, &mut summary);
        }
        self.scheduler.advance_to(until);
        summary
    }

    fn run_task(&mut self, task: Task, summary: &mut AdvanceSummary) {
        match task {
            Task::Frame => {
                let report = tick(&mut self.state);
                summary.absorb(report);
                if report.game_over {
                    self.end();
                }
            }
            Task::BeginSpawning => self.begin_spawning(),
            Task::SpawnEnemy => {
                if self.state.is_running() {
                    spawn_enemy(&mut self.state);
                    summary.spawned += 1;
                }
            }
        }
    }

    fn start(&mut self) {
        self.state.phase = SessionPhase::Running;
        self.cancel_spawning();
        let delay = self.state.config.spawn_start_delay();
        self.spawn_task = Some(self.scheduler.register_once(Task::BeginSpawning, delay));
        log::info!("Game started");
    }

    fn begin_spawning(&mut self) {
        let interval = self.state.config.spawn_interval();
        self.spawn_task = Some(
            self.scheduler
                .register_periodic(Task::SpawnEnemy, interval, interval),
        );
    }

    fn end(&mut self) {
        self.cancel_spawning();
        let scores = self.state.scores;
        log::info!(
            "Game over: {} kills, {}% precision, {} enemies left",
            scores.kills,
            scores.precision,
            self.state.enemies.len()
        );
    }

    fn restart(&mut self) {
        self.state.reset();
        self.state.phase = SessionPhase::Running;
        self.cancel_spawning();
        self.begin_spawning();
        self.restarts += 1;
        log::info!("Game restarted (restart #{})", self.restarts);
    }

    fn cancel_spawning(&mut self) {
        if let Some(handle) = self.spawn_task.take() {
            self.scheduler.cancel(handle);
        }
    }
}

fn finite_point(x: f32, y: f32) -> Option<Vec2> {
    (x.is_finite() && y.is_finite()).then(|| Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, EntityId};

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn session() -> Session {
        Session::new(GameConfig::default(), 777, W, H)
    }

    fn click_button(s: &mut Session) {
        let c = s.state().arena.button().center();
        s.dispatch(InputEvent::Click { x: c.x, y: c.y });
    }

    fn advance_ms(s: &mut Session, ms: u64) -> AdvanceSummary {
        s.advance(Duration::from_millis(ms))
    }

    /// Place an enemy one step from breaching
    fn doomed_enemy(s: &mut Session) -> EntityId {
        s.state_mut().enemies.insert_with(|_| Enemy {
            pos: Vec2::new(446.0, 300.0),
            radius: 15.0,
            speed: 2.0,
            heading: 0.0,
        })
    }

    #[test]
    fn test_no_physics_before_start() {
        let mut s = session();
        s.dispatch(InputEvent::Click { x: 10.0, y: 10.0 });
        let summary = advance_ms(&mut s, 5000);
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert_eq!(summary.spawned, 0);
        assert!(s.state().projectiles.is_empty());
        assert_eq!(s.state().time_ticks, 0);
    }

    #[test]
    fn test_start_button_does_not_fire() {
        let mut s = session();
        click_button(&mut s);
        assert_eq!(s.phase(), SessionPhase::Running);
        assert!(s.state().projectiles.is_empty());
        assert!(s.spawning());

        // Clicking the same spot while running fires
        click_button(&mut s);
        assert_eq!(s.state().projectiles.len(), 1);
    }

    #[test]
    fn test_first_enemy_two_seconds_after_start() {
        let mut s = session();
        click_button(&mut s);
        assert_eq!(advance_ms(&mut s, 1999).spawned, 0);
        assert_eq!(advance_ms(&mut s, 1).spawned, 1);
        assert_eq!(advance_ms(&mut s, 1000).spawned, 1);
        assert_eq!(s.state().enemies.len(), 2);
    }

    #[test]
    fn test_frames_follow_fps() {
        let mut s = session();
        click_button(&mut s);
        let summary = advance_ms(&mut s, 1000);
        assert_eq!(summary.frames, 60);
        assert_eq!(s.state().time_ticks, 60);
    }

    #[test]
    fn test_breach_ends_game_and_stops_spawning() {
        let mut s = session();
        click_button(&mut s);
        doomed_enemy(&mut s);

        let summary = advance_ms(&mut s, 20);
        assert!(summary.game_over);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.state().scores.life, 2);
        assert!(!s.spawning());

        assert_eq!(advance_ms(&mut s, 10_000).spawned, 0);
        assert!(s.state().enemies.is_empty());

        // Clicks off the button do nothing while game over
        s.dispatch(InputEvent::Click { x: 5.0, y: 5.0 });
        assert!(s.state().projectiles.is_empty());
        assert_eq!(s.phase(), SessionPhase::GameOver);
    }

    #[test]
    fn test_restart_resets_everything_but_config() {
        let config = GameConfig {
            arrow_speed: 12.0,
            ..Default::default()
        };
        let mut s = Session::new(config.clone(), 3, W, H);
        click_button(&mut s);
        s.dispatch(InputEvent::PointerMove { x: 800.0, y: 0.0 });
        s.dispatch(InputEvent::Click { x: 700.0, y: 100.0 });
        s.dispatch(InputEvent::Click { x: 700.0, y: 100.0 });
        advance_ms(&mut s, 2500);
        doomed_enemy(&mut s);
        advance_ms(&mut s, 20);
        assert_eq!(s.phase(), SessionPhase::GameOver);

        click_button(&mut s);
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.restarts(), 1);
        let state = s.state();
        assert_eq!(state.scores.life, config.life_amount);
        assert_eq!(state.scores.kills, 0);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies.id_counter(), 1);
        assert_eq!(state.projectiles.id_counter(), 1);
        assert_eq!(state.config, config);

        // Spawning resumes one interval after restart
        assert_eq!(advance_ms(&mut s, 1000).spawned, 1);
        assert_eq!(s.state().enemies.ids(), vec![EntityId(1)]);
    }

    #[test]
    fn test_pointer_move_updates_aim_in_every_phase() {
        let mut s = session();
        s.dispatch(InputEvent::PointerMove { x: 400.0, y: 100.0 });
        assert_eq!(s.state().aim.cursor, Vec2::new(400.0, 100.0));
        assert!((s.state().aim.beak - Vec2::new(400.0, 250.0)).length() < 1e-3);

        s.dispatch(InputEvent::PointerMove {
            x: f32::NAN,
            y: 0.0,
        });
        assert_eq!(s.state().aim.cursor, Vec2::new(400.0, 100.0));
    }

    #[test]
    fn test_resize_moves_center_only() {
        let mut s = session();
        click_button(&mut s);
        advance_ms(&mut s, 2000);
        let before: Vec<_> = s.state().enemies.values().map(|e| e.pos).collect();

        s.dispatch(InputEvent::Resize {
            width: 1200.0,
            height: 900.0,
        });
        assert_eq!(s.state().arena.center, Vec2::new(600.0, 450.0));
        let after: Vec<_> = s.state().enemies.values().map(|e| e.pos).collect();
        assert_eq!(before, after);

        s.dispatch(InputEvent::Resize {
            width: 0.0,
            height: -1.0,
        });
        assert_eq!(s.state().arena.center, Vec2::new(600.0, 450.0));
    }
}
