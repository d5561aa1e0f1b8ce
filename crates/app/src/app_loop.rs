use std::collections::VecDeque;
use std::mem;

use crawler_core::{DebugConsole, Game, GameEvent, PlayerInput};
use macroquad::prelude::KeyCode;
use tracing::{debug, info};

/// Catch-up cap: a long frame never runs more simulation steps than this.
pub const MAX_STEPS_PER_FRAME: u32 = 5;
const RECENT_EVENTS: usize = 8;
const CONSOLE_HISTORY: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Playing,
    Paused,
    /// The debug console is open; the simulation is frozen while typing.
    Console { line: String },
    /// The last floor's boss is down.
    Finished,
}

/// Everything the front end collected during one rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub keys_pressed: Vec<KeyCode>,
    pub typed: Vec<char>,
    pub player: PlayerInput,
    pub frame_ms: f32,
}

#[derive(Default)]
pub struct AppState {
    pub mode: AppMode,
    accumulator_ms: f32,
    /// Key presses seen on frames that ran no step, held for the next tick.
    pending_reload: bool,
    pending_dodge: bool,
    console: DebugConsole,
    pub console_log: VecDeque<String>,
    pub recent_events: VecDeque<GameEvent>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one frame of input and runs as many fixed steps as the
    /// elapsed time allows. Returns the number of steps simulated.
    pub fn tick(&mut self, game: &mut Game, input: &FrameInput) -> u32 {
        let pressed = |key| input.keys_pressed.contains(&key);
        match &mut self.mode {
            AppMode::Playing => {
                if pressed(KeyCode::Escape) {
                    self.mode = AppMode::Paused;
                } else if pressed(KeyCode::GraveAccent) {
                    self.mode = AppMode::Console { line: String::new() };
                } else {
                    return self.step(game, input);
                }
            }
            AppMode::Paused => {
                if pressed(KeyCode::Escape) {
                    self.mode = AppMode::Playing;
                } else if pressed(KeyCode::GraveAccent) {
                    self.mode = AppMode::Console { line: String::new() };
                }
            }
            AppMode::Console { line } => {
                line.extend(input.typed.iter().filter(|c| !c.is_control() && **c != '`'));
                if pressed(KeyCode::Backspace) {
                    line.pop();
                }
                if pressed(KeyCode::Enter) {
                    let submitted = mem::take(line);
                    self.submit_console_line(game, &submitted);
                } else if pressed(KeyCode::Escape) || pressed(KeyCode::GraveAccent) {
                    self.mode = AppMode::Playing;
                }
            }
            AppMode::Finished => {}
        }
        self.accumulator_ms = 0.0;
        0
    }

    fn step(&mut self, game: &mut Game, input: &FrameInput) -> u32 {
        let tick_ms = game.config().tick_ms as f32;
        self.accumulator_ms += input.frame_ms.max(0.0);
        self.pending_reload |= input.player.reload;
        self.pending_dodge |= input.player.dodge;
        let mut steps = 0;
        while self.accumulator_ms >= tick_ms && steps < MAX_STEPS_PER_FRAME {
            let player = PlayerInput {
                reload: mem::take(&mut self.pending_reload),
                dodge: mem::take(&mut self.pending_dodge),
                ..input.player
            };
            game.tick(&player);
            self.accumulator_ms -= tick_ms;
            steps += 1;
            for event in game.drain_events() {
                self.record_event(event);
            }
            if self.mode == AppMode::Finished {
                break;
            }
        }
        if self.accumulator_ms >= tick_ms {
            debug!(dropped_ms = self.accumulator_ms, "frame too long, dropping catch-up");
            self.accumulator_ms %= tick_ms;
        }
        steps
    }

    fn record_event(&mut self, event: GameEvent) {
        if event == GameEvent::FinalBossDefeated {
            info!("run finished");
            self.mode = AppMode::Finished;
        }
        if self.recent_events.len() == RECENT_EVENTS {
            self.recent_events.pop_front();
        }
        self.recent_events.push_back(event);
    }

    fn submit_console_line(&mut self, game: &mut Game, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let reply = match self.console.run_line(line, game) {
            Ok(message) => message,
            Err(err) => format!("error: {err}"),
        };
        self.push_console_line(format!("> {line}"));
        self.push_console_line(reply);
        for event in game.drain_events() {
            self.record_event(event);
        }
    }

    fn push_console_line(&mut self, line: String) {
        if self.console_log.len() == CONSOLE_HISTORY {
            self.console_log.pop_front();
        }
        self.console_log.push_back(line);
    }
}
