mod frame_input;
mod render;
mod textures;
mod window_config;

use std::env;

use anyhow::Context;
use app::app_loop::AppState;
use app::seed::{generate_runtime_seed, resolve_launch_options};
use crawler_core::{Game, GameConfig};
use macroquad::window::{Conf, next_frame};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::frame_input::capture_frame_input;
use crate::render::{RoomView, draw_frame};

fn window_conf() -> Conf {
    window_config::build_window_conf()
}

fn start_game() -> anyhow::Result<Game> {
    let args: Vec<String> = env::args().collect();
    let options = resolve_launch_options(&args, generate_runtime_seed())?;
    let config = match &options.config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    info!(seed = options.seed.value(), config = ?options.config_path, "starting run");
    Game::new(options.seed.value(), config).context("building the first floor")
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut game = match start_game() {
        Ok(game) => game,
        Err(err) => {
            error!("{err:#}");
            return;
        }
    };
    let mut app_state = AppState::new();

    loop {
        let view = RoomView::fit(game.config().room_height);
        let input = capture_frame_input(&view);
        app_state.tick(&mut game, &input);
        draw_frame(&game, &app_state, &view);
        next_frame().await
    }
}
