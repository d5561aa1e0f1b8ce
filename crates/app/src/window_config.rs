//! Window configuration for the desktop app.

use app::APP_NAME;
use macroquad::window::Conf;

/// Room view on the left, stats panel on the right.
const DEFAULT_WINDOW_WIDTH: i32 = 1000;
const DEFAULT_WINDOW_HEIGHT: i32 = 750;

pub fn build_window_conf() -> Conf {
    Conf {
        window_title: APP_NAME.to_owned(),
        window_width: DEFAULT_WINDOW_WIDTH,
        window_height: DEFAULT_WINDOW_HEIGHT,
        high_dpi: true,
        window_resizable: false,
        ..Default::default()
    }
}
