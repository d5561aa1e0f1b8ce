//! Keyboard and mouse collection for one rendered frame.

use app::app_loop::FrameInput;
use crawler_core::PlayerInput;
use macroquad::prelude::{
    KeyCode, MouseButton, get_char_pressed, get_frame_time, is_key_down, is_key_pressed,
    is_mouse_button_down, mouse_position,
};

use crate::render::RoomView;

const MODE_KEYS: [KeyCode; 4] =
    [KeyCode::Escape, KeyCode::GraveAccent, KeyCode::Enter, KeyCode::Backspace];

pub fn capture_frame_input(view: &RoomView) -> FrameInput {
    let keys_pressed = MODE_KEYS.into_iter().filter(|&key| is_key_pressed(key)).collect();

    let mut typed = Vec::new();
    while let Some(c) = get_char_pressed() {
        typed.push(c);
    }

    let axis = |negative: KeyCode, positive: KeyCode| {
        f32::from(u8::from(is_key_down(positive))) - f32::from(u8::from(is_key_down(negative)))
    };
    let (mouse_x, mouse_y) = mouse_position();
    let player = PlayerInput {
        move_x: axis(KeyCode::A, KeyCode::D),
        move_y: axis(KeyCode::W, KeyCode::S),
        aim: view.to_room(mouse_x, mouse_y),
        shoot: is_key_down(KeyCode::Space) || is_mouse_button_down(MouseButton::Left),
        reload: is_key_pressed(KeyCode::R),
        dodge: is_key_pressed(KeyCode::LeftShift) || is_key_pressed(KeyCode::RightShift),
    };

    FrameInput { keys_pressed, typed, player, frame_ms: get_frame_time() * 1000.0 }
}
