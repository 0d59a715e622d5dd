/// Keyboard + gamepad merged behind one `InputSource`.

use crate::config::GamepadConfig;

use super::gamepad::GamepadState;
use super::input::InputState;
use super::{InputSource, Key};

pub struct Controls {
    pub keyboard: InputState,
    pub gamepad: GamepadState,
}

impl Controls {
    pub fn new(gamepad: &GamepadConfig) -> Self {
        Controls {
            keyboard: InputState::new(),
            gamepad: GamepadState::new(gamepad),
        }
    }
}

impl InputSource for Controls {
    fn poll(&mut self) {
        self.keyboard.drain_events();
        self.gamepad.update();
    }

    fn close_requested(&self) -> bool {
        self.keyboard.quit_requested() || self.gamepad.quit_pressed()
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keyboard.key_held(key)
            || match key {
                Key::Left => self.gamepad.left_held(),
                Key::Right => self.gamepad.right_held(),
            }
    }
}
