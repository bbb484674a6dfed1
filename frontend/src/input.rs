use std::collections::HashMap;

use pixelbox_core::input::{Button, Buttons, Direction, InputError, InputSnapshot, InputSource};
use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::config::{ConfigError, KeyConfig};

/// What a key does when held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Up,
    Down,
    Left,
    Right,
    Button(Button),
    Back,
}

/// Maps SDL scancodes to bindings.
#[derive(Debug, Default)]
pub struct KeyMap {
    map: HashMap<Scancode, Binding>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scancode, replacing any earlier binding for it.
    pub fn bind(&mut self, scancode: Scancode, binding: Binding) {
        self.map.insert(scancode, binding);
    }

    pub fn get(&self, scancode: Scancode) -> Option<Binding> {
        self.map.get(&scancode).copied()
    }

    /// Build a key map from scancode names in the settings file.
    pub fn from_config(keys: &KeyConfig) -> Result<Self, ConfigError> {
        let mut km = Self::new();
        let groups: [(&[String], Binding); 7] = [
            (keys.up.as_slice(), Binding::Up),
            (keys.down.as_slice(), Binding::Down),
            (keys.left.as_slice(), Binding::Left),
            (keys.right.as_slice(), Binding::Right),
            (keys.primary.as_slice(), Binding::Button(Button::Primary)),
            (keys.secondary.as_slice(), Binding::Button(Button::Secondary)),
            (keys.back.as_slice(), Binding::Back),
        ];
        for (names, binding) in groups {
            for name in names {
                let sc = Scancode::from_name(name)
                    .ok_or_else(|| ConfigError::UnknownKey(name.clone()))?;
                km.bind(sc, binding);
            }
        }
        Ok(km)
    }

    /// Fold a set of held keys into a snapshot. Opposing directions cancel.
    pub fn snapshot<I>(&self, held: I) -> InputSnapshot
    where
        I: IntoIterator<Item = Scancode>,
    {
        let mut up = false;
        let mut down = false;
        let mut left = false;
        let mut right = false;
        let mut buttons = Buttons::NONE;
        let mut back = false;

        for sc in held {
            match self.get(sc) {
                Some(Binding::Up) => up = true,
                Some(Binding::Down) => down = true,
                Some(Binding::Left) => left = true,
                Some(Binding::Right) => right = true,
                Some(Binding::Button(b)) => buttons.insert(b),
                Some(Binding::Back) => back = true,
                None => {}
            }
        }
        // Two keys bound to the same direction must not count twice.
        let dx = right as i32 - left as i32;
        let dy = down as i32 - up as i32;

        InputSnapshot {
            direction: Direction::from_delta(dx, dy),
            buttons,
            back,
        }
    }
}

/// Keyboard input through the SDL event pump.
///
/// Window close and a key press on a back binding are latched between
/// polls, so a tap shorter than one frame still cancels.
pub struct KeyboardInput {
    pump: EventPump,
    key_map: KeyMap,
    closed: bool,
}

impl KeyboardInput {
    pub fn new(pump: EventPump, key_map: KeyMap) -> Self {
        Self {
            pump,
            key_map,
            closed: false,
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        let mut tapped_back = false;
        for event in self.pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.closed = true,
                Event::KeyDown {
                    scancode: Some(sc),
                    ..
                } if self.key_map.get(sc) == Some(Binding::Back) => tapped_back = true,
                _ => {}
            }
        }

        let mut snapshot = self
            .key_map
            .snapshot(self.pump.keyboard_state().pressed_scancodes());
        snapshot.back |= self.closed || tapped_back;
        Ok(snapshot)
    }
}
