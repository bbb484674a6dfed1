use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use pixelbox_core::input::{Button, Buttons, Direction, InputError, InputSnapshot, InputSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, KeyboardEvent};

/// Fold held `KeyboardEvent.code` values into a snapshot.
pub fn snapshot<'a, I>(held: I) -> InputSnapshot
where
    I: IntoIterator<Item = &'a str>,
{
    let (mut up, mut down, mut left, mut right) = (false, false, false, false);
    let mut buttons = Buttons::NONE;
    let mut back = false;
    for code in held {
        match code {
            "ArrowUp" | "KeyW" => up = true,
            "ArrowDown" | "KeyS" => down = true,
            "ArrowLeft" | "KeyA" => left = true,
            "ArrowRight" | "KeyD" => right = true,
            "Space" | "KeyZ" => buttons.insert(Button::Primary),
            "KeyX" | "ShiftLeft" => buttons.insert(Button::Secondary),
            "Escape" | "Backspace" => back = true,
            _ => {}
        }
    }
    InputSnapshot {
        direction: Direction::from_delta(
            right as i32 - left as i32,
            down as i32 - up as i32,
        ),
        buttons,
        back,
    }
}

fn is_game_key(code: &str) -> bool {
    snapshot([code]) != InputSnapshot::NEUTRAL
}

type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

const EVENTS: [&str; 2] = ["keydown", "keyup"];

/// Keyboard state collected from `keydown`/`keyup` listeners on a target.
///
/// Listeners stay registered for the lifetime of this value and are removed
/// from the target when it drops, before the closures are freed.
pub struct DomInput {
    target: EventTarget,
    held: Rc<RefCell<HashSet<String>>>,
    tapped_back: Rc<Cell<bool>>,
    listeners: [KeyListener; 2],
}

impl DomInput {
    pub fn attach(target: &EventTarget) -> Result<Self, InputError> {
        let held: Rc<RefCell<HashSet<String>>> = Rc::default();
        let tapped_back: Rc<Cell<bool>> = Rc::default();

        let down = {
            let held = Rc::clone(&held);
            let tapped_back = Rc::clone(&tapped_back);
            Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    // Keep arrows and space from scrolling the page.
                    event.prevent_default();
                }
                if snapshot([code.as_str()]).back {
                    tapped_back.set(true);
                }
                held.borrow_mut().insert(code);
            })
        };
        let up = {
            let held = Rc::clone(&held);
            Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                held.borrow_mut().remove(&event.code());
            })
        };

        let input = Self {
            target: target.clone(),
            held,
            tapped_back,
            listeners: [down, up],
        };
        // On failure `input` drops and unregisters whatever was added.
        for (name, listener) in EVENTS.iter().zip(&input.listeners) {
            input
                .target
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .map_err(|e| InputError::Device(format!("{e:?}")))?;
        }
        Ok(input)
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.held.borrow().len()
    }
}

impl Drop for DomInput {
    fn drop(&mut self) {
        for (name, listener) in EVENTS.iter().zip(&self.listeners) {
            // Removing a listener that was never added is a no-op.
            let _ = self
                .target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
        self.held.borrow_mut().clear();
    }
}

impl InputSource for DomInput {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        let held = self.held.borrow();
        let mut snap = snapshot(held.iter().map(String::as_str));
        snap.back |= self.tapped_back.replace(false);
        Ok(snap)
    }
}
