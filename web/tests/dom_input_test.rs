#![cfg(target_arch = "wasm32")]

use pixelbox_core::input::{Direction, InputSource};
use pixelbox_web::DomInput;
use wasm_bindgen_test::*;
use web_sys::{EventTarget, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn key(target: &EventTarget, kind: &str, code: &str) {
    let init = KeyboardEventInit::new();
    init.set_code(code);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict(kind, &init).unwrap();
    target.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn test_held_keys_reach_poll() {
    let target = EventTarget::new().unwrap();
    let mut input = DomInput::attach(&target).unwrap();

    key(&target, "keydown", "ArrowUp");
    assert_eq!(input.held_count(), 1);
    assert_eq!(input.poll().unwrap().direction, Some(Direction::Up));

    key(&target, "keyup", "ArrowUp");
    assert_eq!(input.poll().unwrap().direction, None);
}

#[wasm_bindgen_test]
fn test_escape_tap_is_latched_once() {
    let target = EventTarget::new().unwrap();
    let mut input = DomInput::attach(&target).unwrap();

    key(&target, "keydown", "Escape");
    key(&target, "keyup", "Escape");
    assert!(input.poll().unwrap().back);
    assert!(!input.poll().unwrap().back);
}

#[wasm_bindgen_test]
fn test_dropped_input_detaches_from_target() {
    let target = EventTarget::new().unwrap();
    let first = DomInput::attach(&target).unwrap();
    drop(first);

    // Events after the drop must not reach the freed closures; a second
    // session on the same target works normally.
    key(&target, "keydown", "ArrowLeft");
    key(&target, "keyup", "ArrowLeft");

    let mut second = DomInput::attach(&target).unwrap();
    assert_eq!(second.held_count(), 0);
    key(&target, "keydown", "KeyD");
    assert_eq!(second.poll().unwrap().direction, Some(Direction::Right));
}
