#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use dotmerge_core::{GameDispatcher, SessionSnapshot, Tile};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Dispatcher whose events are collected as JSON strings
fn recording_dispatcher(seed: &str) -> (GameDispatcher, Rc<RefCell<Vec<String>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        let json = js_sys::JSON::stringify(&event)
            .map(String::from)
            .unwrap_or_default();
        sink.borrow_mut().push(json);
    });
    let function: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
    callback.forget();
    (GameDispatcher::new(function, Some(seed.to_string())), events)
}

fn state(dispatcher: &GameDispatcher) -> SessionSnapshot {
    serde_json::from_str(&dispatcher.get_state().unwrap()).unwrap()
}

fn partners(dispatcher: &GameDispatcher) -> (String, String) {
    let tiles: Vec<Tile> = serde_json::from_str(&dispatcher.get_board().unwrap()).unwrap();
    let first = tiles.iter().find(|t| !t.matched).unwrap();
    let partner = tiles
        .iter()
        .find(|t| t.pair_key == first.pair_key && t.id != first.id)
        .unwrap();
    (first.id.to_string(), partner.id.to_string())
}

#[wasm_bindgen_test]
fn start_level_announces_board() {
    let (dispatcher, events) = recording_dispatcher("board");
    dispatcher.start_level("easy").unwrap();

    assert_eq!(dispatcher.phase().unwrap(), "playing");
    assert_eq!(dispatcher.time_remaining().unwrap(), 100);
    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains(r#""type":"board:ready""#));
}

#[wasm_bindgen_test]
fn clearing_the_board_wins() {
    let (dispatcher, events) = recording_dispatcher("win");
    dispatcher.start_custom(4, 30).unwrap();

    let (a, b) = partners(&dispatcher);
    let outcome = dispatcher.submit_pairing(&a, &b).unwrap();
    assert!(outcome.contains(r#""outcome":"merged""#));

    let (a, b) = partners(&dispatcher);
    let outcome = dispatcher.submit_pairing(&a, &b).unwrap();
    assert!(outcome.contains(r#""outcome":"won""#));

    assert_eq!(state(&dispatcher).remaining_pairs, 0);
    let last = events.borrow().last().cloned().unwrap();
    assert!(last.contains(r#""phase":"won""#));
}

#[wasm_bindgen_test]
fn manual_ticks_time_out() {
    let (dispatcher, _events) = recording_dispatcher("timeout");
    dispatcher
        .start(r#"{"pairCount":2,"rows":4,"cols":4,"timeLimitSecs":2}"#)
        .unwrap();

    assert_eq!(dispatcher.tick().unwrap(), "playing");
    assert_eq!(dispatcher.tick().unwrap(), "timedOut");
    assert!(dispatcher.tick().is_err());

    dispatcher.restart().unwrap();
    assert_eq!(dispatcher.time_remaining().unwrap(), 2);
    dispatcher.reset().unwrap();
    assert_eq!(dispatcher.phase().unwrap(), "idle");
}

#[wasm_bindgen_test]
fn bad_input_is_rejected() {
    let (dispatcher, _events) = recording_dispatcher("bad");
    assert!(dispatcher.start_level("expert").is_err());
    assert!(dispatcher.start_custom(5, 30).is_err());
    dispatcher.start_level("hard").unwrap();
    assert!(dispatcher.submit_pairing("not-a-uuid", "also-not").is_err());
}

#[wasm_bindgen_test]
fn mute_toggles_and_is_reported() {
    let (dispatcher, events) = recording_dispatcher("mute");
    assert!(!dispatcher.is_muted().unwrap());
    assert!(dispatcher.toggle_mute().unwrap());
    assert!(dispatcher.is_muted().unwrap());
    assert!(!dispatcher.toggle_mute().unwrap());

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains(r#""muted":true"#));
}

fn tick_count(events: &Rc<RefCell<Vec<String>>>) -> usize {
    events
        .borrow()
        .iter()
        .filter(|e| e.contains(r#""type":"time:tick""#))
        .count()
}

#[wasm_bindgen_test]
async fn interval_clock_stops_on_timeout_and_reset() {
    let (dispatcher, events) = recording_dispatcher("interval");
    dispatcher
        .start(r#"{"pairCount":2,"rows":4,"cols":4,"timeLimitSecs":1}"#)
        .unwrap();

    TimeoutFuture::new(1_500).await;
    assert_eq!(dispatcher.phase().unwrap(), "timedOut");
    assert_eq!(tick_count(&events), 1);

    // a timed-out session gets no further ticks
    TimeoutFuture::new(1_500).await;
    assert_eq!(tick_count(&events), 1);
    assert_eq!(dispatcher.time_remaining().unwrap(), 0);

    dispatcher.start_custom(4, 30).unwrap();
    TimeoutFuture::new(1_500).await;
    let before_reset = tick_count(&events);
    assert!(before_reset >= 2);

    dispatcher.reset().unwrap();
    TimeoutFuture::new(2_500).await;
    assert_eq!(tick_count(&events), before_reset);
    assert_eq!(dispatcher.phase().unwrap(), "idle");
}

#[wasm_bindgen_test]
fn calls_from_inside_the_event_handler_are_busy() {
    let slot: Rc<RefCell<Option<Rc<GameDispatcher>>>> = Rc::new(RefCell::new(None));
    let busy = Rc::new(RefCell::new(Vec::new()));

    let (handler_slot, handler_busy) = (Rc::clone(&slot), Rc::clone(&busy));
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
        if let Some(dispatcher) = handler_slot.borrow().as_ref() {
            handler_busy.borrow_mut().push(dispatcher.get_state().is_err());
        }
    });
    let function: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
    callback.forget();

    let dispatcher = Rc::new(GameDispatcher::new(function, Some("reentrant".to_string())));
    *slot.borrow_mut() = Some(Rc::clone(&dispatcher));

    dispatcher.start_level("easy").unwrap();
    assert_eq!(*busy.borrow(), vec![true]);
    // outside the handler the same call succeeds
    assert!(dispatcher.get_state().is_ok());
}
