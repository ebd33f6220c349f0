// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input map basics.
//!
//! Builds a small keymap for a counter, binds it, and feeds it a handful of events.
//! Shows sequencing across classifications, a gate, and a post-result hook.
//!
//! Run:
//! - `cargo run -p understory_input_demos --example input_map_basics`
//! - `RUST_LOG=trace cargo run -p understory_input_demos --example input_map_basics`
//!   to watch every dispatch step.

use std::cell::Cell;

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use understory_input_events::patterns::{any_of, key_pressed, key_typed, pointer_pressed};
use understory_input_events::types::{EventKind, InputEvent, KeyCode, Modifiers, PointerButton};
use understory_input_map::template::{InputMapTemplate, consume, ignore, sequence, unless};

#[derive(Default)]
struct Counter {
    value: Cell<i64>,
    locked: Cell<bool>,
    handled: Cell<u32>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let editing: InputMapTemplate<Counter, InputEvent> = sequence([
        consume(key_typed('+'), |c: &Counter, _: InputEvent| {
            c.value.set(c.value.get() + 1);
        }),
        consume(key_typed('-'), |c: &Counter, _: InputEvent| {
            c.value.set(c.value.get() - 1);
        }),
        consume(key_pressed(KeyCode::Char('r'), Modifiers::CONTROL), |c: &Counter, _: InputEvent| {
            c.value.set(0);
        }),
    ]);

    let keymap = sequence([
        unless(|c: &Counter| c.locked.get(), editing),
        consume(pointer_pressed(PointerButton::Secondary), |c: &Counter, _: InputEvent| {
            c.locked.set(!c.locked.get());
        }),
        // Swallow every other key so it does not reach anything behind us.
        ignore(any_of(EventKind::Key)),
    ])
    .if_consumed(|c: &Counter, _: &InputEvent| c.handled.set(c.handled.get() + 1));

    println!("template: {keymap:?}");
    let bound = keymap.bind(Counter::default());
    bound.for_each_event_type(|kind, _| println!("registered for {kind:?}"));

    let events = [
        InputEvent::key_typed('+', Modifiers::empty()),
        InputEvent::key_typed('+', Modifiers::empty()),
        InputEvent::key_typed('-', Modifiers::empty()),
        InputEvent::key_typed('x', Modifiers::empty()),
        InputEvent::pointer_pressed(PointerButton::Secondary, Point::new(10.0, 10.0)),
        InputEvent::key_typed('+', Modifiers::empty()),
        InputEvent::pointer_moved(Point::new(12.0, 11.0)),
        InputEvent::pointer_pressed(PointerButton::Secondary, Point::new(10.0, 10.0)),
        InputEvent::key_pressed(KeyCode::Char('r'), Modifiers::CONTROL),
    ];

    for event in &events {
        let result = bound.handle(event);
        let c = bound.subject();
        println!(
            "{:<16} -> {result:?}  (value {}, locked {})",
            format!("{:?}", event.kind),
            c.value.get(),
            c.locked.get()
        );
    }
    println!("consumed {} events", bound.subject().handled.get());
}
