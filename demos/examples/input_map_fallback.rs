// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fallback installation.
//!
//! One keymap is installed as a fallback on two text fields. The first field
//! already has its own handler for `A`, so the fallback never sees that key
//! there; the second field has nothing else installed.
//!
//! Run:
//! - `cargo run -p understory_input_demos --example input_map_fallback`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_input_events::patterns::key_pressed;
use understory_input_events::types::{InputEvent, KeyCode, ModifierFilter, Modifiers};
use understory_input_map::install::InputMapSlot;
use understory_input_map::template::{InputMapTemplate, consume, ignore};

#[derive(Clone, Debug, Default)]
struct Field {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Field {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let fallback: InputMapTemplate<Field, InputEvent> = consume(
        key_pressed(KeyCode::Char('a'), ModifierFilter::ANY),
        |f: &Field, _: InputEvent| f.log.borrow_mut().push("A"),
    )
    .or(consume(
        key_pressed(KeyCode::Char('b'), ModifierFilter::ANY),
        |f: &Field, _: InputEvent| f.log.borrow_mut().push("B"),
    ));
    let own_a: InputMapTemplate<Field, InputEvent> =
        ignore(key_pressed(KeyCode::Char('a'), ModifierFilter::ANY));

    let mut gated = InputMapSlot::new(Field::named("gated"));
    gated.install_override(&own_a);
    gated.install_fallback(&fallback);

    let mut open = InputMapSlot::new(Field::named("open"));
    open.install_fallback(&fallback);

    let a = InputEvent::key_pressed(KeyCode::Char('a'), Modifiers::empty());
    let b = InputEvent::key_pressed(KeyCode::Char('b'), Modifiers::empty());
    for slot in [&gated, &open] {
        for (label, event) in [("A", &a), ("B", &b)] {
            let result = slot.dispatch(event);
            println!("{:>5}: {label} -> {result:?}", slot.subject().name);
        }
        println!("{:>5}: fallback recorded {:?}", slot.subject().name, slot.subject().log.borrow());
    }
}
