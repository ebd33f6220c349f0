// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Input Events: Kurbo-native input events and gesture patterns.
//!
//! This crate gives [`understory_input_map`] a concrete event vocabulary:
//!
//! - [`EventKind`](crate::types::EventKind): the classification hierarchy, from
//!   `Any` down to leaf kinds such as `KeyPressed` and `PointerDragged`.
//! - [`InputEvent`](crate::types::InputEvent): one event value carrying key,
//!   character, [`Modifiers`](crate::types::Modifiers), pointer button, a
//!   [`kurbo::Point`] position, and a scroll delta.
//! - [Patterns](crate::patterns) for the usual gestures:
//!   [`key_pressed`](crate::patterns::key_pressed),
//!   [`key_released`](crate::patterns::key_released),
//!   [`key_typed`](crate::patterns::key_typed),
//!   [`pointer_pressed`](crate::patterns::pointer_pressed),
//!   [`pointer_released`](crate::patterns::pointer_released), and
//!   [`any_of`](crate::patterns::any_of).
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use understory_input_events::patterns::{any_of, key_pressed};
//! use understory_input_events::types::{EventKind, InputEvent, KeyCode, Modifiers};
//! use understory_input_map::template::{InputMapTemplate, consume, ignore, sequence};
//! use understory_input_map::types::InputResult;
//!
//! struct Doc { saves: Cell<u32> }
//!
//! let keys: InputMapTemplate<Doc, InputEvent> = sequence([
//!     consume(key_pressed(KeyCode::Char('s'), Modifiers::CONTROL), |d: &Doc, _: InputEvent| {
//!         d.saves.set(d.saves.get() + 1);
//!     }),
//!     ignore(any_of(EventKind::Key)),
//! ]);
//!
//! let bound = keys.bind(Doc { saves: Cell::new(0) });
//! let ctrl_s = InputEvent::key_pressed(KeyCode::Char('s'), Modifiers::CONTROL);
//! assert_eq!(bound.handle(&ctrl_s), InputResult::Consume);
//! assert_eq!(bound.handle(&ctrl_s.with_modifiers(Modifiers::empty())), InputResult::Ignore);
//! assert_eq!(bound.subject().saves.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod patterns;
pub mod types;
