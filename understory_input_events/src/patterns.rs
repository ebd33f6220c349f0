// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture patterns over [`InputEvent`].
//!
//! Every pattern here implements [`EventPattern<InputEvent>`] and hands the
//! matched event to the action unchanged.

use alloc::vec;
use alloc::vec::Vec;

use understory_input_map::hierarchy;
use understory_input_map::pattern::EventPattern;

use crate::types::{EventKind, InputEvent, KeyCode, ModifierFilter, PointerButton};

/// Matches a key press or release of one key under a modifier filter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyPattern {
    kind: EventKind,
    key: KeyCode,
    modifiers: ModifierFilter,
}

/// Press of `key` with `modifiers`; plain [`Modifiers`](crate::types::Modifiers) match exactly.
pub fn key_pressed(key: KeyCode, modifiers: impl Into<ModifierFilter>) -> KeyPattern {
    KeyPattern {
        kind: EventKind::KeyPressed,
        key,
        modifiers: modifiers.into(),
    }
}

/// Release of `key`, whatever modifiers are held.
pub fn key_released(key: KeyCode) -> KeyPattern {
    KeyPattern {
        kind: EventKind::KeyReleased,
        key,
        modifiers: ModifierFilter::ANY,
    }
}

impl EventPattern<InputEvent> for KeyPattern {
    type Matched = InputEvent;

    fn classifications(&self) -> Vec<EventKind> {
        vec![self.kind]
    }

    fn match_event(&self, event: &InputEvent) -> Option<InputEvent> {
        (event.kind == self.kind
            && event.key == Some(self.key)
            && self.modifiers.matches(event.modifiers))
        .then_some(*event)
    }
}

/// Matches a typed character.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypedPattern {
    text: char,
}

/// Typed character `text`, whatever modifiers are held.
pub fn key_typed(text: char) -> TypedPattern {
    TypedPattern { text }
}

impl EventPattern<InputEvent> for TypedPattern {
    type Matched = InputEvent;

    fn classifications(&self) -> Vec<EventKind> {
        vec![EventKind::KeyTyped]
    }

    fn match_event(&self, event: &InputEvent) -> Option<InputEvent> {
        (event.kind == EventKind::KeyTyped && event.text == Some(self.text)).then_some(*event)
    }
}

/// Matches a pointer button press or release.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ButtonPattern {
    kind: EventKind,
    button: PointerButton,
}

/// Press of pointer `button`.
pub fn pointer_pressed(button: PointerButton) -> ButtonPattern {
    ButtonPattern {
        kind: EventKind::PointerPressed,
        button,
    }
}

/// Release of pointer `button`.
pub fn pointer_released(button: PointerButton) -> ButtonPattern {
    ButtonPattern {
        kind: EventKind::PointerReleased,
        button,
    }
}

impl EventPattern<InputEvent> for ButtonPattern {
    type Matched = InputEvent;

    fn classifications(&self) -> Vec<EventKind> {
        vec![self.kind]
    }

    fn match_event(&self, event: &InputEvent) -> Option<InputEvent> {
        (event.kind == self.kind && event.button == Some(self.button)).then_some(*event)
    }
}

/// Matches every event of one kind or any kind below it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct KindPattern {
    kind: EventKind,
}

/// Any event classified at or below `kind`, such as every key event for [`EventKind::Key`].
pub fn any_of(kind: EventKind) -> KindPattern {
    KindPattern { kind }
}

impl EventPattern<InputEvent> for KindPattern {
    type Matched = InputEvent;

    fn classifications(&self) -> Vec<EventKind> {
        vec![self.kind]
    }

    fn match_event(&self, event: &InputEvent) -> Option<InputEvent> {
        hierarchy::is_prefix_of(self.kind, event.kind).then_some(*event)
    }
}
