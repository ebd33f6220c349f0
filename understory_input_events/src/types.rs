// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kinds, key and button identifiers, modifiers, and the event value itself.

use bitflags::bitflags;
use kurbo::{Point, Vec2};
use understory_input_map::types::{Classification, Classified};

/// Classification of an [`InputEvent`].
///
/// ```text
/// Any
/// └── Input
///     ├── Key ─────── KeyPressed, KeyReleased, KeyTyped
///     ├── Pointer ─── PointerPressed, PointerReleased, PointerMoved, PointerDragged
///     └── Scroll
/// ```
///
/// Events always carry one of the leaf kinds; the inner kinds exist so handlers
/// can be registered for a whole family at once.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Root of the hierarchy.
    Any,
    /// Any user input.
    Input,
    /// Any keyboard event.
    Key,
    /// A key went down (or auto-repeated).
    KeyPressed,
    /// A key went up.
    KeyReleased,
    /// A key press produced a character.
    KeyTyped,
    /// Any pointer event.
    Pointer,
    /// A pointer button went down.
    PointerPressed,
    /// A pointer button went up.
    PointerReleased,
    /// The pointer moved with no button held.
    PointerMoved,
    /// The pointer moved with a button held.
    PointerDragged,
    /// A wheel or touchpad scroll.
    Scroll,
}

impl EventKind {
    /// Every kind, ancestors before descendants.
    pub const ALL: [Self; 12] = [
        Self::Any,
        Self::Input,
        Self::Key,
        Self::KeyPressed,
        Self::KeyReleased,
        Self::KeyTyped,
        Self::Pointer,
        Self::PointerPressed,
        Self::PointerReleased,
        Self::PointerMoved,
        Self::PointerDragged,
        Self::Scroll,
    ];
}

impl Classification for EventKind {
    fn parent(&self) -> Option<Self> {
        match self {
            Self::Any => None,
            Self::Input => Some(Self::Any),
            Self::Key | Self::Pointer | Self::Scroll => Some(Self::Input),
            Self::KeyPressed | Self::KeyReleased | Self::KeyTyped => Some(Self::Key),
            Self::PointerPressed
            | Self::PointerReleased
            | Self::PointerMoved
            | Self::PointerDragged => Some(Self::Pointer),
        }
    }
}

/// Logical key identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyCode {
    /// A key that produces a character, identified by its unshifted character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key `F1`..`F24`.
    F(u8),
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either Shift key.
        const SHIFT   = 0b0000_0001;
        /// Either Control key.
        const CONTROL = 0b0000_0010;
        /// Either Alt / Option key.
        const ALT     = 0b0000_0100;
        /// Either Meta / Command / Super key.
        const META    = 0b0000_1000;
    }
}

/// How a pattern compares the modifiers of an event.
///
/// Plain [`Modifiers`] convert into an exact match, so
/// `key_pressed(KeyCode::Char('s'), Modifiers::CONTROL)` does not fire for
/// Ctrl+Shift+S. Use [`ModifierFilter::ANY`] to accept any combination.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ModifierFilter {
    /// Held modifiers must equal these exactly.
    Exact(Modifiers),
    /// Held modifiers must include these; others may also be held.
    AtLeast(Modifiers),
}

impl ModifierFilter {
    /// Accept any modifier state.
    pub const ANY: Self = Self::AtLeast(Modifiers::empty());

    /// Returns true if `held` passes this filter.
    pub fn matches(self, held: Modifiers) -> bool {
        match self {
            Self::Exact(m) => held == m,
            Self::AtLeast(m) => held.contains(m),
        }
    }
}

impl From<Modifiers> for ModifierFilter {
    fn from(m: Modifiers) -> Self {
        Self::Exact(m)
    }
}

/// Pointer button identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerButton {
    /// Usually the left mouse button or a touch contact.
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Usually the middle mouse button.
    Auxiliary,
    /// Any other button, numbered by the platform.
    Other(u8),
}

/// A single input event.
///
/// Fields that do not apply to the event's kind hold `None` or zero. Build events
/// with the kind-specific constructors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputEvent {
    /// Leaf classification of the event.
    pub kind: EventKind,
    /// Key for keyboard press and release events.
    pub key: Option<KeyCode>,
    /// Character for typed events.
    pub text: Option<char>,
    /// Modifiers held when the event occurred.
    pub modifiers: Modifiers,
    /// Button for pointer press, release, and drag events.
    pub button: Option<PointerButton>,
    /// Pointer position in the subject's coordinate space.
    pub position: Point,
    /// Scroll amount for scroll events.
    pub scroll_delta: Vec2,
}

impl InputEvent {
    fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            text: None,
            modifiers: Modifiers::empty(),
            button: None,
            position: Point::ORIGIN,
            scroll_delta: Vec2::ZERO,
        }
    }

    /// A key press.
    pub fn key_pressed(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key: Some(key),
            modifiers,
            ..Self::new(EventKind::KeyPressed)
        }
    }

    /// A key release.
    pub fn key_released(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key: Some(key),
            modifiers,
            ..Self::new(EventKind::KeyReleased)
        }
    }

    /// A typed character.
    pub fn key_typed(text: char, modifiers: Modifiers) -> Self {
        Self {
            text: Some(text),
            modifiers,
            ..Self::new(EventKind::KeyTyped)
        }
    }

    /// A pointer button press at `position`.
    pub fn pointer_pressed(button: PointerButton, position: Point) -> Self {
        Self {
            button: Some(button),
            position,
            ..Self::new(EventKind::PointerPressed)
        }
    }

    /// A pointer button release at `position`.
    pub fn pointer_released(button: PointerButton, position: Point) -> Self {
        Self {
            button: Some(button),
            position,
            ..Self::new(EventKind::PointerReleased)
        }
    }

    /// A pointer move with no button held.
    pub fn pointer_moved(position: Point) -> Self {
        Self {
            position,
            ..Self::new(EventKind::PointerMoved)
        }
    }

    /// A pointer move with `button` held.
    pub fn pointer_dragged(button: PointerButton, position: Point) -> Self {
        Self {
            button: Some(button),
            position,
            ..Self::new(EventKind::PointerDragged)
        }
    }

    /// A scroll by `delta` with the pointer at `position`.
    pub fn scroll(position: Point, delta: Vec2) -> Self {
        Self {
            position,
            scroll_delta: delta,
            ..Self::new(EventKind::Scroll)
        }
    }

    /// Replace the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Classified for InputEvent {
    type Class = EventKind;

    fn classification(&self) -> EventKind {
        self.kind
    }
}
