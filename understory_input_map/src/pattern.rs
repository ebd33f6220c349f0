// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event patterns: the gesture-matching boundary of the input map.
//!
//! A pattern tells the input map which classifications it should be registered
//! under and, for a live event, whether the event matches and what refined value
//! the action receives. Concrete gesture vocabularies (keystrokes, pointer chords)
//! implement [`EventPattern`] outside this crate.

use alloc::vec::Vec;

use crate::hierarchy;
use crate::types::Classified;

/// A predicate over events that yields a refined value on a match.
pub trait EventPattern<E: Classified> {
    /// Refined value handed to the action when the pattern matches.
    type Matched;

    /// Every classification under which this pattern should be registered.
    fn classifications(&self) -> Vec<E::Class>;

    /// Match `event`, returning the refined value or `None`.
    fn match_event(&self, event: &E) -> Option<Self::Matched>;
}

/// Matches every event classified at or below one classification.
///
/// Returned by [`event_type`]. The matched value is a clone of the event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EventTypePattern<K> {
    kind: K,
}

/// Pattern matching every event of classification `kind` or any descendant.
pub fn event_type<K>(kind: K) -> EventTypePattern<K> {
    EventTypePattern { kind }
}

impl<E> EventPattern<E> for EventTypePattern<E::Class>
where
    E: Classified + Clone,
{
    type Matched = E;

    fn classifications(&self) -> Vec<E::Class> {
        alloc::vec![self.kind]
    }

    fn match_event(&self, event: &E) -> Option<E> {
        hierarchy::is_prefix_of(self.kind, event.classification()).then(|| event.clone())
    }
}

/// A pattern made from a list of classifications and a matching closure.
///
/// Returned by [`pattern_fn`].
#[derive(Clone)]
pub struct FnPattern<K, F> {
    classes: Vec<K>,
    matcher: F,
}

impl<K: core::fmt::Debug, F> core::fmt::Debug for FnPattern<K, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnPattern")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

/// Build a pattern registered under `classes` that matches with `matcher`.
///
/// ```
/// use understory_input_map::pattern::{pattern_fn, EventPattern};
/// use understory_input_map::types::{Classification, Classified};
///
/// #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
/// struct Typed;
/// impl Classification for Typed {
///     fn parent(&self) -> Option<Self> { None }
/// }
/// struct Ch(char);
/// impl Classified for Ch {
///     type Class = Typed;
///     fn classification(&self) -> Typed { Typed }
/// }
///
/// let digits = pattern_fn([Typed], |e: &Ch| e.0.to_digit(10));
/// assert_eq!(digits.match_event(&Ch('7')), Some(7));
/// assert_eq!(digits.match_event(&Ch('x')), None);
/// ```
pub fn pattern_fn<K, F>(classes: impl IntoIterator<Item = K>, matcher: F) -> FnPattern<K, F> {
    FnPattern {
        classes: classes.into_iter().collect(),
        matcher,
    }
}

impl<E, M, F> EventPattern<E> for FnPattern<E::Class, F>
where
    E: Classified,
    F: Fn(&E) -> Option<M>,
{
    type Matched = M;

    fn classifications(&self) -> Vec<E::Class> {
        self.classes.clone()
    }

    fn match_event(&self, event: &E) -> Option<M> {
        (self.matcher)(event)
    }
}

/// Drop duplicates and classifications already covered by an ancestor in the list.
pub(crate) fn minimal_classes<E: Classified>(mut classes: Vec<E::Class>) -> Vec<E::Class> {
    let all = classes.clone();
    classes.retain(|k| {
        !all
            .iter()
            .any(|other| other != k && hierarchy::is_prefix_of(*other, *k))
    });
    let mut out: Vec<E::Class> = Vec::with_capacity(classes.len());
    for k in classes {
        if !out.contains(&k) {
            out.push(k);
        }
    }
    out
}
