// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the input map: handler results and the classification boundary.
//!
//! ## Overview
//!
//! These types describe the dispatch protocol and the two traits an embedding
//! toolkit implements to describe its events.
//! They are referenced by every other module in this crate.

use core::fmt::Debug;
use core::hash::Hash;

/// Result of a single handler invocation.
///
/// Exactly one variant is produced per invocation. Results compose with the
/// sequencing rule: a [`Proceed`](InputResult::Proceed) hands the event to the
/// next candidate, anything else stops the walk and is returned unchanged.
///
/// "No handler matched" is represented by `Proceed`, not by an error.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum InputResult {
    /// Declined; try the next handler.
    #[default]
    Proceed,
    /// Handled; stop and mark the event consumed.
    Consume,
    /// Handled; stop without marking the event consumed.
    Ignore,
}

impl InputResult {
    /// Returns true for [`Consume`](Self::Consume) and [`Ignore`](Self::Ignore).
    #[inline]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Proceed)
    }

    /// Returns true only for [`Consume`](Self::Consume).
    ///
    /// A delivery mechanism uses this to decide whether to mark the event consumed.
    #[inline]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consume)
    }

    /// Sequence `self` with a lazily evaluated follow-up.
    ///
    /// `next` runs only when `self` is [`Proceed`](Self::Proceed).
    ///
    /// ```
    /// use understory_input_map::types::InputResult;
    ///
    /// assert_eq!(InputResult::Proceed.then(|| InputResult::Ignore), InputResult::Ignore);
    /// assert_eq!(
    ///     InputResult::Consume.then(|| unreachable!("short-circuited")),
    ///     InputResult::Consume
    /// );
    /// ```
    #[inline]
    pub fn then(self, next: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Proceed => next(),
            handled => handled,
        }
    }

    /// Fold a lazy sequence of results with the sequencing rule.
    ///
    /// Stops pulling from `results` at the first handled result. An empty
    /// sequence yields [`Proceed`](Self::Proceed).
    pub fn sequence(results: impl IntoIterator<Item = Self>) -> Self {
        results
            .into_iter()
            .find(|r| r.is_handled())
            .unwrap_or(Self::Proceed)
    }
}

/// A position in a single-inheritance classification hierarchy.
///
/// Each classification has at most one parent ("more general than"); following
/// parents from any classification must eventually reach a root. Depth is not
/// limited; a parent chain that loops is a malformed hierarchy.
/// Implementations are usually a field-less enum with a `match` in [`parent`](Self::parent).
pub trait Classification: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Returns the immediate parent, or `None` at a root.
    fn parent(&self) -> Option<Self>;
}

/// An event that knows its runtime classification.
pub trait Classified {
    /// Classification type of the hierarchy this event belongs to.
    type Class: Classification;

    /// Returns the runtime classification of this event.
    fn classification(&self) -> Self::Class;
}
