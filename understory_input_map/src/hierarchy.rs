// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification hierarchy operations: ancestor chains, prefix tests, and common prefixes.
//!
//! ## Overview
//!
//! A classification's *chain* is the list of classifications from its root down to
//! itself (inclusive). Comparisons between classifications are defined on chains:
//!
//! - [`is_prefix_of`]`(a, b)` holds when `a` equals `b` or is a strict ancestor of `b`.
//! - [`common_prefix`]`(a, b)` is the most specific classification on both chains,
//!   or `None` when the chains start at different roots.
//!
//! Chains are walked through [`Classification::parent`]. Hierarchies may be
//! arbitrarily deep, but a chain that never reaches a root (it revisits a
//! classification) is malformed and these functions panic once the repeat is found.
//! Use [`validate`] at integration time to check a hierarchy without panicking.
//!
//! ## Example
//!
//! ```
//! use understory_input_map::hierarchy::{chain, common_prefix, is_prefix_of};
//! use understory_input_map::types::Classification;
//!
//! #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
//! enum Kind { Input, Key, KeyPressed, KeyReleased }
//!
//! impl Classification for Kind {
//!     fn parent(&self) -> Option<Self> {
//!         match self {
//!             Kind::Input => None,
//!             Kind::Key => Some(Kind::Input),
//!             Kind::KeyPressed | Kind::KeyReleased => Some(Kind::Key),
//!         }
//!     }
//! }
//!
//! assert_eq!(chain(Kind::KeyPressed), vec![Kind::Input, Kind::Key, Kind::KeyPressed]);
//! assert!(is_prefix_of(Kind::Key, Kind::KeyReleased));
//! assert_eq!(common_prefix(Kind::KeyPressed, Kind::KeyReleased), Some(Kind::Key));
//! ```

use alloc::vec::Vec;

use crate::types::Classification;

/// Problems found by [`validate`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum HierarchyError<K: Classification> {
    /// No classifications were supplied.
    #[error("no classifications supplied")]
    Empty,
    /// The ancestor chain of `kind` loops without reaching a root.
    #[error("ancestor chain of {kind:?} does not reach a root")]
    Unterminated {
        /// Classification whose chain did not terminate.
        kind: K,
    },
    /// Two classifications descend from different roots.
    #[error("classifications descend from different roots {first:?} and {second:?}")]
    MultipleRoots {
        /// Root of the first classification checked.
        first: K,
        /// A different root found later.
        second: K,
    },
}

/// Iterator over a classification and its ancestors, most specific first.
///
/// Returned by [`ancestors`]. Panics if the chain revisits a classification.
///
/// Cycles are found with Brent's algorithm: a saved classification is compared
/// against each step and moved forward at power-of-two intervals, so the walk uses
/// constant space and stops within a few laps of any loop.
#[derive(Clone, Debug)]
pub struct Ancestors<K> {
    next: Option<K>,
    origin: K,
    saved: Option<K>,
    power: usize,
    lap: usize,
}

impl<K: Classification> Ancestors<K> {
    // `Err` once the walk has come back to a classification it already passed.
    fn try_next(&mut self) -> Option<Result<K, K>> {
        let cur = self.next?;
        if self.saved == Some(cur) {
            self.next = None;
            return Some(Err(self.origin));
        }
        self.lap += 1;
        if self.lap == self.power {
            self.saved = Some(cur);
            self.power *= 2;
            self.lap = 0;
        }
        self.next = cur.parent();
        Some(Ok(cur))
    }
}

impl<K: Classification> Iterator for Ancestors<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        match self.try_next()? {
            Ok(k) => Some(k),
            Err(origin) => panic!(
                "malformed classification hierarchy: ancestor chain of {origin:?} does not reach a root"
            ),
        }
    }
}

/// Walk `kind` and its ancestors, most specific first.
pub fn ancestors<K: Classification>(kind: K) -> Ancestors<K> {
    Ancestors {
        next: Some(kind),
        origin: kind,
        saved: None,
        power: 1,
        lap: 0,
    }
}

/// Returns the root→`kind` chain (inclusive).
pub fn chain<K: Classification>(kind: K) -> Vec<K> {
    let mut out: Vec<K> = ancestors(kind).collect();
    out.reverse();
    out
}

/// Number of strict ancestors of `kind` (roots have depth `0`).
pub fn depth<K: Classification>(kind: K) -> usize {
    ancestors(kind).count() - 1
}

/// Returns true iff `general` equals `specific` or is a strict ancestor of it.
///
/// Reflexive and transitive.
pub fn is_prefix_of<K: Classification>(general: K, specific: K) -> bool {
    ancestors(specific).any(|k| k == general)
}

/// Returns the most specific classification that is an ancestor-or-self of both
/// `a` and `b`, or `None` when they descend from different roots.
pub fn common_prefix<K: Classification>(a: K, b: K) -> Option<K> {
    let ca = chain(a);
    let cb = chain(b);
    // Length of the shared root-side run of both chains.
    let mut lca = 0;
    while lca < ca.len() && lca < cb.len() && ca[lca] == cb[lca] {
        lca += 1;
    }
    lca.checked_sub(1).map(|i| ca[i])
}

/// Check that every classification in `kinds` reaches a root and that they all
/// share one root, returning that root.
///
/// This is the non-panicking counterpart to the chain walks above, meant to be run
/// once when an embedding application wires up its event vocabulary.
pub fn validate<K: Classification>(
    kinds: impl IntoIterator<Item = K>,
) -> Result<K, HierarchyError<K>> {
    let mut root: Option<K> = None;
    for kind in kinds {
        let r = try_root(kind).ok_or(HierarchyError::Unterminated { kind })?;
        match root {
            None => root = Some(r),
            Some(first) if first != r => {
                return Err(HierarchyError::MultipleRoots { first, second: r });
            }
            Some(_) => {}
        }
    }
    root.ok_or(HierarchyError::Empty)
}

fn try_root<K: Classification>(kind: K) -> Option<K> {
    let mut walk = ancestors(kind);
    let mut last = kind;
    while let Some(step) = walk.try_next() {
        last = step.ok()?;
    }
    Some(last)
}
