// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key and value operations consumed by the [prefix tree](crate::tree::PrefixTree).
//!
//! The tree is generic over its keys and values; it learns how keys relate and how
//! values combine only through a [`PrefixOps`] implementation.
//! [`HandlerOps`](crate::handler::HandlerOps) is the implementation used for handler templates.

/// Operations over keys `K` ordered by a prefix relation, and values `V` that can
/// be merged and moved to more general keys.
pub trait PrefixOps<K, V> {
    /// True iff `general` equals `specific` or is a strict ancestor of it.
    fn is_prefix_of(&self, general: &K, specific: &K) -> bool;

    /// Most specific key that is a prefix of both, or `None` for disjoint roots.
    fn common_prefix(&self, a: &K, b: &K) -> Option<K>;

    /// Adapt a value registered at `sub` so it can be stored at the more general `sup`
    /// while still only applying to keys under `sub`.
    ///
    /// Must return `value` unchanged when `sub == sup`.
    fn promote(&self, value: V, sub: &K, sup: &K) -> V;

    /// Merge two values stored at the same key; `first` takes precedence.
    ///
    /// Must be associative.
    fn squash(&self, first: V, second: V) -> V;
}
