// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prefix tree keyed by classifications, with merge-on-insert.
//!
//! ## Overview
//!
//! Keys are ordered by the prefix relation of a [`PrefixOps`] implementation
//! (for event classifications: "is an ancestor of"). Each node holds a key, an
//! optional value, and children whose keys it is a strict prefix of.
//!
//! ## Invariants
//!
//! - A node's key is a strict prefix of every key in its subtree.
//! - Any two siblings have the parent's key as their common prefix (at the top
//!   level: they share no common prefix at all). Consequently at most one child of
//!   a node lies on the path to any given key.
//! - Along any root→leaf path, values appear in insertion order, most general first.
//!
//! ## Insertion
//!
//! Inserting `(key, value)` walks down from the top through nodes whose keys are
//! prefixes of `key`. Ancestor values stay where they are. Then:
//!
//! - If a node with exactly `key` exists, its descendants' values are promoted up
//!   into it and squashed after its own value, followed by `value`.
//! - If some siblings lie under `key`, they are promoted and squashed into a new
//!   node at `key`, followed by `value`. This keeps earlier, narrower values ahead
//!   of later, broader ones.
//! - If a sibling shares a more specific common prefix with `key`, a value-less
//!   branch node is created at that prefix holding both.
//! - Otherwise a new leaf is appended.
//!
//! Nodes live in an arena of slots with a free list; collapsed subtrees return
//! their slots for reuse.

use alloc::vec::Vec;

use crate::ops::PrefixOps;

/// An append-only prefix tree over keys `K` with values `V`, driven by `O`.
pub struct PrefixTree<K, V, O> {
    ops: O,
    slots: Vec<Option<Node<K, V>>>,
    free_list: Vec<usize>,
    roots: Vec<usize>,
    values: usize,
}

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: Option<V>,
    children: Vec<usize>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            children: Vec::new(),
        }
    }
}

enum Step<K> {
    Store(usize),
    Descend(usize),
    Absorb(Vec<usize>),
    Branch { pos: usize, prefix: K },
    Append,
}

impl<K, V, O> core::fmt::Debug for PrefixTree<K, V, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|n| n.is_some()).count();
        f.debug_struct("PrefixTree")
            .field("slots_total", &total)
            .field("nodes_alive", &alive)
            .field("values", &self.values)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<K: Clone, V: Clone, O: Clone> Clone for PrefixTree<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            ops: self.ops.clone(),
            slots: self.slots.clone(),
            free_list: self.free_list.clone(),
            roots: self.roots.clone(),
            values: self.values,
        }
    }
}

impl<K, V, O> PrefixTree<K, V, O>
where
    K: Clone + Eq,
    O: PrefixOps<K, V>,
{
    /// Create an empty tree using `ops` for key relations and value merging.
    pub fn new(ops: O) -> Self {
        Self {
            ops,
            slots: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            values: 0,
        }
    }

    /// The operations this tree was built with.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Number of stored values (keys with a value, not branch points).
    pub fn len(&self) -> usize {
        self.values
    }

    /// Returns true if no value is stored.
    pub fn is_empty(&self) -> bool {
        self.values == 0
    }

    /// Insert `value` at `key`, merging with [`PrefixOps::squash`] on collision.
    pub fn insert(&mut self, key: K, value: V) {
        let mut level: Option<usize> = None;
        loop {
            match self.plan(level, &key) {
                Step::Descend(c) => level = Some(c),
                Step::Store(c) => {
                    let children = core::mem::take(&mut self.node_mut(c).children);
                    let mut merged = self.node_mut(c).value.take();
                    if merged.is_some() {
                        self.values -= 1;
                    }
                    for child in children {
                        let promoted = self.collapse(child, &key);
                        merged = self.squash_opt(merged, promoted);
                    }
                    let merged = self.squash_opt(merged, Some(value));
                    self.node_mut(c).value = merged;
                    self.values += 1;
                    return;
                }
                Step::Absorb(positions) => {
                    tracing::debug!(
                        absorbed = positions.len(),
                        "prefix tree: promoting narrower entries into new key"
                    );
                    let first = positions[0];
                    let mut taken = Vec::with_capacity(positions.len());
                    for &pos in positions.iter().rev() {
                        taken.push(self.children_mut(level).remove(pos));
                    }
                    taken.reverse();
                    let mut merged = None;
                    for child in taken {
                        let promoted = self.collapse(child, &key);
                        merged = self.squash_opt(merged, promoted);
                    }
                    let merged = self.squash_opt(merged, Some(value));
                    let idx = self.alloc(Node::new(key, merged));
                    self.children_mut(level).insert(first, idx);
                    self.values += 1;
                    return;
                }
                Step::Branch { pos, prefix } => {
                    tracing::debug!("prefix tree: branching at common prefix");
                    let existing = self.children(level)[pos];
                    let leaf = self.alloc(Node::new(key, Some(value)));
                    let mut branch = Node::new(prefix, None);
                    branch.children.push(existing);
                    branch.children.push(leaf);
                    let branch = self.alloc(branch);
                    self.children_mut(level)[pos] = branch;
                    self.values += 1;
                    return;
                }
                Step::Append => {
                    let leaf = self.alloc(Node::new(key, Some(value)));
                    self.children_mut(level).push(leaf);
                    self.values += 1;
                    return;
                }
            }
        }
    }

    /// Value stored at exactly `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.path(key)
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Values on the path from the top of the tree to `key`, most general first.
    ///
    /// Visits every node whose key is a prefix of `key`, including `key` itself.
    /// This is the dispatch order for an event classified as `key`.
    pub fn path<'t, 'k>(&'t self, key: &'k K) -> Path<'t, 'k, K, V, O> {
        Path {
            tree: self,
            level: &self.roots,
            target: key,
        }
    }

    /// Lazily enumerate stored `(key, value)` pairs in pre-order.
    ///
    /// Ancestors come before their descendants; siblings keep insertion order.
    /// Each call starts a fresh traversal.
    pub fn entries(&self) -> Entries<'_, K, V> {
        let mut stack: Vec<usize> = self.roots.clone();
        stack.reverse();
        Entries {
            slots: &self.slots,
            stack,
        }
    }

    /// Rebuild the tree with every value replaced by `f(value)`.
    ///
    /// Keys and shape are unchanged; `ops` drives the new tree.
    pub fn map<W, O2, F>(self, mut f: F, ops: O2) -> PrefixTree<K, W, O2>
    where
        F: FnMut(V) -> W,
        O2: PrefixOps<K, W>,
    {
        let slots = self
            .slots
            .into_iter()
            .map(|slot| {
                slot.map(|n| Node {
                    key: n.key,
                    value: n.value.map(&mut f),
                    children: n.children,
                })
            })
            .collect();
        PrefixTree {
            ops,
            slots,
            free_list: self.free_list,
            roots: self.roots,
            values: self.values,
        }
    }

    fn plan(&self, level: Option<usize>, key: &K) -> Step<K> {
        let children = self.children(level);
        let mut absorbed = Vec::new();
        for (pos, &c) in children.iter().enumerate() {
            let ck = &self.node(c).key;
            if ck == key {
                return Step::Store(c);
            }
            if self.ops.is_prefix_of(ck, key) {
                return Step::Descend(c);
            }
            if self.ops.is_prefix_of(key, ck) {
                absorbed.push(pos);
            }
        }
        if !absorbed.is_empty() {
            return Step::Absorb(absorbed);
        }
        let level_key = level.map(|l| &self.node(l).key);
        for (pos, &c) in children.iter().enumerate() {
            if let Some(prefix) = self.ops.common_prefix(&self.node(c).key, key)
                && Some(&prefix) != level_key
            {
                return Step::Branch { pos, prefix };
            }
        }
        Step::Append
    }

    // Remove the subtree at `idx`, returning its values promoted to `target` and
    // squashed in pre-order.
    fn collapse(&mut self, idx: usize, target: &K) -> Option<V> {
        let node = self.slots[idx].take()?;
        self.free_list.push(idx);
        if node.value.is_some() {
            self.values -= 1;
        }
        let mut acc = node
            .value
            .map(|v| self.ops.promote(v, &node.key, target));
        for child in node.children {
            let sub = self.collapse(child, target);
            acc = self.squash_opt(acc, sub);
        }
        acc
    }

    fn squash_opt(&self, first: Option<V>, second: Option<V>) -> Option<V> {
        match (first, second) {
            (Some(a), Some(b)) => Some(self.ops.squash(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn children(&self, level: Option<usize>) -> &Vec<usize> {
        match level {
            None => &self.roots,
            Some(l) => &self.node(l).children,
        }
    }

    fn children_mut(&mut self, level: Option<usize>) -> &mut Vec<usize> {
        match level {
            None => &mut self.roots,
            Some(l) => &mut self.node_mut(l).children,
        }
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx].as_ref().expect("dangling prefix tree slot")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx].as_mut().expect("dangling prefix tree slot")
    }
}

/// Iterator over stored values on the path to a key.
///
/// Returned by [`PrefixTree::path`].
pub struct Path<'t, 'k, K, V, O> {
    tree: &'t PrefixTree<K, V, O>,
    level: &'t [usize],
    target: &'k K,
}

impl<K, V, O> core::fmt::Debug for Path<'_, '_, K, V, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Path")
            .field("remaining_candidates", &self.level.len())
            .finish_non_exhaustive()
    }
}

impl<'t, K, V, O> Iterator for Path<'t, '_, K, V, O>
where
    K: Clone + Eq,
    O: PrefixOps<K, V>,
{
    type Item = (&'t K, &'t V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let tree = self.tree;
            let next = self.level.iter().find_map(|&c| {
                let node = tree.node(c);
                tree.ops
                    .is_prefix_of(&node.key, self.target)
                    .then_some(node)
            });
            let node = next?;
            self.level = &node.children;
            if let Some(v) = &node.value {
                return Some((&node.key, v));
            }
        }
    }
}

/// Pre-order iterator over stored `(key, value)` pairs.
///
/// Returned by [`PrefixTree::entries`].
#[derive(Clone)]
pub struct Entries<'a, K, V> {
    slots: &'a [Option<Node<K, V>>],
    stack: Vec<usize>,
}

impl<K, V> core::fmt::Debug for Entries<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entries")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.stack.pop() {
            let Some(node) = self.slots[idx].as_ref() else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());
            if let Some(v) = &node.value {
                return Some((&node.key, v));
            }
        }
        None
    }
}
