// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler templates and the classification-keyed map that holds them.
//!
//! ## Overview
//!
//! A [`HandlerTemplate<S, E>`] is a function from a subject `&S` and an event `&E` to
//! an [`InputResult`], not yet bound to a concrete subject. Templates are cheap to
//! clone and compare: they are `Arc`-backed trees with an explicit representation
//! (plain closure, promotion guard, flattened sequence, condition gate, scoped hook)
//! rather than nested closures.
//!
//! A [`HandlerTemplateMap`] stores templates in a [`PrefixTree`] keyed by event
//! classification and dispatches an event along the root→classification path of
//! that tree, sequencing results with the `Proceed` rule.
//!
//! ## Example
//!
//! ```
//! use understory_input_map::handler::{HandlerTemplate, HandlerTemplateMap};
//! use understory_input_map::types::{Classification, Classified, InputResult};
//!
//! #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
//! enum Kind { Input, Key }
//! impl Classification for Kind {
//!     fn parent(&self) -> Option<Self> {
//!         match self { Kind::Input => None, Kind::Key => Some(Kind::Input) }
//!     }
//! }
//! struct Ev(Kind);
//! impl Classified for Ev {
//!     type Class = Kind;
//!     fn classification(&self) -> Kind { self.0 }
//! }
//!
//! let mut map: HandlerTemplateMap<u32, Ev> = HandlerTemplateMap::new();
//! map.insert_after(Kind::Input, HandlerTemplate::from_fn(|_: &u32, _: &Ev| InputResult::Proceed));
//! map.insert_after(Kind::Key, HandlerTemplate::from_fn(|n: &u32, _: &Ev| {
//!     if *n > 1 { InputResult::Consume } else { InputResult::Proceed }
//! }));
//!
//! assert_eq!(map.handle(&2, &Ev(Kind::Key)), InputResult::Consume);
//! assert_eq!(map.handle(&2, &Ev(Kind::Input)), InputResult::Proceed);
//! ```

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::hierarchy;
use crate::ops::PrefixOps;
use crate::tree::PrefixTree;
use crate::types::{Classified, InputResult};

type HandlerFn<S, E> = dyn Fn(&S, &E) -> InputResult + Send + Sync;
type ConditionFn<S> = dyn Fn(&S) -> bool + Send + Sync;
type HookFn<S, E> = dyn Fn(&S, &E) + Send + Sync;

/// A subject-generic event handler.
///
/// Equality and hashing are structural over the representation; closures compare
/// by identity, so a template equals its clones but not a separately built
/// template wrapping an identical closure.
pub struct HandlerTemplate<S, E: Classified> {
    repr: Arc<Repr<S, E>>,
}

enum Repr<S, E: Classified> {
    Func(Box<HandlerFn<S, E>>),
    Guarded {
        required: E::Class,
        inner: HandlerTemplate<S, E>,
    },
    Sequence(Vec<HandlerTemplate<S, E>>),
    Unless {
        condition: Arc<ConditionFn<S>>,
        inner: HandlerTemplate<S, E>,
    },
    Scoped {
        map: HandlerTemplateMap<S, E>,
        on: InputResult,
        hook: Arc<HookFn<S, E>>,
    },
}

impl<S, E: Classified> Clone for HandlerTemplate<S, E> {
    fn clone(&self) -> Self {
        Self {
            repr: Arc::clone(&self.repr),
        }
    }
}

impl<S, E: Classified> HandlerTemplate<S, E> {
    fn from_repr(repr: Repr<S, E>) -> Self {
        Self {
            repr: Arc::new(repr),
        }
    }

    /// Wrap a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&S, &E) -> InputResult + Send + Sync + 'static,
    {
        Self::from_repr(Repr::Func(Box::new(f)))
    }

    /// Run this handler for `subject` and `event`.
    pub fn handle(&self, subject: &S, event: &E) -> InputResult {
        match &*self.repr {
            Repr::Func(f) => f(subject, event),
            Repr::Guarded { required, inner } => {
                if hierarchy::is_prefix_of(*required, event.classification()) {
                    inner.handle(subject, event)
                } else {
                    InputResult::Proceed
                }
            }
            Repr::Sequence(items) => {
                InputResult::sequence(items.iter().map(|h| h.handle(subject, event)))
            }
            Repr::Unless { condition, inner } => {
                if condition(subject) {
                    InputResult::Proceed
                } else {
                    inner.handle(subject, event)
                }
            }
            Repr::Scoped { map, on, hook } => match map.dispatch(subject, event) {
                Some(result) => {
                    if result == *on {
                        hook(subject, event);
                    }
                    result
                }
                None => InputResult::Proceed,
            },
        }
    }

    /// Run `self`, then `next` only if `self` returned [`InputResult::Proceed`].
    ///
    /// Sequencing is associative; nested sequences are flattened.
    pub fn then(self, next: Self) -> Self {
        let mut items = Vec::new();
        for h in [self, next] {
            match &*h.repr {
                Repr::Sequence(inner) => items.extend(inner.iter().cloned()),
                _ => items.push(h),
            }
        }
        Self::from_repr(Repr::Sequence(items))
    }

    /// Restrict this handler to events classified under `required`.
    ///
    /// For other events the guard returns [`InputResult::Proceed`] without running
    /// the inner handler. An existing guard at `required` or below already implies
    /// the new one and is kept as is.
    pub fn guarded(self, required: E::Class) -> Self {
        if let Repr::Guarded { required: r, .. } = &*self.repr
            && hierarchy::is_prefix_of(required, *r)
        {
            return self;
        }
        Self::from_repr(Repr::Guarded {
            required,
            inner: self,
        })
    }

    /// Return [`InputResult::Proceed`] without running this handler whenever
    /// `condition(subject)` holds.
    pub fn unless(self, condition: Arc<dyn Fn(&S) -> bool + Send + Sync>) -> Self {
        Self::from_repr(Repr::Unless {
            condition,
            inner: self,
        })
    }

    /// Lift this handler to a containing subject type through `projection`.
    pub fn map_subject<T, P>(self, projection: Arc<P>) -> HandlerTemplate<T, E>
    where
        P: Fn(&T) -> &S + Send + Sync + ?Sized + 'static,
        S: 'static,
        E: 'static,
    {
        HandlerTemplate::from_fn(move |t: &T, e: &E| self.handle((*projection)(t), e))
    }

    /// Treat a whole compiled map as one handler and call `hook` after it whenever
    /// its aggregate result equals `on`.
    ///
    /// Events with no entry on their path in `map` proceed without calling `hook`.
    pub(crate) fn scoped(
        map: HandlerTemplateMap<S, E>,
        on: InputResult,
        hook: Arc<HookFn<S, E>>,
    ) -> Self {
        Self::from_repr(Repr::Scoped { map, on, hook })
    }
}

impl<S, E: Classified> PartialEq for HandlerTemplate<S, E> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.repr, &other.repr) {
            return true;
        }
        match (&*self.repr, &*other.repr) {
            (
                Repr::Guarded { required, inner },
                Repr::Guarded {
                    required: r2,
                    inner: i2,
                },
            ) => required == r2 && inner == i2,
            (Repr::Sequence(a), Repr::Sequence(b)) => a == b,
            (
                Repr::Unless { condition, inner },
                Repr::Unless {
                    condition: c2,
                    inner: i2,
                },
            ) => Arc::ptr_eq(condition, c2) && inner == i2,
            (
                Repr::Scoped { map, on, hook },
                Repr::Scoped {
                    map: m2,
                    on: o2,
                    hook: h2,
                },
            ) => on == o2 && Arc::ptr_eq(hook, h2) && map == m2,
            _ => false,
        }
    }
}

impl<S, E: Classified> Eq for HandlerTemplate<S, E> {}

impl<S, E: Classified> Hash for HandlerTemplate<S, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &*self.repr {
            Repr::Func(_) => {
                0_u8.hash(state);
                Arc::as_ptr(&self.repr).hash(state);
            }
            Repr::Guarded { required, inner } => {
                1_u8.hash(state);
                required.hash(state);
                inner.hash(state);
            }
            Repr::Sequence(items) => {
                2_u8.hash(state);
                items.hash(state);
            }
            Repr::Unless { condition, inner } => {
                3_u8.hash(state);
                Arc::as_ptr(condition).cast::<()>().hash(state);
                inner.hash(state);
            }
            Repr::Scoped { map, on, hook } => {
                4_u8.hash(state);
                on.hash(state);
                Arc::as_ptr(hook).cast::<()>().hash(state);
                for (k, h) in map.entries() {
                    k.hash(state);
                    h.hash(state);
                }
            }
        }
    }
}

impl<S, E: Classified> core::fmt::Debug for HandlerTemplate<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &*self.repr {
            Repr::Func(_) => f
                .debug_tuple("Func")
                .field(&Arc::as_ptr(&self.repr))
                .finish(),
            Repr::Guarded { required, inner } => f
                .debug_struct("Guarded")
                .field("required", required)
                .field("inner", inner)
                .finish(),
            Repr::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Repr::Unless { inner, .. } => f
                .debug_struct("Unless")
                .field("inner", inner)
                .finish_non_exhaustive(),
            Repr::Scoped { map, on, .. } => f
                .debug_struct("Scoped")
                .field("on", on)
                .field("map", map)
                .finish_non_exhaustive(),
        }
    }
}

/// [`PrefixOps`] for classification-keyed handler templates.
///
/// Promotion wraps a handler in a classification guard; squash is sequencing.
#[derive(Copy, Clone, Debug, Default)]
pub struct HandlerOps;

impl<S, E: Classified> PrefixOps<E::Class, HandlerTemplate<S, E>> for HandlerOps {
    fn is_prefix_of(&self, general: &E::Class, specific: &E::Class) -> bool {
        hierarchy::is_prefix_of(*general, *specific)
    }

    fn common_prefix(&self, a: &E::Class, b: &E::Class) -> Option<E::Class> {
        hierarchy::common_prefix(*a, *b)
    }

    fn promote(
        &self,
        value: HandlerTemplate<S, E>,
        sub: &E::Class,
        sup: &E::Class,
    ) -> HandlerTemplate<S, E> {
        if sub == sup {
            value
        } else {
            value.guarded(*sub)
        }
    }

    fn squash(
        &self,
        first: HandlerTemplate<S, E>,
        second: HandlerTemplate<S, E>,
    ) -> HandlerTemplate<S, E> {
        first.then(second)
    }
}

/// Handler templates for one subject type, keyed by event classification.
///
/// Built once through [`insert_after`](Self::insert_after) and then dispatched
/// through many times; `&mut self` insertion keeps the two phases apart.
pub struct HandlerTemplateMap<S, E: Classified> {
    tree: PrefixTree<E::Class, HandlerTemplate<S, E>, HandlerOps>,
}

impl<S, E: Classified> Clone for HandlerTemplateMap<S, E> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<S, E: Classified> core::fmt::Debug for HandlerTemplateMap<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.tree.entries()).finish()
    }
}

impl<S, E: Classified> Default for HandlerTemplateMap<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E: Classified> PartialEq for HandlerTemplateMap<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.entries().eq(other.entries())
    }
}

impl<S, E: Classified> Eq for HandlerTemplateMap<S, E> {}

impl<S, E: Classified> HandlerTemplateMap<S, E> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            tree: PrefixTree::new(HandlerOps),
        }
    }

    /// Number of stored handler entries.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if no handler is stored.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Add `handler` for events classified under `class`.
    ///
    /// For an event on which both apply, a handler added later runs only after
    /// every earlier applicable handler returned [`InputResult::Proceed`].
    pub fn insert_after(&mut self, class: E::Class, handler: HandlerTemplate<S, E>) {
        self.tree.insert(class, handler);
    }

    /// Handler stored at exactly `class`, if any.
    pub fn get(&self, class: &E::Class) -> Option<&HandlerTemplate<S, E>> {
        self.tree.get(class)
    }

    /// Enumerate `(classification, handler)` entries, ancestors before descendants.
    pub fn entries(&self) -> impl Iterator<Item = (&E::Class, &HandlerTemplate<S, E>)> {
        self.tree.entries()
    }

    /// Call `f` for every entry in [`entries`](Self::entries) order.
    ///
    /// Re-inserting the entries of one map into another with
    /// [`insert_after`](Self::insert_after) in this order preserves the first
    /// map's dispatch behavior.
    pub fn for_each(&self, mut f: impl FnMut(E::Class, &HandlerTemplate<S, E>)) {
        for (k, h) in self.tree.entries() {
            f(*k, h);
        }
    }

    /// Rewrite every handler, keeping classification keys and tree shape.
    pub fn map<T>(
        self,
        f: impl FnMut(HandlerTemplate<S, E>) -> HandlerTemplate<T, E>,
    ) -> HandlerTemplateMap<T, E> {
        HandlerTemplateMap {
            tree: self.tree.map(f, HandlerOps),
        }
    }

    /// Dispatch `event` for `subject` through every handler on the event's path.
    ///
    /// Handlers run most general first and stop at the first handled result.
    /// Returns [`InputResult::Proceed`] when nothing applies.
    pub fn handle(&self, subject: &S, event: &E) -> InputResult {
        self.dispatch(subject, event).unwrap_or(InputResult::Proceed)
    }

    /// Like [`handle`](Self::handle), but `None` when no entry lies on the path.
    pub(crate) fn dispatch(&self, subject: &S, event: &E) -> Option<InputResult> {
        let class = event.classification();
        let mut path = self.tree.path(&class).peekable();
        path.peek()?;
        Some(InputResult::sequence(path.map(|(k, h)| {
            let result = h.handle(subject, event);
            tracing::trace!(class = ?k, ?result, "input map: handler ran");
            result
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    enum Kind {
        Any,
        Key,
        KeyPressed,
        KeyReleased,
        Mouse,
    }

    impl crate::types::Classification for Kind {
        fn parent(&self) -> Option<Self> {
            match self {
                Self::Any => None,
                Self::Key | Self::Mouse => Some(Self::Any),
                Self::KeyPressed | Self::KeyReleased => Some(Self::Key),
            }
        }
    }

    #[derive(Debug)]
    struct Ev(Kind);

    impl Classified for Ev {
        type Class = Kind;
        fn classification(&self) -> Kind {
            self.0
        }
    }

    // Subject carries per-test probe counters.
    #[derive(Default)]
    struct Probe {
        hits: [AtomicUsize; 4],
        order: core::cell::RefCell<alloc::vec::Vec<usize>>,
    }

    fn probe(slot: usize, result: InputResult) -> HandlerTemplate<Probe, Ev> {
        HandlerTemplate::from_fn(move |p: &Probe, _: &Ev| {
            p.hits[slot].fetch_add(1, Ordering::Relaxed);
            p.order.borrow_mut().push(slot);
            result
        })
    }

    fn hits(p: &Probe, slot: usize) -> usize {
        p.hits[slot].load(Ordering::Relaxed)
    }

    #[test]
    fn sequence_returns_second_only_after_proceed() {
        for first in [InputResult::Proceed, InputResult::Consume, InputResult::Ignore] {
            let p = Probe::default();
            let h = probe(0, first).then(probe(1, InputResult::Consume));
            let r = h.handle(&p, &Ev(Kind::Key));
            if first == InputResult::Proceed {
                assert_eq!(r, InputResult::Consume);
                assert_eq!(hits(&p, 1), 1);
            } else {
                assert_eq!(r, first);
                assert_eq!(hits(&p, 1), 0, "second must not run after {first:?}");
            }
        }
    }

    #[test]
    fn sequencing_flattens() {
        let a = probe(0, InputResult::Proceed);
        let b = probe(1, InputResult::Proceed);
        let c = probe(2, InputResult::Proceed);
        let left = a.clone().then(b.clone()).then(c.clone());
        let right = a.then(b.then(c));
        assert_eq!(left, right);
    }

    // Guarded handlers proceed with no side effect outside their classification.
    #[test]
    fn guard_skips_unrelated_classification() {
        let p = Probe::default();
        let h = probe(0, InputResult::Consume).guarded(Kind::KeyPressed);
        assert_eq!(h.handle(&p, &Ev(Kind::KeyReleased)), InputResult::Proceed);
        assert_eq!(h.handle(&p, &Ev(Kind::Key)), InputResult::Proceed);
        assert_eq!(hits(&p, 0), 0);
        assert_eq!(h.handle(&p, &Ev(Kind::KeyPressed)), InputResult::Consume);
        assert_eq!(hits(&p, 0), 1);
    }

    #[test]
    fn promotion_keeps_narrowest_guard() {
        let h = probe(0, InputResult::Consume);
        let once = HandlerOps.promote(h.clone(), &Kind::KeyPressed, &Kind::Key);
        let twice = HandlerOps.promote(once.clone(), &Kind::Key, &Kind::Any);
        assert_eq!(once, twice);
        let same = HandlerOps.promote(h.clone(), &Kind::Key, &Kind::Key);
        assert_eq!(same, h);
    }

    #[test]
    fn clones_are_equal_but_rebuilt_closures_are_not() {
        let a = probe(0, InputResult::Consume);
        let b = probe(0, InputResult::Consume);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn unless_gate_blocks_inner() {
        let p = Probe::default();
        let h = probe(0, InputResult::Consume).unless(Arc::new(|_: &Probe| true));
        assert_eq!(h.handle(&p, &Ev(Kind::Key)), InputResult::Proceed);
        assert_eq!(hits(&p, 0), 0);
    }

    #[test]
    fn map_runs_ancestor_then_descendant() {
        let p = Probe::default();
        let mut map = HandlerTemplateMap::new();
        map.insert_after(Kind::Key, probe(0, InputResult::Proceed));
        map.insert_after(Kind::KeyPressed, probe(1, InputResult::Consume));
        assert_eq!(map.handle(&p, &Ev(Kind::KeyPressed)), InputResult::Consume);
        assert_eq!(*p.order.borrow(), vec![0, 1]);

        // A sibling of the descendant only reaches the ancestor.
        p.order.borrow_mut().clear();
        assert_eq!(map.handle(&p, &Ev(Kind::KeyReleased)), InputResult::Proceed);
        assert_eq!(*p.order.borrow(), vec![0]);

        // Unrelated classifications reach nothing.
        p.order.borrow_mut().clear();
        assert_eq!(map.handle(&p, &Ev(Kind::Mouse)), InputResult::Proceed);
        assert!(p.order.borrow().is_empty());
    }

    // Narrow then broad: the narrow handler is promoted and still runs first, and
    // stays silent for events outside its own classification.
    #[test]
    fn later_broad_handler_runs_after_earlier_narrow_one() {
        let p = Probe::default();
        let mut map = HandlerTemplateMap::new();
        map.insert_after(Kind::KeyPressed, probe(0, InputResult::Proceed));
        map.insert_after(Kind::Key, probe(1, InputResult::Proceed));
        assert_eq!(map.len(), 1);
        map.handle(&p, &Ev(Kind::KeyPressed));
        assert_eq!(*p.order.borrow(), vec![0, 1]);

        p.order.borrow_mut().clear();
        map.handle(&p, &Ev(Kind::KeyReleased));
        assert_eq!(*p.order.borrow(), vec![1]);
        assert_eq!(hits(&p, 0), 1);
    }

    #[test]
    fn same_classification_runs_in_insertion_order() {
        let p = Probe::default();
        let mut map = HandlerTemplateMap::new();
        map.insert_after(Kind::Key, probe(0, InputResult::Proceed));
        map.insert_after(Kind::Key, probe(1, InputResult::Proceed));
        map.insert_after(Kind::Key, probe(2, InputResult::Ignore));
        map.insert_after(Kind::Key, probe(3, InputResult::Consume));
        assert_eq!(map.handle(&p, &Ev(Kind::KeyPressed)), InputResult::Ignore);
        assert_eq!(*p.order.borrow(), vec![0, 1, 2]);
        assert_eq!(hits(&p, 3), 0);
    }

    #[test]
    fn get_finds_exact_classification_only() {
        let mut map = HandlerTemplateMap::new();
        let key = probe(0, InputResult::Proceed);
        let pressed = probe(1, InputResult::Consume);
        map.insert_after(Kind::Key, key.clone());
        map.insert_after(Kind::KeyPressed, pressed.clone());
        assert_eq!(map.get(&Kind::Key), Some(&key));
        assert_eq!(map.get(&Kind::KeyPressed), Some(&pressed));
        assert_eq!(map.get(&Kind::KeyReleased), None);
        assert_eq!(map.get(&Kind::Any), None);

        // A second handler at the same class is folded into the stored one.
        let again = probe(2, InputResult::Consume);
        map.insert_after(Kind::KeyPressed, again.clone());
        assert_eq!(map.get(&Kind::KeyPressed), Some(&pressed.then(again)));
        assert_eq!(map.len(), 2);
    }

    // `Level(n)` sits below `Level(n - 1)`, with no limit on depth.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Level(u32);

    impl crate::types::Classification for Level {
        fn parent(&self) -> Option<Self> {
            self.0.checked_sub(1).map(Level)
        }
    }

    struct LevelEv(Level);

    impl Classified for LevelEv {
        type Class = Level;
        fn classification(&self) -> Level {
            self.0
        }
    }

    fn level_probe(slot: usize, result: InputResult) -> HandlerTemplate<Probe, LevelEv> {
        HandlerTemplate::from_fn(move |p: &Probe, _: &LevelEv| {
            p.order.borrow_mut().push(slot);
            result
        })
    }

    #[test]
    fn deep_hierarchies_dispatch_normally() {
        let p = Probe::default();
        let mut map = HandlerTemplateMap::new();
        map.insert_after(Level(90), level_probe(1, InputResult::Proceed));
        map.insert_after(Level(0), level_probe(0, InputResult::Consume));

        assert_eq!(map.handle(&p, &LevelEv(Level(70))), InputResult::Consume);
        assert_eq!(*p.order.borrow(), vec![0]);

        p.order.borrow_mut().clear();
        assert_eq!(map.handle(&p, &LevelEv(Level(120))), InputResult::Consume);
        assert_eq!(*p.order.borrow(), vec![1, 0]);
    }

    #[test]
    fn for_each_copy_preserves_behavior() {
        let mut src = HandlerTemplateMap::new();
        src.insert_after(Kind::Key, probe(0, InputResult::Proceed));
        src.insert_after(Kind::KeyPressed, probe(1, InputResult::Consume));
        src.insert_after(Kind::Mouse, probe(2, InputResult::Ignore));

        let mut dst = HandlerTemplateMap::new();
        src.for_each(|k, h| dst.insert_after(k, h.clone()));
        assert_eq!(src, dst);

        let p = Probe::default();
        assert_eq!(dst.handle(&p, &Ev(Kind::KeyPressed)), InputResult::Consume);
        assert_eq!(dst.handle(&p, &Ev(Kind::Mouse)), InputResult::Ignore);
    }

    #[test]
    fn map_lifts_subject() {
        struct Outer {
            inner: Probe,
        }
        fn inner_of(o: &Outer) -> &Probe {
            &o.inner
        }
        let mut map: HandlerTemplateMap<Probe, Ev> = HandlerTemplateMap::new();
        map.insert_after(Kind::Key, probe(0, InputResult::Consume));
        let lifted: HandlerTemplateMap<Outer, Ev> = map.map(|h| h.map_subject(Arc::new(inner_of)));
        let outer = Outer {
            inner: Probe::default(),
        };
        assert_eq!(
            lifted.handle(&outer, &Ev(Kind::KeyPressed)),
            InputResult::Consume
        );
        assert_eq!(hits(&outer.inner, 0), 1);
    }

    #[test]
    fn scoped_hook_sees_aggregate_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut inner = HandlerTemplateMap::new();
        inner.insert_after(Kind::Key, probe(0, InputResult::Proceed));
        inner.insert_after(Kind::KeyPressed, probe(1, InputResult::Proceed));
        let h = HandlerTemplate::scoped(
            inner,
            InputResult::Proceed,
            Arc::new(|_: &Probe, _: &Ev| {
                CALLS.fetch_add(1, Ordering::Relaxed);
            }),
        );
        let p = Probe::default();
        assert_eq!(h.handle(&p, &Ev(Kind::KeyPressed)), InputResult::Proceed);
        assert_eq!(CALLS.load(Ordering::Relaxed), 1);
        // No entry on the path: the hook stays quiet.
        assert_eq!(h.handle(&p, &Ev(Kind::Mouse)), InputResult::Proceed);
        assert_eq!(CALLS.load(Ordering::Relaxed), 1);
    }
}
