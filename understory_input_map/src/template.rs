// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input map templates: the combinator algebra applications build input maps with.
//!
//! ## Overview
//!
//! An [`InputMapTemplate<S, E>`] is an immutable tree of combinators describing how
//! events `E` are handled for any subject of type `S`. Build it once, then compile
//! it with [`handler_template_map`](InputMapTemplate::handler_template_map) or bind
//! it to a subject with [`bind`](InputMapTemplate::bind).
//!
//! ## Leaves
//!
//! A leaf pairs an [`EventPattern`] with an action:
//! [`process`] (the action returns an [`InputResult`]), [`consume`],
//! [`consume_when`], [`consume_unless`], and [`ignore`].
//! A leaf is registered under every classification its pattern names. For an
//! event that reaches it, the leaf runs the action if the pattern matches and
//! proceeds otherwise.
//!
//! ## Composition
//!
//! - [`sequence`], [`InputMapTemplate::or`], and [`chain`] all run their parts left
//!   to right, each only if everything before it proceeded. They differ only in
//!   how the tree is grouped.
//! - [`when`] and [`unless`] gate every handler of a template on a subject predicate.
//! - [`if_consumed`](InputMapTemplate::if_consumed),
//!   [`if_ignored`](InputMapTemplate::if_ignored), and
//!   [`if_processed`](InputMapTemplate::if_processed) observe the aggregate result
//!   of a whole template and run a side effect once when it matches.
//! - [`map_subject`](InputMapTemplate::map_subject) adapts a template written for a
//!   component to the subject type that contains it.
//!
//! ## Example
//!
//! ```
//! use understory_input_map::pattern::pattern_fn;
//! use understory_input_map::template::{InputMapTemplate, consume, ignore, sequence};
//! use understory_input_map::types::{Classification, Classified, InputResult};
//! use core::cell::Cell;
//!
//! #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
//! enum Kind { Key, KeyPressed }
//! impl Classification for Kind {
//!     fn parent(&self) -> Option<Self> {
//!         match self { Kind::Key => None, Kind::KeyPressed => Some(Kind::Key) }
//!     }
//! }
//! struct Press(char);
//! impl Classified for Press {
//!     type Class = Kind;
//!     fn classification(&self) -> Kind { Kind::KeyPressed }
//! }
//!
//! struct Counter(Cell<u32>);
//!
//! let tmpl: InputMapTemplate<Counter, Press> = sequence([
//!     ignore(pattern_fn([Kind::KeyPressed], |e: &Press| (e.0 == 'q').then_some(()))),
//!     consume(
//!         pattern_fn([Kind::KeyPressed], |e: &Press| (e.0 == '+').then_some(())),
//!         |c: &Counter, (): ()| c.0.set(c.0.get() + 1),
//!     ),
//! ]);
//!
//! let counter = Counter(Cell::new(0));
//! let map = tmpl.handler_template_map();
//! assert_eq!(map.handle(&counter, &Press('+')), InputResult::Consume);
//! assert_eq!(map.handle(&counter, &Press('q')), InputResult::Ignore);
//! assert_eq!(map.handle(&counter, &Press('x')), InputResult::Proceed);
//! assert_eq!(counter.0.get(), 1);
//! ```

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use crate::bound::BoundInputMap;
use crate::handler::{HandlerTemplate, HandlerTemplateMap};
use crate::hierarchy;
use crate::pattern::{EventPattern, minimal_classes};
use crate::types::{Classified, InputResult};

type ConditionFn<S> = dyn Fn(&S) -> bool + Send + Sync;
type HookFn<S, E> = dyn Fn(&S, &E) + Send + Sync;

/// An immutable input map combinator tree for subjects `S` and events `E`.
///
/// Cloning is cheap. Equality is structural; closures compare by identity, so a
/// template equals its clones and any tree built from the same parts.
pub struct InputMapTemplate<S, E: Classified> {
    node: Arc<Node<S, E>>,
}

enum Node<S, E: Classified> {
    Leaf {
        classes: Vec<E::Class>,
        handler: HandlerTemplate<S, E>,
    },
    Sequence(Vec<InputMapTemplate<S, E>>),
    Or(InputMapTemplate<S, E>, InputMapTemplate<S, E>),
    Chain(Vec<InputMapTemplate<S, E>>),
    Gate {
        gate: GateKind,
        condition: Arc<ConditionFn<S>>,
        skip_if: Arc<ConditionFn<S>>,
        inner: InputMapTemplate<S, E>,
    },
    Hook {
        on: InputResult,
        hook: Arc<HookFn<S, E>>,
        inner: InputMapTemplate<S, E>,
    },
    Mapped(Arc<dyn Compile<S, E> + Send + Sync>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
enum GateKind {
    When,
    Unless,
}

trait Compile<S, E: Classified> {
    fn compile(&self) -> HandlerTemplateMap<S, E>;
}

struct SubjectMapped<U, E: Classified, P: ?Sized> {
    inner: InputMapTemplate<U, E>,
    projection: Arc<P>,
}

impl<S, U, E, P> Compile<S, E> for SubjectMapped<U, E, P>
where
    U: 'static,
    E: Classified + 'static,
    P: Fn(&S) -> &U + Send + Sync + ?Sized + 'static,
{
    fn compile(&self) -> HandlerTemplateMap<S, E> {
        self.inner
            .handler_template_map()
            .map(|h| h.map_subject(Arc::clone(&self.projection)))
    }
}

impl<S, E: Classified> Clone for InputMapTemplate<S, E> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<S, E: Classified> InputMapTemplate<S, E> {
    fn from_node(node: Node<S, E>) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Compile this template into a classification-keyed handler map.
    ///
    /// Each call builds a fresh map; callers that dispatch often should keep the
    /// result (as [`BoundInputMap`] does).
    pub fn handler_template_map(&self) -> HandlerTemplateMap<S, E> {
        match &*self.node {
            Node::Leaf { classes, handler } => {
                let mut map = HandlerTemplateMap::new();
                for class in classes {
                    map.insert_after(*class, handler.clone());
                }
                map
            }
            Node::Sequence(parts) | Node::Chain(parts) => flatten(parts.iter()),
            Node::Or(first, second) => flatten([first, second]),
            Node::Gate { skip_if, inner, .. } => inner
                .handler_template_map()
                .map(|h| h.unless(Arc::clone(skip_if))),
            Node::Hook { on, hook, inner } => {
                let inner = inner.handler_template_map();
                let mut map = HandlerTemplateMap::new();
                for anchor in anchors(&inner) {
                    map.insert_after(
                        anchor,
                        HandlerTemplate::scoped(inner.clone(), *on, Arc::clone(hook)),
                    );
                }
                map
            }
            Node::Mapped(compile) => compile.compile(),
        }
    }

    /// Pair this template with `subject`, ready for dispatch.
    pub fn bind(&self, subject: S) -> BoundInputMap<S, E> {
        BoundInputMap::new(self.clone(), subject)
    }
}

impl<S: 'static, E: Classified + 'static> InputMapTemplate<S, E> {
    /// Run `self`, then `other` only if `self` proceeded.
    pub fn or(self, other: Self) -> Self {
        Self::from_node(Node::Or(self, other))
    }

    /// After this template handles an event with [`InputResult::Consume`], call
    /// `hook`. The result is returned unchanged.
    pub fn if_consumed(self, hook: impl Fn(&S, &E) + Send + Sync + 'static) -> Self {
        self.with_hook(InputResult::Consume, hook)
    }

    /// After this template handles an event with [`InputResult::Ignore`], call
    /// `hook`. The result is returned unchanged.
    pub fn if_ignored(self, hook: impl Fn(&S, &E) + Send + Sync + 'static) -> Self {
        self.with_hook(InputResult::Ignore, hook)
    }

    /// After every handler of this template that applies to an event proceeded,
    /// call `hook`. Events none of its classifications cover do not trigger it.
    pub fn if_processed(self, hook: impl Fn(&S, &E) + Send + Sync + 'static) -> Self {
        self.with_hook(InputResult::Proceed, hook)
    }

    fn with_hook(self, on: InputResult, hook: impl Fn(&S, &E) + Send + Sync + 'static) -> Self {
        Self::from_node(Node::Hook {
            on,
            hook: Arc::new(hook),
            inner: self,
        })
    }

    /// Adapt this template to subjects of type `T` that contain an `S`.
    pub fn map_subject<T>(
        self,
        projection: impl Fn(&T) -> &S + Send + Sync + 'static,
    ) -> InputMapTemplate<T, E> {
        InputMapTemplate::from_node(Node::Mapped(Arc::new(SubjectMapped {
            inner: self,
            projection: Arc::new(projection),
        })))
    }
}

// Flatten parts into one map by re-inserting each entry in order.
fn flatten<'a, S: 'a, E: Classified + 'a>(
    parts: impl IntoIterator<Item = &'a InputMapTemplate<S, E>>,
) -> HandlerTemplateMap<S, E> {
    let mut map = HandlerTemplateMap::new();
    for part in parts {
        part.handler_template_map()
            .for_each(|class, h| map.insert_after(class, h.clone()));
    }
    map
}

// Most specific classifications covering every entry of `map`, one per root.
fn anchors<S, E: Classified>(map: &HandlerTemplateMap<S, E>) -> Vec<E::Class> {
    let mut out: Vec<E::Class> = Vec::new();
    for (class, _) in map.entries() {
        let merged = out
            .iter_mut()
            .find_map(|a| hierarchy::common_prefix(*a, *class).map(|p| (a, p)));
        match merged {
            Some((a, p)) => *a = p,
            None => out.push(*class),
        }
    }
    out
}

/// A leaf that runs `action` on a match and returns its result.
pub fn process<S, E, P, F>(pattern: P, action: F) -> InputMapTemplate<S, E>
where
    S: 'static,
    E: Classified + 'static,
    P: EventPattern<E> + Send + Sync + 'static,
    F: Fn(&S, P::Matched) -> InputResult + Send + Sync + 'static,
{
    let classes = minimal_classes::<E>(pattern.classifications());
    let handler = HandlerTemplate::from_fn(move |s: &S, e: &E| match pattern.match_event(e) {
        Some(m) => action(s, m),
        None => InputResult::Proceed,
    });
    InputMapTemplate::from_node(Node::Leaf { classes, handler })
}

/// A leaf that runs `action` on a match and consumes the event.
pub fn consume<S, E, P, F>(pattern: P, action: F) -> InputMapTemplate<S, E>
where
    S: 'static,
    E: Classified + 'static,
    P: EventPattern<E> + Send + Sync + 'static,
    F: Fn(&S, P::Matched) + Send + Sync + 'static,
{
    process(pattern, move |s: &S, m: P::Matched| {
        action(s, m);
        InputResult::Consume
    })
}

/// Like [`consume`], but only while `condition(subject)` holds; otherwise proceeds.
pub fn consume_when<S, E, P, C, F>(pattern: P, condition: C, action: F) -> InputMapTemplate<S, E>
where
    S: 'static,
    E: Classified + 'static,
    P: EventPattern<E> + Send + Sync + 'static,
    C: Fn(&S) -> bool + Send + Sync + 'static,
    F: Fn(&S, P::Matched) + Send + Sync + 'static,
{
    process(pattern, move |s: &S, m: P::Matched| {
        if condition(s) {
            action(s, m);
            InputResult::Consume
        } else {
            InputResult::Proceed
        }
    })
}

/// Like [`consume`], but proceeds while `condition(subject)` holds.
pub fn consume_unless<S, E, P, C, F>(
    pattern: P,
    condition: C,
    action: F,
) -> InputMapTemplate<S, E>
where
    S: 'static,
    E: Classified + 'static,
    P: EventPattern<E> + Send + Sync + 'static,
    C: Fn(&S) -> bool + Send + Sync + 'static,
    F: Fn(&S, P::Matched) + Send + Sync + 'static,
{
    consume_when(pattern, move |s: &S| !condition(s), action)
}

/// A leaf that ignores matching events: handled, but not consumed.
pub fn ignore<S, E, P>(pattern: P) -> InputMapTemplate<S, E>
where
    S: 'static,
    E: Classified + 'static,
    P: EventPattern<E> + Send + Sync + 'static,
{
    process(pattern, |_: &S, _: P::Matched| InputResult::Ignore)
}

/// Run templates left to right, each only if all before it proceeded.
pub fn sequence<S, E: Classified>(
    templates: impl IntoIterator<Item = InputMapTemplate<S, E>>,
) -> InputMapTemplate<S, E> {
    InputMapTemplate::from_node(Node::Sequence(templates.into_iter().collect()))
}

/// Concatenate independently authored templates, earlier ones taking precedence.
///
/// Behaves exactly like [`sequence`]; use it to layer whole maps (a base map and
/// an override map, say) rather than individual bindings.
pub fn chain<S, E: Classified>(
    templates: impl IntoIterator<Item = InputMapTemplate<S, E>>,
) -> InputMapTemplate<S, E> {
    InputMapTemplate::from_node(Node::Chain(templates.into_iter().collect()))
}

/// Gate every handler of `template` on `condition(subject)` holding.
pub fn when<S: 'static, E: Classified>(
    condition: impl Fn(&S) -> bool + Send + Sync + 'static,
    template: InputMapTemplate<S, E>,
) -> InputMapTemplate<S, E> {
    let condition: Arc<ConditionFn<S>> = Arc::new(condition);
    let negated = Arc::clone(&condition);
    InputMapTemplate::from_node(Node::Gate {
        gate: GateKind::When,
        condition,
        skip_if: Arc::new(move |s: &S| !negated(s)),
        inner: template,
    })
}

/// Skip every handler of `template` (proceeding instead) while `condition(subject)` holds.
pub fn unless<S: 'static, E: Classified>(
    condition: impl Fn(&S) -> bool + Send + Sync + 'static,
    template: InputMapTemplate<S, E>,
) -> InputMapTemplate<S, E> {
    let condition: Arc<ConditionFn<S>> = Arc::new(condition);
    InputMapTemplate::from_node(Node::Gate {
        gate: GateKind::Unless,
        skip_if: Arc::clone(&condition),
        condition,
        inner: template,
    })
}

impl<S, E: Classified> PartialEq for InputMapTemplate<S, E> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        match (&*self.node, &*other.node) {
            (
                Node::Leaf { classes, handler },
                Node::Leaf {
                    classes: c2,
                    handler: h2,
                },
            ) => classes == c2 && handler == h2,
            (Node::Sequence(a), Node::Sequence(b)) | (Node::Chain(a), Node::Chain(b)) => a == b,
            (Node::Or(a1, b1), Node::Or(a2, b2)) => a1 == a2 && b1 == b2,
            (
                Node::Gate {
                    gate,
                    condition,
                    inner,
                    ..
                },
                Node::Gate {
                    gate: g2,
                    condition: c2,
                    inner: i2,
                    ..
                },
            ) => gate == g2 && Arc::ptr_eq(condition, c2) && inner == i2,
            (
                Node::Hook { on, hook, inner },
                Node::Hook {
                    on: o2,
                    hook: h2,
                    inner: i2,
                },
            ) => on == o2 && Arc::ptr_eq(hook, h2) && inner == i2,
            (Node::Mapped(a), Node::Mapped(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<S, E: Classified> Eq for InputMapTemplate<S, E> {}

impl<S, E: Classified> Hash for InputMapTemplate<S, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &*self.node {
            Node::Leaf { classes, handler } => {
                0_u8.hash(state);
                classes.hash(state);
                handler.hash(state);
            }
            Node::Sequence(parts) => {
                1_u8.hash(state);
                parts.hash(state);
            }
            Node::Or(a, b) => {
                2_u8.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Node::Chain(parts) => {
                3_u8.hash(state);
                parts.hash(state);
            }
            Node::Gate {
                gate,
                condition,
                inner,
                ..
            } => {
                4_u8.hash(state);
                gate.hash(state);
                Arc::as_ptr(condition).cast::<()>().hash(state);
                inner.hash(state);
            }
            Node::Hook { on, hook, inner } => {
                5_u8.hash(state);
                on.hash(state);
                Arc::as_ptr(hook).cast::<()>().hash(state);
                inner.hash(state);
            }
            Node::Mapped(m) => {
                6_u8.hash(state);
                Arc::as_ptr(m).cast::<()>().hash(state);
            }
        }
    }
}

impl<S, E: Classified> core::fmt::Debug for InputMapTemplate<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &*self.node {
            Node::Leaf { classes, .. } => f
                .debug_struct("Leaf")
                .field("classes", classes)
                .finish_non_exhaustive(),
            Node::Sequence(parts) => f.debug_tuple("Sequence").field(parts).finish(),
            Node::Or(a, b) => f.debug_tuple("Or").field(a).field(b).finish(),
            Node::Chain(parts) => f.debug_tuple("Chain").field(parts).finish(),
            Node::Gate { gate, inner, .. } => f
                .debug_struct("Gate")
                .field("gate", gate)
                .field("inner", inner)
                .finish_non_exhaustive(),
            Node::Hook { on, inner, .. } => f
                .debug_struct("Hook")
                .field("on", on)
                .field("inner", inner)
                .finish_non_exhaustive(),
            Node::Mapped(_) => f.write_str("Mapped(..)"),
        }
    }
}
