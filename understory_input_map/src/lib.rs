// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Input Map: a deterministic, `no_std` engine for priority-ordered event handling.
//!
//! ## Overview
//!
//! Applications describe how a subject reacts to input with an
//! [`InputMapTemplate`](crate::template::InputMapTemplate): a tree of combinators
//! over event patterns. Templates compile into a
//! [`HandlerTemplateMap`](crate::handler::HandlerTemplateMap), a
//! [prefix tree](crate::tree::PrefixTree) of handlers keyed by event classification.
//! Dispatching an event walks that tree from the most general classification
//! down to the event's own and stops at the first handler that does not
//! [`Proceed`](crate::types::InputResult::Proceed).
//!
//! This crate does not define events. An embedding toolkit describes its events
//! through two traits:
//! [`Classification`](crate::types::Classification) for the single-inheritance
//! hierarchy of event kinds, and [`Classified`](crate::types::Classified) for events
//! that know their kind. Gesture matching plugs in through
//! [`EventPattern`](crate::pattern::EventPattern).
//!
//! ## Ordering
//!
//! For any event, handlers run in the order their templates were sequenced,
//! regardless of how general their classifications are. A handler registered for
//! "key pressed" and sequenced before one for "any key" runs first for a key press
//! and never runs for a key release.
//!
//! Sequencing follows one rule: `Proceed` hands the event to the next handler;
//! `Consume` and `Ignore` stop the walk and are returned as the result.
//!
//! ## Workflow
//!
//! 1) Build a template from leaves such as [`consume`](crate::template::consume)
//!    and combinators such as [`sequence`](crate::template::sequence) and
//!    [`unless`](crate::template::unless).
//! 2) Bind it to a subject with
//!    [`bind`](crate::template::InputMapTemplate::bind), or install it on an
//!    [`InputMapSlot`](crate::install::InputMapSlot) as an override or a fallback.
//! 3) Feed events to [`BoundInputMap::handle`](crate::bound::BoundInputMap::handle) or
//!    [`InputMapSlot::dispatch`](crate::install::InputMapSlot::dispatch), or hand the
//!    pairs from [`for_each_event_type`](crate::bound::BoundInputMap::for_each_event_type)
//!    to your own delivery mechanism. Mark the event consumed when the result
//!    [`is_consumed`](crate::types::InputResult::is_consumed).
//!
//! Compiled maps and bound maps are immutable and can be shared across threads when
//! the subject allows it.
//!
//! ## Diagnostics
//!
//! Structural changes (prefix tree branching, promotion into a broader key, install
//! and uninstall) are reported with `tracing` at debug level; each dispatch step at
//! trace level. Install a subscriber in your application to see them.
//!
//! This crate is `no_std` and uses `alloc`. Enable the `std` feature to forward
//! `std` to its dependencies.

#![no_std]

extern crate alloc;

pub mod bound;
pub mod handler;
pub mod hierarchy;
pub mod install;
pub mod ops;
pub mod pattern;
pub mod template;
pub mod tree;
pub mod types;
