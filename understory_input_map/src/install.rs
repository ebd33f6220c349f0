// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal per-subject dispatch surface with override and fallback layers.
//!
//! ## Overview
//!
//! An [`InputMapSlot`] owns a subject and an ordered list of bound input maps.
//! Dispatch consults the layers front to back and stops at the first handled
//! result. Where a template lands is chosen with [`InstallPolicy`]:
//!
//! - [`Override`](InstallPolicy::Override) places it in front of every layer
//!   already installed, so it sees events first.
//! - [`Fallback`](InstallPolicy::Fallback) places it behind every layer already
//!   installed, so it only sees events all of them proceeded on.
//!
//! Toolkits with their own event delivery use
//! [`BoundInputMap::for_each_event_type`] instead; the slot models the same
//! priority rule for tests and simple embeddings.

use alloc::vec::Vec;

use crate::bound::BoundInputMap;
use crate::template::InputMapTemplate;
use crate::types::{Classified, InputResult};

/// Where [`InputMapSlot::install`] places a template relative to existing layers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InstallPolicy {
    /// Consulted before all existing layers.
    Override,
    /// Consulted only after all existing layers proceeded.
    Fallback,
}

/// A subject together with the input maps installed on it.
pub struct InputMapSlot<S, E: Classified> {
    subject: S,
    layers: Vec<BoundInputMap<S, E>>,
}

impl<S, E: Classified> InputMapSlot<S, E> {
    /// Create a slot for `subject` with nothing installed.
    pub fn new(subject: S) -> Self {
        Self {
            subject,
            layers: Vec::new(),
        }
    }

    /// The subject installed templates act on.
    pub fn subject(&self) -> &S {
        &self.subject
    }

    /// Number of installed layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Installed layers in dispatch order.
    pub fn layers(&self) -> &[BoundInputMap<S, E>] {
        &self.layers
    }

    /// Remove every layer bound from a template equal to `template`.
    ///
    /// Returns true if anything was removed.
    pub fn uninstall(&mut self, template: &InputMapTemplate<S, E>) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.template() != template);
        let removed = before - self.layers.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.layers.len(), "input map: uninstalled");
        }
        removed > 0
    }

    /// Dispatch `event` through every layer in order.
    pub fn dispatch(&self, event: &E) -> InputResult {
        InputResult::sequence(self.layers.iter().map(|layer| layer.handle(event)))
    }
}

impl<S: Clone, E: Classified> InputMapSlot<S, E> {
    /// Bind `template` to this slot's subject and install it according to `policy`.
    pub fn install(&mut self, template: &InputMapTemplate<S, E>, policy: InstallPolicy) {
        let bound = template.bind(self.subject.clone());
        match policy {
            InstallPolicy::Override => self.layers.insert(0, bound),
            InstallPolicy::Fallback => self.layers.push(bound),
        }
        tracing::debug!(?policy, layers = self.layers.len(), "input map: installed");
    }

    /// Shorthand for [`install`](Self::install) with [`InstallPolicy::Override`].
    pub fn install_override(&mut self, template: &InputMapTemplate<S, E>) {
        self.install(template, InstallPolicy::Override);
    }

    /// Shorthand for [`install`](Self::install) with [`InstallPolicy::Fallback`].
    pub fn install_fallback(&mut self, template: &InputMapTemplate<S, E>) {
        self.install(template, InstallPolicy::Fallback);
    }
}

impl<S: core::fmt::Debug, E: Classified> core::fmt::Debug for InputMapSlot<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InputMapSlot")
            .field("subject", &self.subject)
            .field("layers", &self.layers.len())
            .finish()
    }
}
