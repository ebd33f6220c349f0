// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bound input maps: a template paired with the subject it acts on.

use crate::handler::HandlerTemplateMap;
use crate::template::InputMapTemplate;
use crate::types::{Classified, InputResult};

/// An [`InputMapTemplate`] bound to a concrete subject.
///
/// The template is compiled once on construction; the compiled map is immutable
/// afterwards, so a bound map can be dispatched through from several places.
///
/// Two bound maps are equal when both their templates and their subjects are.
pub struct BoundInputMap<S, E: Classified> {
    template: InputMapTemplate<S, E>,
    subject: S,
    map: HandlerTemplateMap<S, E>,
}

impl<S, E: Classified> BoundInputMap<S, E> {
    /// Bind `template` to `subject`. See also [`InputMapTemplate::bind`].
    pub fn new(template: InputMapTemplate<S, E>, subject: S) -> Self {
        let map = template.handler_template_map();
        Self {
            template,
            subject,
            map,
        }
    }

    /// The template this map was bound from.
    pub fn template(&self) -> &InputMapTemplate<S, E> {
        &self.template
    }

    /// The subject handlers run against.
    pub fn subject(&self) -> &S {
        &self.subject
    }

    /// The compiled handler map.
    pub fn handler_template_map(&self) -> &HandlerTemplateMap<S, E> {
        &self.map
    }

    /// Dispatch `event` to the subject.
    pub fn handle(&self, event: &E) -> InputResult {
        let result = self.map.handle(&self.subject, event);
        tracing::trace!(class = ?event.classification(), ?result, "input map: bound dispatch");
        result
    }

    /// Enumerate `(classification, handler)` pairs with the subject already applied.
    ///
    /// An external delivery mechanism registers each handler for events of its
    /// classification. Entries come ancestors first.
    pub fn for_each_event_type(&self, mut f: impl FnMut(E::Class, &dyn Fn(&E) -> InputResult)) {
        let subject = &self.subject;
        self.map
            .for_each(|class, handler| f(class, &|event: &E| handler.handle(subject, event)));
    }
}

impl<S: Clone, E: Classified> Clone for BoundInputMap<S, E> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            subject: self.subject.clone(),
            map: self.map.clone(),
        }
    }
}

impl<S: PartialEq, E: Classified> PartialEq for BoundInputMap<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template && self.subject == other.subject
    }
}

impl<S: Eq, E: Classified> Eq for BoundInputMap<S, E> {}

impl<S: core::fmt::Debug, E: Classified> core::fmt::Debug for BoundInputMap<S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoundInputMap")
            .field("template", &self.template)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::event_type;
    use crate::template::{consume, ignore, sequence};
    use crate::types::Classification;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    enum Kind {
        Key,
        KeyPressed,
        KeyReleased,
    }

    impl Classification for Kind {
        fn parent(&self) -> Option<Self> {
            match self {
                Self::Key => None,
                Self::KeyPressed | Self::KeyReleased => Some(Self::Key),
            }
        }
    }

    #[derive(Copy, Clone, Debug, PartialEq)]
    struct Ev(Kind);

    impl Classified for Ev {
        type Class = Kind;
        fn classification(&self) -> Kind {
            self.0
        }
    }

    type Tmpl = InputMapTemplate<u8, Ev>;

    #[test]
    fn bound_map_dispatches_against_its_subject() {
        let t: Tmpl = sequence([
            ignore(event_type(Kind::KeyReleased)),
            consume(event_type(Kind::KeyPressed), |n: &u8, _: Ev| {
                assert_eq!(*n, 7);
            }),
        ]);
        let bound = t.bind(7);
        assert_eq!(*bound.subject(), 7);
        assert_eq!(bound.handle(&Ev(Kind::KeyPressed)), InputResult::Consume);
        assert_eq!(bound.handle(&Ev(Kind::KeyReleased)), InputResult::Ignore);
        assert_eq!(bound.handle(&Ev(Kind::Key)), InputResult::Proceed);
    }

    #[test]
    fn equality_is_over_template_and_subject() {
        let t: Tmpl = ignore(event_type(Kind::Key));
        let other: Tmpl = ignore(event_type(Kind::Key));
        assert_eq!(t.bind(1), t.bind(1));
        assert_ne!(t.bind(1), t.bind(2));
        assert_ne!(t.bind(1), other.bind(1));
        assert_eq!(t.bind(3), BoundInputMap::new(t.clone(), 3));
    }

    #[test]
    fn for_each_event_type_applies_subject() {
        let t: Tmpl = sequence([
            ignore(event_type(Kind::KeyReleased)),
            consume(event_type(Kind::KeyPressed), |_: &u8, _: Ev| {}),
        ]);
        let bound = t.bind(0);
        let seen = RefCell::new(Vec::new());
        bound.for_each_event_type(|class, handler| {
            seen.borrow_mut().push((class, handler(&Ev(class))));
        });
        assert_eq!(
            seen.into_inner(),
            alloc::vec![
                (Kind::KeyReleased, InputResult::Ignore),
                (Kind::KeyPressed, InputResult::Consume),
            ]
        );
    }
}
