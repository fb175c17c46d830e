//! Resolution capabilities used by the validators.
//!
//! Validators never reach into a [`Model`] directly. They take a resolver,
//! so an editing layer can back resolution with whatever index it keeps.

use std::marker::PhantomData;

use super::element::Element;
use super::graph::Model;
use super::views::ActionView;
use crate::base::ElementId;

/// Resolves element ids to elements.
pub trait ElementResolver {
    fn resolve(&self, id: ElementId) -> Option<&Element>;

    /// Usages whose definition is `definition`. Resolvers that keep no
    /// inverse index report none.
    fn usage_references(&self, _definition: ElementId) -> Vec<ElementId> {
        Vec::new()
    }
}

impl ElementResolver for Model {
    fn resolve(&self, id: ElementId) -> Option<&Element> {
        self.get(id)
    }

    fn usage_references(&self, definition: ElementId) -> Vec<ElementId> {
        Model::usage_references(self, definition)
    }
}

/// An [`ElementResolver`] backed by a closure.
///
/// ```ignore
/// let lookup: FxHashMap<ElementId, Element> = ...;
/// let resolver = FnResolver::new(|id| lookup.get(&id));
/// ```
pub struct FnResolver<'m, F> {
    f: F,
    _marker: PhantomData<&'m Element>,
}

impl<'m, F> FnResolver<'m, F>
where
    F: Fn(ElementId) -> Option<&'m Element>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<'m, F> ElementResolver for FnResolver<'m, F>
where
    F: Fn(ElementId) -> Option<&'m Element>,
{
    fn resolve(&self, id: ElementId) -> Option<&Element> {
        (self.f)(id)
    }
}

/// Resolves the ids an action hierarchy refers to.
pub trait ActionResolver {
    /// An element carrying an action payload.
    fn resolve_action(&self, id: ElementId) -> Option<ActionView<'_>>;

    /// A parameter: any feature or usage element.
    fn resolve_parameter(&self, id: ElementId) -> Option<&Element>;

    /// Any element, e.g. a pre- or postcondition constraint.
    fn resolve_element(&self, id: ElementId) -> Option<&Element>;
}

impl<R: ElementResolver + ?Sized> ActionResolver for R {
    fn resolve_action(&self, id: ElementId) -> Option<ActionView<'_>> {
        self.resolve(id).and_then(ActionView::new)
    }

    fn resolve_parameter(&self, id: ElementId) -> Option<&Element> {
        self.resolve(id).filter(|e| e.feature().is_some())
    }

    fn resolve_element(&self, id: ElementId) -> Option<&Element> {
        self.resolve(id)
    }
}
