//! The element arena and its editing operations.
//!
//! Elements live in slots of a `Vec`; an [`ElementId`] is a slot number.
//! Removal empties the slot and never frees it for reuse.
//!
//! Two indexes sit beside the slots:
//!
//! ```text
//! by_uuid      Uuid ─────────────→ ElementId
//! usage_index  Definition id ────→ IdList of usages whose definition is it
//! ```
//!
//! `Usage::definition` is the authoritative side of the Usage/Definition
//! link. `usage_index` is its inverse and is touched only by [`Model::add`],
//! [`Model::import`], [`Model::set_definition`], [`Model::remove`] and the
//! drop of an [`ElementMut`], so it always equals `{ u | u.definition == d }`
//! for every `d`.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;
use uuid::Uuid;

use super::action::{ActionBehavior, LoopKind};
use super::definition::{Definition, DefinitionKind};
use super::element::{ClassifierHeader, Direction, Element, ElementData, FeatureHeader, Package};
use super::error::ModelError;
use super::usage::{Usage, UsageKind};
use crate::base::{ElementId, IdList};
use crate::multiplicity::Multiplicity;

// ============================================================================
// NEW ELEMENT
// ============================================================================

/// An element that has not been added to a [`Model`] yet.
///
/// The builder methods only touch fields the element's variant has; calling
/// `with_direction` on a definition, say, leaves it unchanged.
#[derive(Clone, Debug)]
pub struct NewElement {
    element: Element,
}

impl NewElement {
    pub fn new(data: impl Into<ElementData>) -> Self {
        Self {
            element: Element {
                id: ElementId::new(0),
                uuid: Uuid::nil(),
                name: None,
                owner: None,
                documentation: None,
                data: data.into(),
            },
        }
    }

    pub fn package() -> Self {
        Self::new(Package::default())
    }

    pub fn classifier() -> Self {
        Self::new(ElementData::Classifier(ClassifierHeader::default()))
    }

    pub fn feature() -> Self {
        Self::new(ElementData::Feature(FeatureHeader::default()))
    }

    pub fn definition(kind: DefinitionKind) -> Self {
        Self::new(Definition::new(kind))
    }

    pub fn usage(kind: UsageKind) -> Self {
        Self::new(Usage::new(kind))
    }

    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.element.name = Some(name.into());
        self
    }

    pub fn with_owner(mut self, owner: ElementId) -> Self {
        self.element.owner = Some(owner);
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.element.documentation = Some(doc.into());
        self
    }

    pub fn with_abstract(mut self) -> Self {
        if let Some(c) = self.element.classifier_mut() {
            c.is_abstract = true;
        }
        self
    }

    pub fn with_final(mut self) -> Self {
        if let Some(c) = self.element.classifier_mut() {
            c.is_final = true;
        }
        self
    }

    pub fn with_variation(mut self) -> Self {
        match &mut self.element.data {
            ElementData::Definition(d) => d.is_variation = true,
            ElementData::Usage(u) => u.is_variation = true,
            _ => {}
        }
        self
    }

    pub fn with_specialization(mut self, general: ElementId) -> Self {
        if let Some(c) = self.element.classifier_mut() {
            c.specializations.insert(general);
        }
        self
    }

    /// Type a usage by a definition.
    pub fn typed_by(mut self, definition: ElementId) -> Self {
        if let Some(u) = self.element.as_usage_mut() {
            u.definition = Some(definition);
        }
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        if let Some(f) = self.element.feature_mut() {
            f.direction = Some(direction);
        }
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        if let Some(f) = self.element.feature_mut() {
            f.multiplicity = Some(multiplicity);
        }
        self
    }

    pub fn composite(mut self) -> Self {
        if let Some(f) = self.element.feature_mut() {
            f.is_composite = true;
        }
        self
    }

    pub fn portion(mut self) -> Self {
        if let Some(f) = self.element.feature_mut() {
            f.is_portion = true;
        }
        self
    }

    pub fn with_nested(mut self, child: ElementId) -> Self {
        if let Some(u) = self.element.as_usage_mut() {
            u.nested.insert(child);
        }
        self
    }

    pub fn with_owned_feature(mut self, feature: ElementId) -> Self {
        if let Some(d) = self.element.as_definition_mut() {
            d.owned_features.insert(feature);
        }
        self
    }

    pub fn with_end(mut self, end: ElementId) -> Self {
        if let Some(ends) = self.element.ends_mut() {
            ends.insert(end);
        }
        self
    }

    pub fn with_member(mut self, member: ElementId) -> Self {
        if let ElementData::Package(p) = &mut self.element.data {
            p.members.insert(member);
        }
        self
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// An in-memory element graph for one editing session.
#[derive(Clone, Debug, Default)]
pub struct Model {
    slots: Vec<Option<Element>>,
    by_uuid: FxHashMap<Uuid, ElementId>,
    usage_index: FxHashMap<ElementId, IdList>,
    live: usize,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable access to an element.
    ///
    /// The returned guard keeps the model's indexes in step with whatever
    /// the caller does to the element; see [`ElementMut`].
    pub fn get_mut(&mut self, id: ElementId) -> Option<ElementMut<'_>> {
        let element = self.slots.get_mut(id.index()).and_then(Option::as_mut)?;
        Some(ElementMut::new(element, &mut self.usage_index))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Live elements in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.iter().map(|e| e.id)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// First element in arena order with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Element> {
        self.iter().find(|e| e.name() == Some(name))
    }

    pub fn by_uuid(&self, uuid: &Uuid) -> Option<&Element> {
        self.by_uuid.get(uuid).and_then(|id| self.get(*id))
    }

    /// Usages whose definition is `definition`, in the order they were linked.
    pub fn usage_references(&self, definition: ElementId) -> Vec<ElementId> {
        self.usage_index
            .get(&definition)
            .map(IdList::to_vec)
            .unwrap_or_default()
    }

    /// Live elements with a relationship pointing at `target`, in arena
    /// order. A linear scan; see [`Element::refers_to`].
    pub fn referrers(&self, target: ElementId) -> Vec<ElementId> {
        self.iter()
            .filter(|e| e.id != target && e.refers_to(target))
            .map(|e| e.id)
            .collect()
    }

    fn element(&self, id: ElementId) -> Result<&Element, ModelError> {
        self.get(id).ok_or(ModelError::UnknownElement(id))
    }

    /// Raw slot access for edits that maintain the indexes themselves.
    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, ModelError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(ModelError::UnknownElement(id))
    }

    // ── Insertion and removal ───────────────────────────────────────

    /// Add an element under a freshly generated uuid.
    pub fn add(&mut self, new: NewElement) -> ElementId {
        let mut uuid = Uuid::new_v4();
        while self.by_uuid.contains_key(&uuid) {
            uuid = Uuid::new_v4();
        }
        self.insert(new, uuid)
    }

    /// Add an element that already carries a uuid, e.g. one read from an
    /// external document.
    pub fn import(&mut self, new: NewElement, uuid: Uuid) -> Result<ElementId, ModelError> {
        if self.by_uuid.contains_key(&uuid) {
            return Err(ModelError::DuplicateUuid(uuid));
        }
        Ok(self.insert(new, uuid))
    }

    fn insert(&mut self, new: NewElement, uuid: Uuid) -> ElementId {
        let id = ElementId::new(self.slots.len() as u32);
        let mut element = new.element;
        element.id = id;
        element.uuid = uuid;

        if let Some(definition) = element.as_usage().and_then(Usage::definition) {
            link(&mut self.usage_index, definition, id);
        }
        trace!(%id, kind = %element.kind(), "add element");

        self.by_uuid.insert(uuid, id);
        self.slots.push(Some(element));
        self.live += 1;
        id
    }

    /// Remove an element and return it.
    ///
    /// Nothing cascades: children keep their owner id and lists that mention
    /// the element keep mentioning it until edited.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, ModelError> {
        let element = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(ModelError::UnknownElement(id))?;

        self.by_uuid.remove(&element.uuid);
        if let Some(definition) = element.as_usage().and_then(Usage::definition) {
            self.unlink_usage(definition, id);
        }
        self.live -= 1;
        trace!(%id, kind = %element.kind(), "remove element");
        Ok(element)
    }

    fn unlink_usage(&mut self, definition: ElementId, usage: ElementId) {
        unlink(&mut self.usage_index, definition, usage);
    }

    // ── Naming and ownership ────────────────────────────────────────

    /// Set or clear the name. Returns the previous name.
    pub fn rename(
        &mut self,
        id: ElementId,
        name: Option<&str>,
    ) -> Result<Option<Arc<str>>, ModelError> {
        let element = self.element_mut(id)?;
        Ok(std::mem::replace(&mut element.name, name.map(Arc::from)))
    }

    pub fn set_documentation(&mut self, id: ElementId, doc: Option<&str>) -> Result<(), ModelError> {
        self.element_mut(id)?.documentation = doc.map(Arc::from);
        Ok(())
    }

    /// Set the owner back-reference. The owner must be live.
    pub fn set_owner(&mut self, id: ElementId, owner: Option<ElementId>) -> Result<(), ModelError> {
        if let Some(owner) = owner {
            self.element(owner)?;
        }
        self.element_mut(id)?.owner = owner;
        Ok(())
    }

    // ── Classifier and feature flags ────────────────────────────────

    fn classifier_mut(&mut self, id: ElementId) -> Result<&mut ClassifierHeader, ModelError> {
        let element = self.element_mut(id)?;
        let kind = element.kind();
        element
            .classifier_mut()
            .ok_or(ModelError::mismatch(id, "classifier", kind))
    }

    fn feature_mut(&mut self, id: ElementId) -> Result<&mut FeatureHeader, ModelError> {
        let element = self.element_mut(id)?;
        let kind = element.kind();
        element
            .feature_mut()
            .ok_or(ModelError::mismatch(id, "feature", kind))
    }

    fn usage_mut(&mut self, id: ElementId) -> Result<&mut Usage, ModelError> {
        let element = self.element_mut(id)?;
        let kind = element.kind();
        element
            .as_usage_mut()
            .ok_or(ModelError::mismatch(id, "usage", kind))
    }

    /// Add a specialization edge. Returns `false` if it already existed.
    ///
    /// The general classifier is not required to exist; dangling and cyclic
    /// edges are reported by validation.
    pub fn add_specialization(
        &mut self,
        id: ElementId,
        general: ElementId,
    ) -> Result<bool, ModelError> {
        Ok(self.classifier_mut(id)?.specializations.insert(general))
    }

    pub fn remove_specialization(
        &mut self,
        id: ElementId,
        general: ElementId,
    ) -> Result<bool, ModelError> {
        Ok(self.classifier_mut(id)?.specializations.remove(general))
    }

    pub fn set_abstract(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        self.classifier_mut(id)?.is_abstract = value;
        Ok(())
    }

    pub fn set_final(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        self.classifier_mut(id)?.is_final = value;
        Ok(())
    }

    pub fn set_composite(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        self.feature_mut(id)?.is_composite = value;
        Ok(())
    }

    pub fn set_portion(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        self.feature_mut(id)?.is_portion = value;
        Ok(())
    }

    /// Parse and store a feature multiplicity.
    pub fn set_multiplicity(&mut self, id: ElementId, text: &str) -> Result<Multiplicity, ModelError> {
        let multiplicity = Multiplicity::parse(text)?;
        self.feature_mut(id)?.multiplicity = Some(multiplicity);
        Ok(multiplicity)
    }

    /// Parse and store a feature direction (`in`, `out` or `inout`).
    pub fn set_direction(&mut self, id: ElementId, text: &str) -> Result<Direction, ModelError> {
        let direction: Direction = text.parse()?;
        self.feature_mut(id)?.direction = Some(direction);
        Ok(direction)
    }

    // ── Usage/Definition link ───────────────────────────────────────

    /// Point a usage at a definition, or clear the link.
    ///
    /// Returns the previous definition. The definition is not required to
    /// exist; an unresolved link is reported by validation.
    pub fn set_definition(
        &mut self,
        usage: ElementId,
        definition: Option<ElementId>,
    ) -> Result<Option<ElementId>, ModelError> {
        let previous = std::mem::replace(&mut self.usage_mut(usage)?.definition, definition);
        if previous == definition {
            return Ok(previous);
        }
        if let Some(old) = previous {
            self.unlink_usage(old, usage);
        }
        if let Some(new) = definition {
            link(&mut self.usage_index, new, usage);
        }
        trace!(%usage, ?previous, ?definition, "set definition");
        Ok(previous)
    }

    // ── Containment lists ───────────────────────────────────────────

    /// Append `child` to a usage's nested usages and make the usage its owner.
    pub fn add_nested_usage(&mut self, parent: ElementId, child: ElementId) -> Result<bool, ModelError> {
        let child_element = self.element(child)?;
        if !child_element.is_usage() {
            return Err(ModelError::mismatch(child, "usage", child_element.kind()));
        }
        let inserted = self.usage_mut(parent)?.nested.insert(child);
        self.element_mut(child)?.owner = Some(parent);
        Ok(inserted)
    }

    /// Append `feature` to a definition's owned features and make the
    /// definition its owner.
    pub fn add_owned_feature(
        &mut self,
        definition: ElementId,
        feature: ElementId,
    ) -> Result<bool, ModelError> {
        let feature_element = self.element(feature)?;
        if feature_element.feature().is_none() {
            return Err(ModelError::mismatch(feature, "feature", feature_element.kind()));
        }
        let element = self.element_mut(definition)?;
        let kind = element.kind();
        let inserted = element
            .as_definition_mut()
            .ok_or(ModelError::mismatch(definition, "definition", kind))?
            .owned_features
            .insert(feature);
        self.element_mut(feature)?.owner = Some(definition);
        Ok(inserted)
    }

    /// Append an end feature to an interface, connection or allocation.
    pub fn add_end(&mut self, connection: ElementId, end: ElementId) -> Result<bool, ModelError> {
        let element = self.element_mut(connection)?;
        let kind = element.kind();
        Ok(element
            .ends_mut()
            .ok_or(ModelError::mismatch(connection, "connection-like element", kind))?
            .insert(end))
    }

    pub fn add_member(&mut self, package: ElementId, member: ElementId) -> Result<bool, ModelError> {
        self.element(member)?;
        let element = self.element_mut(package)?;
        let kind = element.kind();
        let ElementData::Package(p) = &mut element.data else {
            return Err(ModelError::mismatch(package, "package", kind));
        };
        let inserted = p.members.insert(member);
        self.element_mut(member)?.owner = Some(package);
        Ok(inserted)
    }

    // ── Behaviour ───────────────────────────────────────────────────

    /// Mark a state usage as its machine's initial state, or clear the mark.
    pub fn set_initial(&mut self, state: ElementId, value: bool) -> Result<(), ModelError> {
        let element = self.element_mut(state)?;
        let kind = element.kind();
        match element.as_usage_mut().map(|u| &mut u.kind) {
            Some(UsageKind::State(data)) => {
                data.is_initial = value;
                Ok(())
            }
            _ => Err(ModelError::mismatch(state, "state", kind)),
        }
    }

    /// Parse and store the kind of a loop action.
    pub fn set_loop_kind(&mut self, action: ElementId, text: &str) -> Result<LoopKind, ModelError> {
        let loop_kind: LoopKind = text.parse()?;
        let element = self.element_mut(action)?;
        let kind = element.kind();
        match element.action_mut().map(|a| &mut a.behavior) {
            Some(ActionBehavior::Loop(spec)) => {
                spec.kind = loop_kind;
                Ok(loop_kind)
            }
            _ => Err(ModelError::mismatch(action, "loop action", kind)),
        }
    }
}

// ============================================================================
// ELEMENT GUARD
// ============================================================================

/// Mutable access to one element of a [`Model`].
///
/// Dereferences to [`Element`]. On drop the element's `id` and `uuid` are
/// restored and, if the usage's definition link changed (including by
/// replacing `data` wholesale), the inverse definition index is moved to
/// match.
pub struct ElementMut<'m> {
    element: &'m mut Element,
    usage_index: &'m mut FxHashMap<ElementId, IdList>,
    id: ElementId,
    uuid: Uuid,
    definition: Option<ElementId>,
}

impl<'m> ElementMut<'m> {
    fn new(element: &'m mut Element, usage_index: &'m mut FxHashMap<ElementId, IdList>) -> Self {
        let id = element.id;
        let uuid = element.uuid;
        let definition = element.as_usage().and_then(Usage::definition);
        Self {
            element,
            usage_index,
            id,
            uuid,
            definition,
        }
    }
}

impl Deref for ElementMut<'_> {
    type Target = Element;

    fn deref(&self) -> &Element {
        self.element
    }
}

impl DerefMut for ElementMut<'_> {
    fn deref_mut(&mut self) -> &mut Element {
        self.element
    }
}

impl Drop for ElementMut<'_> {
    fn drop(&mut self) {
        self.element.id = self.id;
        self.element.uuid = self.uuid;

        let definition = self.element.as_usage().and_then(Usage::definition);
        if definition == self.definition {
            return;
        }
        if let Some(old) = self.definition {
            unlink(self.usage_index, old, self.id);
        }
        if let Some(new) = definition {
            link(self.usage_index, new, self.id);
        }
        trace!(usage = %self.id, previous = ?self.definition, ?definition, "resync definition index");
    }
}

fn link(index: &mut FxHashMap<ElementId, IdList>, definition: ElementId, usage: ElementId) {
    index.entry(definition).or_default().insert(usage);
}

fn unlink(index: &mut FxHashMap<ElementId, IdList>, definition: ElementId, usage: ElementId) {
    if let Some(list) = index.get_mut(&definition) {
        list.remove(usage);
        if list.is_empty() {
            index.remove(&definition);
        }
    }
}
