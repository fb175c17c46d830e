//! Change tracking for [`Model`] edits.
//!
//! `ChangeTracker` records which elements were created, modified or
//! removed while delegating every edit to the model. After a logical edit
//! the editing layer re-validates only what changed:
//!
//! ```ignore
//! let mut tracker = ChangeTracker::new();
//! let engine = tracker.add(&mut model, NewElement::definition(DefinitionKind::Part).with_name("Engine"));
//! let e1 = tracker.add(&mut model, NewElement::usage(UsageKind::Part).with_name("e1"));
//! tracker.set_definition(&mut model, e1, Some(engine))?;
//!
//! let report = tracker.validate_dirty(&model, ValidationOptions::default())?;
//! ```

use std::collections::BTreeSet;

use tracing::debug;

use crate::base::ElementId;
use crate::model::{Direction, Element, ElementResolver, LoopKind, Model, ModelError, NewElement};
use crate::multiplicity::Multiplicity;
use crate::validate::{
    ActionHierarchyValidator, Report, StateMachine, StructuralValidator, ValidationError,
    ValidationMode, ValidationOptions, owns_states,
};

/// Tracks mutations applied to a [`Model`].
#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    /// Element ids that have been modified, including created ones.
    modified: BTreeSet<ElementId>,
    /// Element ids that have been created (subset of modified).
    created: BTreeSet<ElementId>,
    removed: BTreeSet<ElementId>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all dirty state.
    pub fn clear(&mut self) {
        self.modified.clear();
        self.created.clear();
        self.removed.clear();
    }

    // ── Query ───────────────────────────────────────────────────────

    pub fn has_changes(&self) -> bool {
        !self.modified.is_empty() || !self.removed.is_empty()
    }

    pub fn is_dirty(&self, id: ElementId) -> bool {
        self.modified.contains(&id)
    }

    pub fn is_created(&self, id: ElementId) -> bool {
        self.created.contains(&id)
    }

    pub fn is_removed(&self, id: ElementId) -> bool {
        self.removed.contains(&id)
    }

    /// Dirty element ids in ascending order.
    pub fn dirty_elements(&self) -> Vec<ElementId> {
        self.modified.iter().copied().collect()
    }

    pub fn created_elements(&self) -> Vec<ElementId> {
        self.created.iter().copied().collect()
    }

    pub fn removed_elements(&self) -> Vec<ElementId> {
        self.removed.iter().copied().collect()
    }

    /// Mark an element dirty after an edit made outside the tracker.
    pub fn mark_dirty(&mut self, id: ElementId) {
        self.modified.insert(id);
    }

    /// Record a successful edit of `id` and pass the result through.
    fn touch<T>(&mut self, id: ElementId, result: Result<T, ModelError>) -> Result<T, ModelError> {
        if result.is_ok() {
            self.modified.insert(id);
        }
        result
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub fn add(&mut self, model: &mut Model, new: NewElement) -> ElementId {
        let id = model.add(new);
        self.created.insert(id);
        self.modified.insert(id);
        id
    }

    /// Remove an element. Every live element whose relationships point at
    /// it becomes dirty, along with its owner.
    pub fn remove(&mut self, model: &mut Model, id: ElementId) -> Result<Element, ModelError> {
        let dependents = model.referrers(id);
        let element = model.remove(id)?;
        self.modified.remove(&id);
        self.created.remove(&id);
        self.removed.insert(id);
        self.modified.extend(dependents);
        if let Some(owner) = element.owner.filter(|owner| model.contains(*owner)) {
            self.modified.insert(owner);
        }
        Ok(element)
    }

    pub fn rename(&mut self, model: &mut Model, id: ElementId, name: Option<&str>) -> Result<(), ModelError> {
        let result = model.rename(id, name).map(|_| ());
        self.touch(id, result)
    }

    pub fn set_owner(
        &mut self,
        model: &mut Model,
        id: ElementId,
        owner: Option<ElementId>,
    ) -> Result<(), ModelError> {
        let result = model.set_owner(id, owner);
        self.touch(id, result)
    }

    pub fn add_specialization(
        &mut self,
        model: &mut Model,
        id: ElementId,
        general: ElementId,
    ) -> Result<bool, ModelError> {
        let result = model.add_specialization(id, general);
        self.touch(id, result)
    }

    pub fn remove_specialization(
        &mut self,
        model: &mut Model,
        id: ElementId,
        general: ElementId,
    ) -> Result<bool, ModelError> {
        let result = model.remove_specialization(id, general);
        self.touch(id, result)
    }

    pub fn set_abstract(&mut self, model: &mut Model, id: ElementId, value: bool) -> Result<(), ModelError> {
        let result = model.set_abstract(id, value);
        self.touch(id, result)
    }

    pub fn set_final(&mut self, model: &mut Model, id: ElementId, value: bool) -> Result<(), ModelError> {
        let result = model.set_final(id, value);
        self.touch(id, result)
    }

    /// Retype a usage. The usage and both the old and new definitions
    /// become dirty.
    pub fn set_definition(
        &mut self,
        model: &mut Model,
        usage: ElementId,
        definition: Option<ElementId>,
    ) -> Result<Option<ElementId>, ModelError> {
        let previous = model.set_definition(usage, definition)?;
        self.modified.insert(usage);
        self.modified
            .extend(previous.into_iter().chain(definition).filter(|d| model.contains(*d)));
        Ok(previous)
    }

    pub fn add_nested_usage(
        &mut self,
        model: &mut Model,
        parent: ElementId,
        child: ElementId,
    ) -> Result<bool, ModelError> {
        let inserted = model.add_nested_usage(parent, child)?;
        self.modified.insert(parent);
        self.modified.insert(child);
        Ok(inserted)
    }

    pub fn add_owned_feature(
        &mut self,
        model: &mut Model,
        definition: ElementId,
        feature: ElementId,
    ) -> Result<bool, ModelError> {
        let inserted = model.add_owned_feature(definition, feature)?;
        self.modified.insert(definition);
        self.modified.insert(feature);
        Ok(inserted)
    }

    pub fn add_end(&mut self, model: &mut Model, connection: ElementId, end: ElementId) -> Result<bool, ModelError> {
        let result = model.add_end(connection, end);
        self.touch(connection, result)
    }

    pub fn add_member(&mut self, model: &mut Model, package: ElementId, member: ElementId) -> Result<bool, ModelError> {
        let inserted = model.add_member(package, member)?;
        self.modified.insert(package);
        self.modified.insert(member);
        Ok(inserted)
    }

    pub fn set_multiplicity(
        &mut self,
        model: &mut Model,
        id: ElementId,
        text: &str,
    ) -> Result<Multiplicity, ModelError> {
        let result = model.set_multiplicity(id, text);
        self.touch(id, result)
    }

    pub fn set_direction(&mut self, model: &mut Model, id: ElementId, text: &str) -> Result<Direction, ModelError> {
        let result = model.set_direction(id, text);
        self.touch(id, result)
    }

    pub fn set_documentation(
        &mut self,
        model: &mut Model,
        id: ElementId,
        doc: Option<&str>,
    ) -> Result<(), ModelError> {
        let result = model.set_documentation(id, doc);
        self.touch(id, result)
    }

    pub fn set_composite(&mut self, model: &mut Model, id: ElementId, value: bool) -> Result<(), ModelError> {
        let result = model.set_composite(id, value);
        self.touch(id, result)
    }

    pub fn set_portion(&mut self, model: &mut Model, id: ElementId, value: bool) -> Result<(), ModelError> {
        let result = model.set_portion(id, value);
        self.touch(id, result)
    }

    pub fn set_loop_kind(&mut self, model: &mut Model, action: ElementId, text: &str) -> Result<LoopKind, ModelError> {
        let result = model.set_loop_kind(action, text);
        self.touch(action, result)
    }

    pub fn set_initial(&mut self, model: &mut Model, state: ElementId, value: bool) -> Result<(), ModelError> {
        let result = model.set_initial(state, value);
        self.touch(state, result)
    }

    /// Edit an element in place. The element is marked dirty even if the
    /// closure changes nothing; a changed definition link also dirties the
    /// previous and new definitions.
    pub fn edit<R>(
        &mut self,
        model: &mut Model,
        id: ElementId,
        f: impl FnOnce(&mut Element) -> R,
    ) -> Result<R, ModelError> {
        let mut element = model.get_mut(id).ok_or(ModelError::UnknownElement(id))?;
        let before = element.as_usage().and_then(|u| u.definition());
        let value = f(&mut *element);
        let after = element.as_usage().and_then(|u| u.definition());
        drop(element);

        self.modified.insert(id);
        if before != after {
            for definition in [before, after].into_iter().flatten() {
                if model.contains(definition) {
                    self.modified.insert(definition);
                }
            }
        }
        Ok(value)
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Re-validate what the recorded edits touched.
    ///
    /// Checks, in order: each dirty element that still exists (ascending
    /// id), each state machine that owns or is a dirty element, and the
    /// action hierarchy rooted at the dirty actions.
    pub fn validate_dirty(&self, model: &Model, options: ValidationOptions) -> Result<Report, ValidationError> {
        let dirty: Vec<&Element> = self.modified.iter().filter_map(|id| model.get(*id)).collect();
        debug!(dirty = dirty.len(), removed = self.removed.len(), "validating dirty elements");

        let mut report = Report::new();
        let record = |report: &mut Report, error: ValidationError| match options.mode {
            ValidationMode::FailFast => Err(error),
            ValidationMode::CollectAll => {
                report.errors.push(error);
                Ok(())
            }
        };

        let mut structural =
            StructuralValidator::new(Some(model as &dyn ElementResolver)).with_options(options);
        for element in &dirty {
            if let Err(error) = structural.validate(element) {
                record(&mut report, error)?;
            }
        }
        report.advisories.extend(structural.take_advisories());

        let machines: BTreeSet<ElementId> = dirty
            .iter()
            .flat_map(|e| [Some(e.id), e.owner])
            .flatten()
            .filter(|id| model.get(*id).is_some_and(|e| owns_states(model, e)))
            .collect();
        for owner in machines {
            if let Ok(machine) = StateMachine::from_model(model, owner) {
                if let Err(error) = machine.validate() {
                    record(&mut report, error)?;
                }
            }
        }

        let roots: Vec<ElementId> = dirty
            .iter()
            .filter(|e| e.action().is_some())
            .map(|e| e.id)
            .collect();
        let mut actions = ActionHierarchyValidator::new(model);
        match options.mode {
            ValidationMode::FailFast => actions.validate(&roots)?,
            ValidationMode::CollectAll => report.errors.extend(actions.collect(&roots)),
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionData, DefinitionKind, TransitionData, UsageKind};
    use crate::validate::Category;

    fn named_part_def(model: &mut Model, tracker: &mut ChangeTracker, name: &str) -> ElementId {
        tracker.add(model, NewElement::definition(DefinitionKind::Part).with_name(name))
    }

    #[test]
    fn tracker_records_creation_and_edits() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let engine = named_part_def(&mut model, &mut t, "Engine");
        assert!(t.is_created(engine));
        assert!(t.is_dirty(engine));

        t.clear();
        assert!(!t.has_changes());
        t.rename(&mut model, engine, Some("Motor")).unwrap();
        assert!(t.is_dirty(engine));
        assert!(!t.is_created(engine));
        assert_eq!(model.get(engine).unwrap().name(), Some("Motor"));
    }

    #[test]
    fn tracker_failed_edit_is_not_recorded() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let pkg = t.add(&mut model, NewElement::package());
        t.clear();
        assert!(t.set_abstract(&mut model, pkg, true).is_err());
        assert!(!t.has_changes());
    }

    #[test]
    fn tracker_set_definition_marks_both_sides() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let engine = named_part_def(&mut model, &mut t, "Engine");
        let motor = named_part_def(&mut model, &mut t, "Motor");
        let e1 = t.add(&mut model, NewElement::usage(UsageKind::Part).with_name("e1").typed_by(engine));
        t.clear();

        t.set_definition(&mut model, e1, Some(motor)).unwrap();
        assert_eq!(t.dirty_elements(), vec![engine, motor, e1]);
    }

    #[test]
    fn tracker_remove_dirties_dependents() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let engine = named_part_def(&mut model, &mut t, "Engine");
        let e1 = t.add(&mut model, NewElement::usage(UsageKind::Part).with_name("e1").typed_by(engine));
        t.clear();

        t.remove(&mut model, engine).unwrap();
        assert!(t.is_removed(engine));
        assert!(t.is_dirty(e1));

        let err = t
            .validate_dirty(&model, ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.category(), Category::DanglingReference);
        assert_eq!(err.elements(), vec![e1, engine]);
    }

    #[test]
    fn tracker_remove_dirties_every_referrer() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let general = named_part_def(&mut model, &mut t, "General");
        let special = t.add(
            &mut model,
            NewElement::definition(DefinitionKind::Part)
                .with_name("Special")
                .with_specialization(general),
        );
        let step = t.add(
            &mut model,
            NewElement::usage(UsageKind::action()).with_name("step").with_abstract(),
        );
        let first = t.add(
            &mut model,
            NewElement::usage(UsageKind::Action(ActionData::default().with_succession(step)))
                .with_name("first")
                .with_abstract(),
        );
        t.clear();

        t.remove(&mut model, general).unwrap();
        assert_eq!(t.dirty_elements(), vec![special]);
        let err = t
            .validate_dirty(&model, ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.category(), Category::DanglingReference);
        assert_eq!(err.elements(), vec![special, general]);

        t.clear();
        t.remove(&mut model, step).unwrap();
        assert_eq!(t.dirty_elements(), vec![first]);
        let err = t
            .validate_dirty(&model, ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.category(), Category::DanglingSuccessor);
    }

    #[test]
    fn tracker_edit_resyncs_definition_links() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let engine = named_part_def(&mut model, &mut t, "Engine");
        let e1 = t.add(&mut model, NewElement::usage(UsageKind::Part).with_name("e1").typed_by(engine));
        let e2 = t.add(&mut model, NewElement::usage(UsageKind::Part).with_name("e2"));
        t.clear();

        let copied = model.get(e1).unwrap().data.clone();
        t.edit(&mut model, e2, |element| element.data = copied).unwrap();
        assert_eq!(model.usage_references(engine), vec![e1, e2]);
        assert_eq!(t.dirty_elements(), vec![engine, e2]);
    }

    #[test]
    fn validate_dirty_checks_only_dirty_elements() {
        let mut model = Model::new();
        // Invalid but untouched: no name.
        model.add(NewElement::definition(DefinitionKind::Part));
        let mut t = ChangeTracker::new();
        named_part_def(&mut model, &mut t, "Engine");

        let report = t.validate_dirty(&model, ValidationOptions::default()).unwrap();
        assert!(report.errors.is_empty());
    }

    #[test]
    fn validate_dirty_rechecks_owning_state_machine() {
        let mut model = Model::new();
        let mut t = ChangeTracker::new();
        let machine = t.add(&mut model, NewElement::definition(DefinitionKind::State).with_name("M"));
        let state_def = t.add(&mut model, NewElement::definition(DefinitionKind::State).with_name("S"));
        let idle = t.add(
            &mut model,
            NewElement::usage(UsageKind::initial_state()).with_name("Idle").typed_by(state_def),
        );
        let busy = t.add(
            &mut model,
            NewElement::usage(UsageKind::state()).with_name("Busy").typed_by(state_def),
        );
        t.add_owned_feature(&mut model, machine, idle).unwrap();
        t.add_owned_feature(&mut model, machine, busy).unwrap();

        let err = t
            .validate_dirty(&model, ValidationOptions::default())
            .unwrap_err();
        assert_eq!(err.category(), Category::UnreachableStates);

        let go = t.add(
            &mut model,
            NewElement::usage(UsageKind::Transition(TransitionData::between(idle, busy)))
                .with_name("go")
                .with_abstract(),
        );
        t.add_owned_feature(&mut model, machine, go).unwrap();
        let report = t.validate_dirty(&model, ValidationOptions::default()).unwrap();
        assert!(report.errors.is_empty());
    }
}
