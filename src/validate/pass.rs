//! Whole-model validation.

use tracing::debug;

use super::action::ActionHierarchyValidator;
use super::diagnostics::Report;
use super::error::{Result, ValidationError};
use super::state_machine::StateMachine;
use super::structural::StructuralValidator;
use super::{ValidationMode, ValidationOptions};
use crate::base::ElementId;
use crate::model::{
    DefinitionKind, Element, ElementData, ElementResolver, Model, StateView, UsageKind,
};

/// Runs every validator over a model.
///
/// Order:
///
/// ```text
/// 1. structural      each element, arena order
/// 2. state machines  each state definition/usage owning states, arena order
/// 3. actions         one walk over the action forest
/// ```
pub struct ModelValidator<'m> {
    model: &'m Model,
    options: ValidationOptions,
}

impl<'m> ModelValidator<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the model.
    ///
    /// Fail-fast returns the first error. Collecting never fails: every
    /// element's, every machine's and every action root's first error end
    /// up in the report.
    pub fn run(&self) -> Result<Report> {
        debug!(elements = self.model.len(), mode = ?self.options.mode, "validating model");
        let mut report = Report::new();

        let mut structural = StructuralValidator::new(Some(self.model as &dyn ElementResolver))
            .with_options(self.options);
        for element in self.model.iter() {
            if let Err(error) = structural.validate(element) {
                self.record(&mut report, error)?;
            }
        }
        report.advisories.extend(structural.take_advisories());

        for owner in self.model.iter().filter(|e| owns_states(self.model, e)) {
            let Ok(machine) = StateMachine::from_model(self.model, owner.id) else {
                continue;
            };
            if let Err(error) = machine.validate() {
                self.record(&mut report, error)?;
            }
        }

        let roots = self.action_roots();
        let mut actions = ActionHierarchyValidator::new(self.model);
        match self.options.mode {
            ValidationMode::FailFast => actions.validate(&roots)?,
            ValidationMode::CollectAll => report.errors.extend(actions.collect(&roots)),
        }

        debug!(
            errors = report.errors.len(),
            advisories = report.advisories.len(),
            "model validation finished"
        );
        Ok(report)
    }

    fn record(&self, report: &mut Report, error: ValidationError) -> Result<()> {
        match self.options.mode {
            ValidationMode::FailFast => Err(error),
            ValidationMode::CollectAll => {
                report.errors.push(error);
                Ok(())
            }
        }
    }

    /// Top-level actions first, then every other action so that actions
    /// only reachable through an ownership cycle are still visited.
    fn action_roots(&self) -> Vec<ElementId> {
        let top_level = self.model.iter().filter(|e| {
            is_action(e)
                && !e
                    .owner
                    .and_then(|owner| self.model.get(owner))
                    .is_some_and(is_action)
        });
        let nested = self.model.iter().filter(|e| {
            is_action(e)
                && e
                    .owner
                    .and_then(|owner| self.model.get(owner))
                    .is_some_and(is_action)
        });
        top_level.chain(nested).map(|e| e.id).collect()
    }
}

fn is_action(element: &Element) -> bool {
    element.action().is_some()
}

/// Whether `element` is a state definition or state usage owning states.
pub(crate) fn owns_states(model: &Model, element: &Element) -> bool {
    let children = match &element.data {
        ElementData::Definition(d) if matches!(d.kind, DefinitionKind::State) => &d.owned_features,
        ElementData::Usage(u) if matches!(u.kind, UsageKind::State(_)) => &u.nested,
        _ => return false,
    };
    children
        .iter()
        .filter_map(|id| model.get(id))
        .any(|child| StateView::new(child).is_some())
}

/// Validate a whole model with the given options.
pub fn validate_model(model: &Model, options: ValidationOptions) -> Result<Report> {
    ModelValidator::new(model).with_options(options).run()
}
