//! Structural and referential well-formedness of single elements.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! ```text
//! 1. name presence            definitions and usages
//! 2. specialization cycles    path-tracking walk over specializations
//! 3. references               usage definition, nested cycles, dangling ids
//! 4. bounded lists            end features against their multiplicity
//! 5. subtype rules            abstract+final, portion without composite,
//!                             transition invariants, then advisories
//! ```
//!
//! Without a resolver only what the element itself holds is checked:
//! direct self-specialization, self-nesting and a missing definition.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::ValidationOptions;
use super::codes::AdvisoryKind;
use super::diagnostics::Advisory;
use super::error::{Endpoint, LabeledIds, Result, ValidationError};
use crate::base::{ElementId, IdList};
use crate::model::{Element, ElementResolver, UsageKind};
use crate::multiplicity::Multiplicity;

/// Validates one element at a time against a resolver.
pub struct StructuralValidator<'r> {
    resolver: Option<&'r dyn ElementResolver>,
    options: ValidationOptions,
    advisories: Vec<Advisory>,
}

impl<'r> StructuralValidator<'r> {
    pub fn new(resolver: Option<&'r dyn ElementResolver>) -> Self {
        Self {
            resolver,
            options: ValidationOptions::default(),
            advisories: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Advisories gathered by successful runs so far.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn take_advisories(&mut self) -> Vec<Advisory> {
        std::mem::take(&mut self.advisories)
    }

    /// Validate an element, failing on the first rule it breaks.
    pub fn validate(&mut self, element: &Element) -> Result<()> {
        trace!(id = %element.id, kind = %element.kind(), "structural check");

        self.check_name(element)?;
        self.check_specializations(element)?;
        self.check_references(element)?;
        self.check_bounded_lists(element)?;
        self.check_flags(element)?;
        self.check_transition(element)?;

        if self.options.report_advisories {
            self.collect_advisories(element);
        }
        Ok(())
    }

    // ── 1. Name ─────────────────────────────────────────────────────

    fn check_name(&self, element: &Element) -> Result<()> {
        let needs_name = element.is_definition() || element.is_usage();
        let has_name = element.name().is_some_and(|n| !n.trim().is_empty());
        if needs_name && !has_name {
            return Err(ValidationError::MissingName {
                element: element.id,
                kind: element.kind(),
            });
        }
        Ok(())
    }

    // ── 2. Specialization ───────────────────────────────────────────

    fn check_specializations(&self, element: &Element) -> Result<()> {
        let cycle = find_cycle(element, self.resolver, |e| {
            e.classifier().map(|c| &c.specializations)
        });
        match cycle {
            Some(path) => Err(ValidationError::CyclicSpecialization {
                path: self.labeled(element, path),
            }),
            None => Ok(()),
        }
    }

    // ── 3. References ───────────────────────────────────────────────

    fn check_references(&self, element: &Element) -> Result<()> {
        if let Some(usage) = element.as_usage() {
            match usage.definition() {
                None => {
                    if !element.is_abstract() {
                        return Err(ValidationError::UnresolvedDefinition {
                            element: element.id,
                            label: element.label(),
                        });
                    }
                }
                Some(definition) => {
                    if let Some(resolver) = self.resolver {
                        let resolved = resolver
                            .resolve(definition)
                            .is_some_and(Element::is_definition);
                        if !resolved {
                            return Err(self.dangling(element, "definition", definition));
                        }
                    }
                }
            }

            let cycle = find_cycle(element, self.resolver, |e| e.as_usage().map(|u| &u.nested));
            if let Some(path) = cycle {
                return Err(ValidationError::NestedUsageCycle {
                    path: self.labeled(element, path),
                });
            }
        }

        let Some(resolver) = self.resolver else {
            return Ok(());
        };
        if let Some(header) = element.classifier() {
            for general in &header.specializations {
                if resolver.resolve(general).is_none() {
                    return Err(self.dangling(element, "specialization", general));
                }
            }
        }
        for (role, target) in element.references() {
            if resolver.resolve(target).is_none() {
                return Err(self.dangling(element, role, target));
            }
        }
        Ok(())
    }

    // ── 4. Bounded lists ────────────────────────────────────────────

    fn check_bounded_lists(&self, element: &Element) -> Result<()> {
        for list in element.bounded_lists() {
            let with_element = |source| ValidationError::Multiplicity {
                element: Some(element.id),
                source,
            };
            let bound = Multiplicity::parse(list.bound).map_err(with_element)?;
            let label = format!("'{}' {}", element.label(), list.role);
            bound
                .check_size(list.ids.len(), &label)
                .map_err(with_element)?;
        }
        Ok(())
    }

    // ── 5. Subtype rules ────────────────────────────────────────────

    fn check_flags(&self, element: &Element) -> Result<()> {
        if let Some(header) = element.classifier() {
            if header.is_abstract && header.is_final {
                return Err(ValidationError::AbstractFinalConflict {
                    element: element.id,
                    label: element.label(),
                });
            }
        }
        if let Some(feature) = element.feature() {
            if feature.is_portion && !feature.is_composite {
                return Err(ValidationError::PortionNotComposite {
                    element: element.id,
                    label: element.label(),
                });
            }
        }
        Ok(())
    }

    fn check_transition(&self, element: &Element) -> Result<()> {
        let Some(transition) = element.as_usage().and_then(|u| u.kind.as_transition()) else {
            return Ok(());
        };
        let missing = |endpoint| ValidationError::MissingTransitionEndpoint {
            transition: element.id,
            label: element.label(),
            endpoint,
        };
        if transition.source.is_none() {
            return Err(missing(Endpoint::Source));
        }
        if transition.target.is_none() {
            return Err(missing(Endpoint::Target));
        }
        if transition.is_else && transition.has_guard() {
            return Err(ValidationError::GuardedElseTransition {
                transition: element.id,
                label: element.label(),
            });
        }
        if transition.is_self_transition() && !transition.has_guard() && !transition.has_trigger()
        {
            return Err(ValidationError::UntriggeredSelfTransition {
                transition: element.id,
                label: element.label(),
            });
        }
        Ok(())
    }

    fn collect_advisories(&mut self, element: &Element) {
        if element.is_definition() && element.is_abstract() {
            let users = self
                .resolver
                .map(|r| r.usage_references(element.id))
                .unwrap_or_default();
            if !users.is_empty() {
                self.advisories.push(Advisory::new(
                    AdvisoryKind::AbstractDefinitionInUse,
                    element.id,
                    format!(
                        "abstract definition '{}' is used by {} usage(s)",
                        element.label(),
                        users.len()
                    ),
                ));
            }
        }

        let Some(usage) = element.as_usage() else {
            return;
        };
        match &usage.kind {
            UsageKind::Flow {
                source: Some(source),
                target: Some(target),
                ..
            } if source == target => {
                self.advisories.push(Advisory::new(
                    AdvisoryKind::SelfReferentialConnection,
                    element.id,
                    format!("flow '{}' connects an element to itself", element.label()),
                ));
            }
            UsageKind::Connection { ends }
            | UsageKind::Interface { ends }
            | UsageKind::Allocation { ends } => {
                if let Some(definition) = self.shared_end_definition(ends) {
                    self.advisories.push(Advisory::new(
                        AdvisoryKind::SameTypeConnection,
                        element.id,
                        format!(
                            "connection '{}' joins two ends of the same type {}",
                            element.label(),
                            definition
                        ),
                    ));
                }
            }
            _ => {}
        }
    }

    /// The definition shared by a connection's first and last ends, if any.
    fn shared_end_definition(&self, ends: &IdList) -> Option<ElementId> {
        let resolver = self.resolver?;
        let first = ends.first()?;
        let last = ends.get(ends.len().checked_sub(1)?)?;
        if first == last {
            return None;
        }
        let definition_of =
            |id| resolver.resolve(id).and_then(Element::as_usage).and_then(|u| u.definition());
        let source = definition_of(first)?;
        (definition_of(last) == Some(source)).then_some(source)
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn label_of(&self, element: &Element, id: ElementId) -> String {
        if id == element.id {
            return element.label();
        }
        self.resolver
            .and_then(|r| r.resolve(id))
            .map(Element::label)
            .unwrap_or_else(|| format!("<unresolved {id}>"))
    }

    fn labeled(&self, element: &Element, path: Vec<ElementId>) -> LabeledIds {
        path.into_iter()
            .map(|id| (id, self.label_of(element, id)))
            .collect()
    }

    fn dangling(&self, element: &Element, role: &'static str, target: ElementId) -> ValidationError {
        ValidationError::DanglingReference {
            element: element.id,
            label: element.label(),
            role,
            target,
        }
    }
}

/// Walk `edges` from `start` and return the path to the first id that
/// repeats on the current path.
///
/// Ids that do not resolve, or resolve to an element without the edge list,
/// are leaves. The start element is read directly, so it need not be known
/// to the resolver.
fn find_cycle<'a>(
    start: &'a Element,
    resolver: Option<&'a dyn ElementResolver>,
    edges: impl Fn(&'a Element) -> Option<&'a IdList>,
) -> Option<Vec<ElementId>> {
    let out = |id: ElementId| -> Option<&'a IdList> {
        if id == start.id {
            edges(start)
        } else {
            resolver.and_then(|r| r.resolve(id)).and_then(&edges)
        }
    };

    let start_edges = edges(start)?;
    if start_edges.contains(start.id) {
        return Some(vec![start.id, start.id]);
    }
    if resolver.is_none() {
        return None;
    }

    let mut stack: Vec<(ElementId, usize)> = vec![(start.id, 0)];
    let mut on_path: FxHashSet<ElementId> = FxHashSet::default();
    let mut done: FxHashSet<ElementId> = FxHashSet::default();
    on_path.insert(start.id);

    while let Some(&(current, next)) = stack.last() {
        match out(current).and_then(|ids| ids.get(next)) {
            Some(child) => {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if on_path.contains(&child) {
                    let mut path: Vec<ElementId> = stack.iter().map(|(id, _)| *id).collect();
                    path.push(child);
                    return Some(path);
                }
                if done.contains(&child) {
                    continue;
                }
                if out(child).is_some() {
                    on_path.insert(child);
                    stack.push((child, 0));
                } else {
                    done.insert(child);
                }
            }
            None => {
                stack.pop();
                on_path.remove(&current);
                done.insert(current);
            }
        }
    }
    None
}

/// Validate one element with default options. Advisories are discarded.
pub fn validate_element(element: &Element, resolver: Option<&dyn ElementResolver>) -> Result<()> {
    StructuralValidator::new(resolver).validate(element)
}
