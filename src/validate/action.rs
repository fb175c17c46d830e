//! Action hierarchy validation.
//!
//! Walks a forest of actions depth-first, in pre-order, with one visited set
//! shared across all roots. An action reachable from several roots is
//! checked once and a cycle through successions, branches or loop bodies
//! ends the walk along that edge instead of recursing.
//!
//! Per action, in order:
//!
//! ```text
//! parameters           resolve as parameters          DanglingParameter
//! pre/postconditions   resolve as elements            DanglingReference
//! each successor       resolves as an action          DanglingSuccessor
//!                      and its subtree is walked
//! body                 resolve as actions             DanglingActionReference
//! behaviour            conditional / loop / invocation rules
//! ```
//!
//! Once the rules hold the walk descends into body actions, branch actions,
//! loop init/body/update actions and the invocation target, in that order.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use super::error::{ParameterRole, Result, ValidationError};
use crate::base::{ElementId, IdList};
use crate::model::{
    ActionBehavior, ActionResolver, ActionView, Branch, Invocation, LoopKind, LoopSpec, has_text,
};

pub struct ActionHierarchyValidator<'r> {
    resolver: &'r dyn ActionResolver,
    visited: FxHashSet<ElementId>,
    order: Vec<ElementId>,
}

impl<'r> ActionHierarchyValidator<'r> {
    pub fn new(resolver: &'r dyn ActionResolver) -> Self {
        Self {
            resolver,
            visited: FxHashSet::default(),
            order: Vec::new(),
        }
    }

    /// Validate every root, stopping at the first failure.
    pub fn validate(&mut self, roots: &[ElementId]) -> Result<()> {
        debug!(roots = roots.len(), "validating action hierarchy");
        for &root in roots {
            self.walk(root)?;
        }
        debug!(visited = self.order.len(), "action hierarchy valid");
        Ok(())
    }

    /// Validate every root, collecting the first failure of each.
    ///
    /// The visited set still spans all roots, so actions already reached
    /// from an earlier root are not checked again.
    pub fn collect(&mut self, roots: &[ElementId]) -> Vec<ValidationError> {
        roots
            .iter()
            .filter_map(|&root| self.walk(root).err())
            .collect()
    }

    /// Actions visited so far, in visit order.
    pub fn visited(&self) -> &[ElementId] {
        &self.order
    }

    fn walk(&mut self, root: ElementId) -> Result<()> {
        let resolver = self.resolver;
        if !self.visited.contains(&root) && resolver.resolve_action(root).is_none() {
            return Err(ValidationError::DanglingActionReference {
                action: root,
                label: root.to_string(),
                role: "root",
                target: root,
            });
        }

        let mut stack = vec![Step::Visit(root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(id) => {
                    if !self.visited.insert(id) {
                        continue;
                    }
                    let Some(action) = resolver.resolve_action(id) else {
                        continue;
                    };
                    trace!(action = %id, behavior = action.behavior().name(), "visit action");
                    self.order.push(id);

                    check_references(resolver, &action)?;
                    stack.push(Step::Rules(action));
                    stack.extend(
                        action
                            .successions()
                            .to_vec()
                            .into_iter()
                            .rev()
                            .map(|successor| Step::Follow { from: action, successor }),
                    );
                }
                Step::Follow { from, successor } => {
                    if resolver.resolve_action(successor).is_none() {
                        return Err(ValidationError::DanglingSuccessor {
                            action: from.id(),
                            label: from.label(),
                            successor,
                        });
                    }
                    stack.push(Step::Visit(successor));
                }
                Step::Rules(action) => {
                    check_behavior(resolver, &action)?;
                    stack.extend(children(&action).into_iter().rev().map(Step::Visit));
                }
            }
        }
        Ok(())
    }
}

/// Pending work of the walk. Successor subtrees are walked between an
/// action's reference checks and its behaviour rules.
enum Step<'r> {
    Visit(ElementId),
    Follow {
        from: ActionView<'r>,
        successor: ElementId,
    },
    Rules(ActionView<'r>),
}

/// The actions an action descends into once its rules hold, in visit order.
/// Successors are not included; they are walked first.
fn children(action: &ActionView<'_>) -> Vec<ElementId> {
    let mut out: Vec<ElementId> = action.body().to_vec();
    match action.behavior() {
        ActionBehavior::Basic => {}
        ActionBehavior::Conditional(branches) => {
            for branch in branches {
                out.extend(&branch.actions);
            }
        }
        ActionBehavior::Loop(spec) => {
            out.extend(&spec.init);
            out.extend(&spec.body);
            out.extend(&spec.update);
        }
        ActionBehavior::Invocation(invocation) => {
            out.extend(invocation.target);
        }
    }
    out
}

/// Parameters, preconditions and postconditions.
fn check_references(resolver: &dyn ActionResolver, action: &ActionView<'_>) -> Result<()> {
    for parameter in action.parameters() {
        if resolver.resolve_parameter(parameter).is_none() {
            return Err(dangling_parameter(action, ParameterRole::Parameter, parameter));
        }
    }
    for (role, ids) in [
        ("precondition", action.preconditions()),
        ("postcondition", action.postconditions()),
    ] {
        for target in ids {
            if resolver.resolve_element(target).is_none() {
                return Err(ValidationError::DanglingReference {
                    element: action.id(),
                    label: action.label(),
                    role,
                    target,
                });
            }
        }
    }
    Ok(())
}

/// Body resolution and the conditional, loop and invocation rules.
fn check_behavior(resolver: &dyn ActionResolver, action: &ActionView<'_>) -> Result<()> {
    check_actions_resolve(resolver, action, "body", action.body())?;

    match action.behavior() {
        ActionBehavior::Basic => Ok(()),
        ActionBehavior::Conditional(branches) => check_conditional(resolver, action, branches),
        ActionBehavior::Loop(spec) => check_loop(resolver, action, spec),
        ActionBehavior::Invocation(invocation) => check_invocation(resolver, action, invocation),
    }
}

fn check_actions_resolve(
    resolver: &dyn ActionResolver,
    action: &ActionView<'_>,
    role: &'static str,
    ids: &IdList,
) -> Result<()> {
    for target in ids {
        if resolver.resolve_action(target).is_none() {
            return Err(ValidationError::DanglingActionReference {
                action: action.id(),
                label: action.label(),
                role,
                target,
            });
        }
    }
    Ok(())
}

fn check_conditional(
    resolver: &dyn ActionResolver,
    action: &ActionView<'_>,
    branches: &[Branch],
) -> Result<()> {
    if branches.is_empty() {
        return Err(ValidationError::MissingBranches {
            action: action.id(),
            label: action.label(),
        });
    }
    let else_count = branches.iter().filter(|b| b.is_else).count();
    if else_count > 1 {
        return Err(ValidationError::MultipleElseBranches {
            action: action.id(),
            label: action.label(),
            count: else_count,
        });
    }
    for (index, branch) in branches.iter().enumerate() {
        if !branch.is_else && !has_text(&branch.condition) {
            return Err(ValidationError::BranchWithoutCondition {
                action: action.id(),
                label: action.label(),
                branch: index,
            });
        }
        if branch.actions.is_empty() {
            return Err(ValidationError::EmptyBranch {
                action: action.id(),
                label: action.label(),
                branch: index,
            });
        }
        check_actions_resolve(resolver, action, "branch", &branch.actions)?;
    }
    Ok(())
}

fn check_loop(resolver: &dyn ActionResolver, action: &ActionView<'_>, spec: &LoopSpec) -> Result<()> {
    let id = action.id();
    if spec.kind.needs_condition() && !has_text(&spec.condition) {
        return Err(ValidationError::MissingLoopCondition {
            action: id,
            label: action.label(),
            kind: spec.kind,
        });
    }
    match spec.kind {
        LoopKind::While | LoopKind::Until => {}
        LoopKind::ForCount => {
            if spec.init.is_empty() {
                return Err(ValidationError::MissingLoopInit {
                    action: id,
                    label: action.label(),
                });
            }
            if spec.update.is_empty() {
                return Err(ValidationError::MissingLoopUpdate {
                    action: id,
                    label: action.label(),
                });
            }
        }
        LoopKind::ForEach => {
            if !has_text(&spec.collection) {
                return Err(ValidationError::MissingLoopCollection {
                    action: id,
                    label: action.label(),
                });
            }
            let Some(iterator) = spec.iterator else {
                return Err(ValidationError::MissingLoopIterator {
                    action: id,
                    label: action.label(),
                });
            };
            if resolver.resolve_parameter(iterator).is_none() {
                return Err(dangling_parameter(action, ParameterRole::Iterator, iterator));
            }
        }
    }
    if spec.body.is_empty() {
        return Err(ValidationError::EmptyLoopBody {
            action: id,
            label: action.label(),
            kind: spec.kind,
        });
    }
    check_actions_resolve(resolver, action, "loop init", &spec.init)?;
    check_actions_resolve(resolver, action, "loop body", &spec.body)?;
    check_actions_resolve(resolver, action, "loop update", &spec.update)
}

fn check_invocation(
    resolver: &dyn ActionResolver,
    action: &ActionView<'_>,
    invocation: &Invocation,
) -> Result<()> {
    let Some(target) = invocation.target else {
        return Err(ValidationError::MissingInvocationTarget {
            action: action.id(),
            label: action.label(),
        });
    };
    if resolver.resolve_action(target).is_none() {
        return Err(ValidationError::DanglingActionReference {
            action: action.id(),
            label: action.label(),
            role: "invocation target",
            target,
        });
    }
    for (&source, &bound) in &invocation.mapping {
        if resolver.resolve_parameter(source).is_none() {
            return Err(dangling_parameter(action, ParameterRole::MappingSource, source));
        }
        if resolver.resolve_parameter(bound).is_none() {
            return Err(dangling_parameter(action, ParameterRole::MappingTarget, bound));
        }
    }
    Ok(())
}

fn dangling_parameter(
    action: &ActionView<'_>,
    role: ParameterRole,
    parameter: ElementId,
) -> ValidationError {
    ValidationError::DanglingParameter {
        action: action.id(),
        label: action.label(),
        role,
        parameter,
    }
}

/// Validate an action forest, stopping at the first failure.
pub fn validate_action_hierarchy(roots: &[ElementId], resolver: &dyn ActionResolver) -> Result<()> {
    ActionHierarchyValidator::new(resolver).validate(roots)
}
