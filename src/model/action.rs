//! Action payloads: parameters, bodies and control-flow behaviour.
//!
//! An action is either basic or carries exactly one control-flow
//! behaviour:
//!
//! ```text
//! ActionBehavior
//! ├── Basic
//! ├── Conditional  [Branch { condition, actions, is_else }]
//! ├── Loop         LoopSpec { kind, condition, init, update, collection, iterator, body }
//! └── Invocation   { target, mapping: parameter → argument }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error::InvalidLoopKind;
use crate::base::{ElementId, IdList};

/// Action payload shared by action definitions and action usages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionData {
    pub parameters: IdList,
    /// Sub-actions performed by this action.
    pub body: IdList,
    /// Constraint elements that must hold before the action runs.
    pub preconditions: IdList,
    pub postconditions: IdList,
    /// Actions that follow this one.
    pub successions: IdList,
    pub behavior: ActionBehavior,
}

impl ActionData {
    pub fn conditional(branches: impl IntoIterator<Item = Branch>) -> Self {
        Self {
            behavior: ActionBehavior::Conditional(branches.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn looping(spec: LoopSpec) -> Self {
        Self {
            behavior: ActionBehavior::Loop(spec),
            ..Self::default()
        }
    }

    pub fn invoking(invocation: Invocation) -> Self {
        Self {
            behavior: ActionBehavior::Invocation(invocation),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, id: ElementId) -> Self {
        self.parameters.insert(id);
        self
    }

    pub fn with_body(mut self, id: ElementId) -> Self {
        self.body.insert(id);
        self
    }

    pub fn with_succession(mut self, id: ElementId) -> Self {
        self.successions.insert(id);
        self
    }

    pub fn with_precondition(mut self, id: ElementId) -> Self {
        self.preconditions.insert(id);
        self
    }

    pub fn with_postcondition(mut self, id: ElementId) -> Self {
        self.postconditions.insert(id);
        self
    }

    /// Every element id this action refers to, in field order.
    pub fn referenced_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.parameters.to_vec();
        ids.extend(&self.body);
        ids.extend(&self.preconditions);
        ids.extend(&self.postconditions);
        ids.extend(&self.successions);
        match &self.behavior {
            ActionBehavior::Basic => {}
            ActionBehavior::Conditional(branches) => {
                for branch in branches {
                    ids.extend(&branch.actions);
                }
            }
            ActionBehavior::Loop(spec) => {
                ids.extend(&spec.init);
                ids.extend(spec.iterator);
                ids.extend(&spec.body);
                ids.extend(&spec.update);
            }
            ActionBehavior::Invocation(invocation) => {
                ids.extend(invocation.target);
                for (&source, &bound) in &invocation.mapping {
                    ids.push(source);
                    ids.push(bound);
                }
            }
        }
        ids
    }
}

/// Control-flow behaviour of an action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionBehavior {
    #[default]
    Basic,
    Conditional(Vec<Branch>),
    Loop(LoopSpec),
    Invocation(Invocation),
}

impl ActionBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Conditional(_) => "conditional",
            Self::Loop(_) => "loop",
            Self::Invocation(_) => "invocation",
        }
    }
}

/// One arm of a conditional action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    /// Opaque condition text. Absent only on the else branch.
    pub condition: Option<Arc<str>>,
    pub actions: IdList,
    pub is_else: bool,
}

impl Branch {
    /// A guarded branch.
    pub fn when(condition: impl Into<Arc<str>>, actions: impl Into<IdList>) -> Self {
        Self {
            condition: Some(condition.into()),
            actions: actions.into(),
            is_else: false,
        }
    }

    /// The else branch.
    pub fn otherwise(actions: impl Into<IdList>) -> Self {
        Self {
            condition: None,
            actions: actions.into(),
            is_else: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopKind {
    While,
    Until,
    ForCount,
    ForEach,
}

impl LoopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::While => "while",
            Self::Until => "until",
            Self::ForCount => "for-count",
            Self::ForEach => "for-each",
        }
    }

    /// While, until and counted loops are driven by a condition.
    pub fn needs_condition(&self) -> bool {
        !matches!(self, Self::ForEach)
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoopKind {
    type Err = InvalidLoopKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "while" => Ok(Self::While),
            "until" => Ok(Self::Until),
            "for-count" => Ok(Self::ForCount),
            "for-each" => Ok(Self::ForEach),
            other => Err(InvalidLoopKind(other.to_string())),
        }
    }
}

/// Loop description. Which fields are required depends on `kind`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopSpec {
    pub kind: LoopKind,
    pub condition: Option<Arc<str>>,
    pub init: IdList,
    pub update: IdList,
    /// Expression yielding the collection of a for-each loop.
    pub collection: Option<Arc<str>>,
    /// Loop variable of a for-each loop; a parameter element.
    pub iterator: Option<ElementId>,
    pub body: IdList,
}

impl LoopSpec {
    pub fn new(kind: LoopKind) -> Self {
        Self {
            kind,
            condition: None,
            init: IdList::new(),
            update: IdList::new(),
            collection: None,
            iterator: None,
            body: IdList::new(),
        }
    }

    pub fn while_loop(condition: impl Into<Arc<str>>, body: impl Into<IdList>) -> Self {
        Self {
            condition: Some(condition.into()),
            body: body.into(),
            ..Self::new(LoopKind::While)
        }
    }

    pub fn for_each(
        collection: impl Into<Arc<str>>,
        iterator: ElementId,
        body: impl Into<IdList>,
    ) -> Self {
        Self {
            collection: Some(collection.into()),
            iterator: Some(iterator),
            body: body.into(),
            ..Self::new(LoopKind::ForEach)
        }
    }

    pub fn with_condition(mut self, condition: impl Into<Arc<str>>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_init(mut self, id: ElementId) -> Self {
        self.init.insert(id);
        self
    }

    pub fn with_update(mut self, id: ElementId) -> Self {
        self.update.insert(id);
        self
    }

    pub fn with_body(mut self, id: ElementId) -> Self {
        self.body.insert(id);
        self
    }
}

/// A call of another action with parameter bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Invocation {
    pub target: Option<ElementId>,
    /// Target parameter → argument parameter, in binding order.
    pub mapping: IndexMap<ElementId, ElementId>,
}

impl Invocation {
    pub fn of(target: ElementId) -> Self {
        Self {
            target: Some(target),
            mapping: IndexMap::new(),
        }
    }

    pub fn bind(mut self, parameter: ElementId, argument: ElementId) -> Self {
        self.mapping.insert(parameter, argument);
        self
    }
}
