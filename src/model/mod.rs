//! The element graph: typed elements in an id-indexed arena.
//!
//! Pure data. Editing operations on [`Model`] reject malformed requests
//! (unknown ids, wrong element kind, unparsable text) but never enforce
//! well-formedness of the graph; that is the job of the validators.
//!
//! ```text
//! Model
//! ├── slots: [Option<Element>]        arena, ElementId = slot index
//! ├── by_uuid                         Uuid → ElementId
//! └── usage_index                     Definition → usages typed by it
//! ```

mod action;
mod definition;
mod element;
mod error;
mod graph;
mod resolver;
mod usage;
mod views;

pub use action::{ActionBehavior, ActionData, Branch, Invocation, LoopKind, LoopSpec};
pub use definition::{CaseKind, Definition, DefinitionKind};
pub use element::{
    BoundedList, ClassifierHeader, Direction, Element, ElementData, ElementKind, FeatureHeader,
    Package,
};
pub use error::{InvalidDirection, InvalidLoopKind, ModelError};
pub use graph::{ElementMut, Model, NewElement};
pub use resolver::{ActionResolver, ElementResolver, FnResolver};
pub use usage::{StateData, TransitionData, Usage, UsageKind};
pub use views::{ActionView, StateView, TransitionView};

pub(crate) use usage::has_text;
