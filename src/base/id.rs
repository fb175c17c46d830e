use std::fmt;

/// Handle for a model element.
///
/// An `ElementId` is the slot index of an element inside the model's
/// arena. Slots are never reused, so an id stays bound to the same element
/// for the element's whole lifetime and resolves to nothing once that
/// element is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u32);

impl ElementId {
    /// Create a handle from a raw slot number.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw slot number.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
