use indexmap::IndexSet;

use super::ElementId;

/// An ordered relationship list of element handles.
///
/// Membership is set-like (inserting an id twice keeps one copy) while the
/// insertion order is kept for display and for deterministic traversal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdList(IndexSet<ElementId>);

impl IdList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ElementId) -> bool {
        self.0.insert(id)
    }

    /// Remove an id, keeping the order of the remaining ids.
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.0.shift_remove(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First id in list order.
    pub fn first(&self) -> Option<ElementId> {
        self.0.first().copied()
    }

    /// Id at a list position.
    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.0.get_index(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ElementId> {
        self.iter().collect()
    }
}

impl FromIterator<ElementId> for IdList {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[ElementId; N]> for IdList {
    fn from(ids: [ElementId; N]) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Vec<ElementId>> for IdList {
    fn from(ids: Vec<ElementId>) -> Self {
        ids.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a IdList {
    type Item = ElementId;
    type IntoIter = std::iter::Copied<indexmap::set::Iter<'a, ElementId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
