//! A model shared between threads.
//!
//! Edits take the write lock for the duration of one closure; validation and
//! queries take the read lock. Each edit gets a fresh [`ChangeTracker`], which
//! is handed back so callers can re-validate exactly what changed.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::editing::ChangeTracker;
use crate::model::Model;
use crate::validate::{Report, ValidationError, ValidationOptions, validate_model};

#[derive(Clone, Debug, Default)]
pub struct SharedModel {
    inner: Arc<RwLock<Model>>,
}

impl SharedModel {
    pub fn new(model: Model) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// Run one logical edit under the write lock.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Model, &mut ChangeTracker) -> R) -> (R, ChangeTracker) {
        let mut tracker = ChangeTracker::new();
        let mut model = self.inner.write();
        let value = f(&mut model, &mut tracker);
        debug!(dirty = tracker.dirty_elements().len(), "edit applied");
        (value, tracker)
    }

    /// Run one logical edit, then re-validate what it touched before any
    /// other writer gets in.
    pub fn edit_validated<R>(
        &self,
        options: ValidationOptions,
        f: impl FnOnce(&mut Model, &mut ChangeTracker) -> R,
    ) -> (R, Result<Report, ValidationError>) {
        let mut tracker = ChangeTracker::new();
        let mut model = self.inner.write();
        let value = f(&mut model, &mut tracker);
        let model = RwLockWriteGuard::downgrade(model);
        let report = tracker.validate_dirty(&model, options);
        (value, report)
    }

    /// Validate the whole model under the read lock.
    pub fn validate(&self, options: ValidationOptions) -> Result<Report, ValidationError> {
        validate_model(&self.inner.read(), options)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Model> {
        self.inner.read()
    }

    /// A copy of the current model.
    pub fn snapshot(&self) -> Model {
        self.inner.read().clone()
    }
}

impl From<Model> for SharedModel {
    fn from(model: Model) -> Self {
        Self::new(model)
    }
}
