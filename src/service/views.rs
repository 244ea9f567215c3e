//! View accounting
//!
//! Counts public reads of a jott. This path is independent of the lifecycle
//! manager's ownership checks: any caller may record a view against a public
//! jott, and the increment is atomic in the store so concurrent viewers
//! never lose a count.

use super::error::CoreError;
use super::stores::DocumentStore;
use crate::domain::JottId;

/// Increments and reports view counts on public reads
pub struct ViewAccounting<S> {
    documents: S,
}

impl<S: DocumentStore> ViewAccounting<S> {
    pub fn new(documents: S) -> Self {
        Self { documents }
    }

    /// Records one view against a public jott, returning the new count
    ///
    /// Private jotts yield `Forbidden` and the counter is untouched. The
    /// publication state does not matter: a public draft is viewable.
    pub fn record_view(&self, id: &JottId) -> Result<u64, CoreError> {
        let jott = self
            .documents
            .find(id)?
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;

        if !jott.is_public() {
            return Err(CoreError::Forbidden(id.clone()));
        }

        self.documents
            .record_view(id)?
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }
}
