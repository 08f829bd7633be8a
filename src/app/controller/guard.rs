//! RAII bracket around one named operation

use tracing::{debug, warn};

use crate::app::session::{OperationFailure, OperationKind, OperationTransition, SessionStore};
use crate::errors::GatewayError;

/// Marks an operation in flight for as long as it lives
///
/// Creation records `Started` (clearing the previous error); drop records
/// `Finished`. Because the finish happens in `Drop`, the loading flag clears
/// on every exit path, including early returns and a dropped future.
#[must_use = "dropping the guard immediately ends the operation"]
pub(crate) struct OperationGuard<'a> {
    store: &'a SessionStore,
    kind: OperationKind,
}

impl<'a> OperationGuard<'a> {
    pub(crate) fn start(store: &'a SessionStore, kind: OperationKind) -> Self {
        debug!("Operation {} started", kind);
        store.set_operation_state(OperationTransition::Started(kind));
        Self { store, kind }
    }

    /// Record a failure for this operation and hand it back to the caller
    pub(crate) fn fail(&self, error: &GatewayError) -> OperationFailure {
        let failure = OperationFailure::new(self.kind, error);
        warn!(
            "Operation {} failed ({}): {}",
            self.kind,
            failure.kind.code(),
            error
        );
        self.store
            .set_operation_state(OperationTransition::Failed(failure.clone()));
        failure
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.store
            .set_operation_state(OperationTransition::Finished(self.kind));
        debug!("Operation {} settled", self.kind);
    }
}
