use async_trait::async_trait;

use crate::types::{Assignment, GenerationId};

/// Fired once per assignment on every `assignments_received`. Runs inline on the manager's event
/// loop — its latency is the user's responsibility, and its failure is fatal (see
/// [`crate::error::ManagerError::LifecycleHookFailed`]). Not spawned, so that the ordering
/// between hook outcome and worker start stays unambiguous.
#[async_trait]
pub trait AssignmentReceivedHandler: Send + Sync {
    async fn handle(
        &self,
        group: &str,
        assignment: &Assignment,
        generation_id: GenerationId,
    ) -> Result<(), String>;
}

/// Fired once per revoke, after all workers have been asked to stop. Its failure is not caught
/// by the manager and propagates as fatal, the same as a coordinator crash.
#[async_trait]
pub trait AssignmentsRevokedHandler: Send + Sync {
    async fn handle(&self) -> Result<(), String>;
}

/// Default `assignment_received_handler`: accept every assignment unconditionally.
pub struct AcceptAllAssignments;

#[async_trait]
impl AssignmentReceivedHandler for AcceptAllAssignments {
    async fn handle(
        &self,
        _group: &str,
        _assignment: &Assignment,
        _generation_id: GenerationId,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Default `assignments_revoked_handler`: no-op.
pub struct NoopRevokeHandler;

#[async_trait]
impl AssignmentsRevokedHandler for NoopRevokeHandler {
    async fn handle(&self) -> Result<(), String> {
        Ok(())
    }
}
