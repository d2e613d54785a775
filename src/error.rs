use thiserror::Error;

use crate::types::TopicPartition;

/// Errors raised while driving the group manager.
///
/// Most variants are fatal to the [`crate::manager::Manager`] actor: they propagate out of its
/// event loop and the caller's supervisor is expected to restart the whole subtree, mirroring
/// the "local recovery only for generation mismatches and worker crashes" propagation policy.
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    #[error("assignment_received_handler rejected {partition}: {reason}")]
    LifecycleHookFailed {
        partition: TopicPartition,
        reason: String,
    },

    #[error("assignments_revoked_handler failed: {0}")]
    RevokeHookFailed(String),

    #[error("ack for unassigned partition {0}")]
    UnassignedPartitionAck(TopicPartition),

    #[error(
        "assignments_received called with {stale_workers} worker(s) still in the table; \
         a revoke must precede every assignment cycle"
    )]
    AssignmentWithoutRevoke { stale_workers: usize },

    #[error("group coordinator rejected ack: {0}")]
    Coordinator(String),

    #[error("worker supervisor error: {0}")]
    Supervisor(String),
}
