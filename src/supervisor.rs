use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::config::FetchConfig;
use crate::error::ManagerError;
use crate::types::{GenerationId, WorkerId};

/// Arguments used to start one worker, composed by the manager from an assignment plus the
/// manager's own configuration.
#[derive(Debug, Clone)]
pub struct WorkerInit {
    pub topic: String,
    pub partition: i32,
    pub generation_id: GenerationId,
    pub begin_offset: i64,
    pub group: String,
    pub fetch: FetchConfig,
}

/// A freshly started worker: its identity, plus a channel that resolves once the worker has
/// terminated (crashed or stopped). The manager multiplexes this completion into its own event
/// loop rather than polling.
pub struct WorkerProcess {
    pub identity: WorkerId,
    pub exit: oneshot::Receiver<()>,
}

/// Dynamically starts and stops worker tasks. The manager only ever requests a start or a
/// graceful stop and observes termination through [`WorkerProcess::exit`] — it never drives the
/// worker's fetch loop itself.
#[async_trait]
pub trait WorkerSupervisor: Send + Sync {
    async fn start_worker(&self, init: WorkerInit) -> Result<WorkerProcess, ManagerError>;

    /// Graceful stop: ask the worker to unsubscribe and shut down, draining in-flight messages.
    async fn stop_worker(&self, identity: &WorkerId);

    /// Acknowledge an offset to the local fetch engine owning `identity`, advancing its prefetch
    /// window. A no-op if the worker has already exited.
    async fn advance_prefetch(&self, identity: &WorkerId, offset: i64);
}
