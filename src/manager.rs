use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinHandle, JoinSet};
use tracing::{error, info, warn};

use crate::ack_router::AckRouter;
use crate::config::{ManagerConfig, EVENT_CHANNEL_CAPACITY, FATAL_EXIT_COOLDOWN, HEALTH_DEADLINE, REVOKE_TIMEOUT};
use crate::coordinator::GroupCoordinatorClient;
use crate::direct_ack::DirectAcknowledger;
use crate::error::ManagerError;
use crate::health::ManagerHealth;
use crate::hooks::{AssignmentReceivedHandler, AssignmentsRevokedHandler};
use crate::metrics::{
    ACKS_APPLIED, ACKS_DROPPED, REVOKE_DURATION_SECONDS, WORKERS_ASSIGNED, WORKERS_RESTARTED,
    WORKERS_STARTED,
};
use crate::registry::AssignmentRegistry;
use crate::supervisor::{WorkerInit, WorkerSupervisor};
use crate::types::{Assignment, GenerationId, MonitorToken, TopicPartition};
use crate::worker::WorkerHandle;
use crate::worker_table::WorkerTable;

enum ManagerEvent {
    AssignmentsReceived {
        member_id: Arc<str>,
        generation_id: GenerationId,
        assignments: Vec<Assignment>,
        reply: oneshot::Sender<Result<(), ManagerError>>,
    },
    Revoke {
        reply: oneshot::Sender<Result<(), ManagerError>>,
    },
    Ack {
        topic: String,
        partition: i32,
        generation_id: GenerationId,
        offset: i64,
    },
}

/// Cheaply cloneable front door to a running [`Manager`]. All methods funnel through the
/// manager's single event queue except [`ManagerHandle::ack`], which is a non-blocking enqueue.
#[derive(Clone)]
pub struct ManagerHandle {
    events: mpsc::Sender<ManagerEvent>,
    registry: Arc<AssignmentRegistry>,
}

impl ManagerHandle {
    async fn call<F>(&self, build: F) -> Result<(), ManagerError>
    where
        F: FnOnce(oneshot::Sender<Result<(), ManagerError>>) -> ManagerEvent,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.events
            .send(build(reply_tx))
            .await
            .map_err(|_| ManagerError::Supervisor("manager event loop has stopped".to_string()))?;
        reply_rx
            .await
            .map_err(|_| ManagerError::Supervisor("manager event loop has stopped".to_string()))?
    }

    pub async fn assignments_received(
        &self,
        member_id: impl Into<Arc<str>>,
        generation_id: GenerationId,
        assignments: Vec<Assignment>,
    ) -> Result<(), ManagerError> {
        let member_id = member_id.into();
        self.call(move |reply| ManagerEvent::AssignmentsReceived {
            member_id,
            generation_id,
            assignments,
            reply,
        })
        .await
    }

    pub async fn revoke_assignments(&self) -> Result<(), ManagerError> {
        self.call(|reply| ManagerEvent::Revoke { reply }).await
    }

    /// Non-blocking: the manager applies the ack asynchronously, filtered by generation (see
    /// §4.2.3 of the design this mirrors). Silently dropped if the mailbox is full or the
    /// manager has already exited — the coordinator will re-deliver.
    pub fn ack(&self, topic: String, partition: i32, generation_id: GenerationId, offset: i64) {
        let event = ManagerEvent::Ack {
            topic,
            partition,
            generation_id,
            offset,
        };
        if self.events.try_send(event).is_err() {
            metrics::counter!(ACKS_DROPPED).increment(1);
            warn!("dropping ack, manager mailbox full or closed");
        }
    }

    pub fn registry(&self) -> &Arc<AssignmentRegistry> {
        &self.registry
    }
}

/// Long-lived single-threaded actor owning the worker table, the current generation, and the
/// lifecycle hooks. Every mutation of its state happens from inside [`Manager::run`], one event
/// at a time — nothing here is shared behind a lock.
pub struct Manager {
    config: ManagerConfig,
    assignment_received_handler: Arc<dyn AssignmentReceivedHandler>,
    assignments_revoked_handler: Arc<dyn AssignmentsRevokedHandler>,
    coordinator: Arc<dyn GroupCoordinatorClient>,
    supervisor: Arc<dyn WorkerSupervisor>,
    registry: Arc<AssignmentRegistry>,
    health: ManagerHealth,
    workers: WorkerTable,
    generation_id: Option<GenerationId>,
    next_monitor_token: MonitorToken,
    monitor_aborts: HashMap<MonitorToken, AbortHandle>,
    exits: JoinSet<MonitorToken>,
    events: mpsc::Receiver<ManagerEvent>,
}

impl Manager {
    /// Spawns the actor and returns a handle plus a join handle carrying its fatal exit reason,
    /// if any, to the embedding supervisor.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        config: ManagerConfig,
        assignment_received_handler: Arc<dyn AssignmentReceivedHandler>,
        assignments_revoked_handler: Arc<dyn AssignmentsRevokedHandler>,
        coordinator: Arc<dyn GroupCoordinatorClient>,
        supervisor: Arc<dyn WorkerSupervisor>,
    ) -> (ManagerHandle, JoinHandle<Result<(), ManagerError>>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let registry = AssignmentRegistry::new(config.direct_ack);

        let handle = ManagerHandle {
            events: events_tx,
            registry: registry.clone(),
        };

        let manager = Manager {
            config,
            assignment_received_handler,
            assignments_revoked_handler,
            coordinator,
            supervisor,
            registry,
            health: ManagerHealth::new(HEALTH_DEADLINE),
            workers: WorkerTable::new(),
            generation_id: None,
            next_monitor_token: 0,
            monitor_aborts: HashMap::new(),
            exits: JoinSet::new(),
            events: events_rx,
        };

        let join_handle = tokio::spawn(manager.run_supervised());
        (handle, join_handle)
    }

    /// Wraps [`Manager::run`] with the post-fatal-exit cooldown, so a restart loop at the
    /// enclosing supervisor can't spin tight.
    async fn run_supervised(self) -> Result<(), ManagerError> {
        let group = self.config.group.clone();
        let result = self.run().await;
        if let Err(ref err) = result {
            error!(group = %group, error = %err, "manager exiting fatally");
            tokio::time::sleep(FATAL_EXIT_COOLDOWN).await;
        }
        result
    }

    pub fn is_healthy(&self) -> bool {
        self.health.is_healthy()
    }

    async fn run(mut self) -> Result<(), ManagerError> {
        info!(group = %self.config.group, topics = ?self.config.topics.0, "manager started");
        loop {
            tokio::select! {
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => self.dispatch(event).await?,
                        None => {
                            info!("manager handle dropped, shutting down");
                            return Ok(());
                        }
                    }
                }
                Some(join_result) = self.exits.join_next(), if !self.exits.is_empty() => {
                    match join_result {
                        Ok(token) => self.handle_worker_down(token).await?,
                        Err(join_err) if join_err.is_cancelled() => {
                            // demonitored during revoke; the worker itself is still being stopped.
                        }
                        Err(join_err) => {
                            return Err(ManagerError::Supervisor(format!(
                                "worker monitor task panicked: {join_err}"
                            )));
                        }
                    }
                }
            }
            self.health.report_healthy();
        }
    }

    async fn dispatch(&mut self, event: ManagerEvent) -> Result<(), ManagerError> {
        match event {
            ManagerEvent::AssignmentsReceived {
                member_id,
                generation_id,
                assignments,
                reply,
            } => {
                let result = self
                    .handle_assignments_received(member_id, generation_id, assignments)
                    .await;
                let _ = reply.send(result.clone());
                result
            }
            ManagerEvent::Revoke { reply } => {
                let result = self.handle_revoke().await;
                let _ = reply.send(result.clone());
                result
            }
            ManagerEvent::Ack {
                topic,
                partition,
                generation_id,
                offset,
            } => self.handle_ack(topic, partition, generation_id, offset).await,
        }
    }

    /// §4.2.1. Two passes on purpose: every assignment must clear the lifecycle hook before any
    /// worker is started, so a rejection midway through leaves no partial worker set behind.
    async fn handle_assignments_received(
        &mut self,
        member_id: Arc<str>,
        generation_id: GenerationId,
        assignments: Vec<Assignment>,
    ) -> Result<(), ManagerError> {
        if !self.workers.is_empty() {
            return Err(ManagerError::AssignmentWithoutRevoke {
                stale_workers: self.workers.len(),
            });
        }

        for assignment in &assignments {
            if let Err(reason) = self
                .assignment_received_handler
                .handle(&self.config.group, assignment, generation_id)
                .await
            {
                return Err(ManagerError::LifecycleHookFailed {
                    partition: assignment.topic_partition(),
                    reason,
                });
            }
        }

        self.registry.set_assignment(member_id, generation_id);

        for assignment in assignments {
            let handle = self.start_worker(generation_id, assignment).await?;
            metrics::counter!(WORKERS_STARTED).increment(1);
            self.workers.insert(handle);
        }
        self.generation_id = Some(generation_id);
        metrics::gauge!(WORKERS_ASSIGNED).set(self.workers.len() as f64);

        Ok(())
    }

    /// §4.2.2. Demonitor happens before the stop request so a worker's graceful exit can't be
    /// mistaken for a crash and trigger a spurious restart.
    async fn handle_revoke(&mut self) -> Result<(), ManagerError> {
        let started = Instant::now();
        let handles = self.workers.drain();

        for handle in &handles {
            if let Some(abort) = self.monitor_aborts.remove(&handle.monitor_token) {
                abort.abort();
            }
            if tokio::time::timeout(REVOKE_TIMEOUT, self.supervisor.stop_worker(&handle.identity))
                .await
                .is_err()
            {
                warn!(
                    topic = %handle.topic,
                    partition = handle.partition,
                    "timed out waiting for worker to stop during revoke"
                );
            }
        }

        if let Err(reason) = self.assignments_revoked_handler.handle().await {
            return Err(ManagerError::RevokeHookFailed(reason));
        }

        self.registry.clear_assignment();
        self.generation_id = None;
        metrics::gauge!(WORKERS_ASSIGNED).set(0.0);
        metrics::histogram!(REVOKE_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        Ok(())
    }

    /// §4.2.3, indirect path. The generation check is the only thing standing between a
    /// straggler ack from a just-revoked generation and a corrupted offset.
    async fn handle_ack(
        &mut self,
        topic: String,
        partition: i32,
        generation_id: GenerationId,
        offset: i64,
    ) -> Result<(), ManagerError> {
        let tp = TopicPartition::new(topic, partition);

        if self.generation_id != Some(generation_id) {
            warn!(
                topic = %tp.topic,
                partition = tp.partition,
                ack_generation = generation_id,
                current_generation = ?self.generation_id,
                "dropping ack for stale generation"
            );
            metrics::counter!(ACKS_DROPPED).increment(1);
            return Ok(());
        }

        self.coordinator
            .ack(generation_id, &tp.topic, tp.partition, offset)
            .await?;

        if let Some(handle) = self.workers.get(&tp) {
            self.supervisor.advance_prefetch(&handle.identity, offset).await;
        }

        self.workers.update_offset(&tp, offset)?;
        metrics::counter!(ACKS_APPLIED).increment(1);

        Ok(())
    }

    /// §4.2.4. A missing handle means the token belonged to a worker already drained by revoke
    /// (demonitored) or already replaced by an earlier crash; both are no-ops.
    async fn handle_worker_down(&mut self, token: MonitorToken) -> Result<(), ManagerError> {
        self.monitor_aborts.remove(&token);

        let Some(handle) = self.workers.find_by_monitor(token).cloned() else {
            return Ok(());
        };

        warn!(
            topic = %handle.topic,
            partition = handle.partition,
            generation = handle.generation_id,
            latest_offset = handle.latest_offset,
            "worker exited, restarting at latest offset"
        );
        metrics::counter!(WORKERS_RESTARTED).increment(1);

        let assignment = Assignment {
            topic: handle.topic.clone(),
            partition: handle.partition,
            begin_offset: handle.latest_offset,
        };
        let replacement = self.start_worker(handle.generation_id, assignment).await?;
        self.workers.insert(replacement);

        Ok(())
    }

    /// §4.2.5.
    async fn start_worker(
        &mut self,
        generation_id: GenerationId,
        assignment: Assignment,
    ) -> Result<WorkerHandle, ManagerError> {
        let init = WorkerInit {
            topic: assignment.topic.clone(),
            partition: assignment.partition,
            generation_id,
            begin_offset: assignment.begin_offset,
            group: self.config.group.clone(),
            fetch: self.config.fetch.clone(),
        };

        let process = self.supervisor.start_worker(init).await?;
        let monitor_token = self.next_monitor_token;
        self.next_monitor_token += 1;

        let exit = process.exit;
        let abort_handle = self.exits.spawn(async move {
            let _ = exit.await;
            monitor_token
        });
        self.monitor_aborts.insert(monitor_token, abort_handle);

        Ok(WorkerHandle {
            identity: process.identity,
            monitor_token,
            generation_id,
            topic: assignment.topic,
            partition: assignment.partition,
            latest_offset: assignment.begin_offset,
        })
    }
}

/// Convenience constructor bundling a [`Manager`] and its [`AckRouter`], since they always share
/// the same registry.
pub fn spawn_with_ack_router(
    config: ManagerConfig,
    assignment_received_handler: Arc<dyn AssignmentReceivedHandler>,
    assignments_revoked_handler: Arc<dyn AssignmentsRevokedHandler>,
    coordinator: Arc<dyn GroupCoordinatorClient>,
    supervisor: Arc<dyn WorkerSupervisor>,
    direct_acknowledger: Option<Arc<dyn DirectAcknowledger>>,
) -> (ManagerHandle, AckRouter, JoinHandle<Result<(), ManagerError>>) {
    let (handle, join_handle) = Manager::spawn(
        config,
        assignment_received_handler,
        assignments_revoked_handler,
        coordinator,
        supervisor,
    );
    let ack_router = AckRouter::new(handle.registry().clone(), handle.clone(), direct_acknowledger);
    (handle, ack_router, join_handle)
}
