use std::sync::Arc;

use crate::direct_ack::DirectAcknowledger;
use crate::manager::ManagerHandle;
use crate::metrics::{ACKS_APPLIED, ACKS_DROPPED};
use crate::registry::AssignmentRegistry;
use crate::types::GenerationId;

/// Caller-facing entry point for application acks. Not serialized through the manager: routing
/// decisions here run on whatever thread the application calls from, gated only by the
/// [`AssignmentRegistry`]'s lock-free snapshot.
pub struct AckRouter {
    registry: Arc<AssignmentRegistry>,
    manager: ManagerHandle,
    direct_acknowledger: Option<Arc<dyn DirectAcknowledger>>,
}

impl AckRouter {
    pub fn new(
        registry: Arc<AssignmentRegistry>,
        manager: ManagerHandle,
        direct_acknowledger: Option<Arc<dyn DirectAcknowledger>>,
    ) -> Self {
        Self {
            registry,
            manager,
            direct_acknowledger,
        }
    }

    /// `consumer_name` identifies the calling application record; it is not consulted for
    /// routing, only carried through for tracing.
    pub async fn ack(
        &self,
        consumer_name: &str,
        topic: &str,
        partition: i32,
        generation_id: GenerationId,
        offset: i64,
    ) {
        if self.registry.direct_ack() {
            self.ack_direct(consumer_name, topic, partition, generation_id, offset)
                .await;
        } else {
            self.manager
                .ack(topic.to_string(), partition, generation_id, offset);
        }
    }

    async fn ack_direct(
        &self,
        consumer_name: &str,
        topic: &str,
        partition: i32,
        generation_id: GenerationId,
        offset: i64,
    ) {
        let Some((member_id, assigned_generation_id)) = self.registry.current_assignment() else {
            tracing::warn!(
                name = consumer_name,
                topic,
                partition,
                "dropping direct ack, no active assignment"
            );
            metrics::counter!(ACKS_DROPPED).increment(1);
            return;
        };
        if assigned_generation_id != generation_id {
            tracing::warn!(
                name = consumer_name,
                topic,
                partition,
                ack_generation = generation_id,
                assigned_generation = assigned_generation_id,
                "dropping direct ack for stale generation"
            );
            metrics::counter!(ACKS_DROPPED).increment(1);
            return;
        }
        let Some(acknowledger) = self.direct_acknowledger.as_ref() else {
            tracing::warn!(
                name = consumer_name,
                topic,
                partition,
                "direct ack requested but no acknowledger configured"
            );
            metrics::counter!(ACKS_DROPPED).increment(1);
            return;
        };
        acknowledger
            .ack(&member_id, topic, partition, generation_id, offset)
            .await;
        metrics::counter!(ACKS_APPLIED).increment(1);
    }
}
