use async_trait::async_trait;

use crate::error::ManagerError;
use crate::types::GenerationId;

/// Implements the Kafka group-membership protocol; drives the manager via
/// `assignments_received`/`assignments_revoked` and accepts acks for the generation it owns.
///
/// The wire protocol itself is out of scope here — this trait is the seam the manager talks
/// across.
#[async_trait]
pub trait GroupCoordinatorClient: Send + Sync {
    /// Acknowledge an offset to the group coordinator for `(generation_id, topic, partition)`.
    async fn ack(
        &self,
        generation_id: GenerationId,
        topic: &str,
        partition: i32,
        offset: i64,
    ) -> Result<(), ManagerError>;
}
