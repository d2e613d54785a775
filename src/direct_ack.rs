use async_trait::async_trait;

use crate::types::GenerationId;

/// Bypasses the coordinator and commits offsets directly, tagged with the member id.
///
/// Trades ack latency (one fewer hop through the manager) for a weaker guarantee: it does not
/// advance the local prefetch window or the tracked offset, relying on this collaborator for
/// durability.
#[async_trait]
pub trait DirectAcknowledger: Send + Sync {
    async fn ack(
        &self,
        member_id: &str,
        topic: &str,
        partition: i32,
        generation_id: GenerationId,
        offset: i64,
    );
}
