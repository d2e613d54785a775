use crate::types::{GenerationId, MonitorToken, TopicPartition, WorkerId};

/// One running worker: identity, monitoring token, generation, assignment coordinates, and the
/// next offset it should consume.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    pub identity: WorkerId,
    pub monitor_token: MonitorToken,
    pub generation_id: GenerationId,
    pub topic: String,
    pub partition: i32,
    /// The next offset to consume. Initialized to the assignment's `begin_offset`, advanced on
    /// every successful ack. Monotonically non-decreasing within one generation.
    pub latest_offset: i64,
}

impl WorkerHandle {
    pub fn topic_partition(&self) -> TopicPartition {
        TopicPartition::new(self.topic.clone(), self.partition)
    }
}
