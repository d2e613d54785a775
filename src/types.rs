use std::fmt;

/// Kafka group generation epoch. Increments on every rebalance.
pub type GenerationId = i32;

/// Opaque reference to a running worker, used to request its shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerId(pub String);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle such that a termination event carries this token and no other worker's.
///
/// Assigned by the manager itself (not the supervisor) when a worker is started.
pub type MonitorToken = u64;

/// `(topic, partition)` identity, the natural key for everything in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.topic, self.partition)
    }
}

/// A single `(topic, partition, begin_offset)` assignment issued by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub topic: String,
    pub partition: i32,
    pub begin_offset: i64,
}

impl Assignment {
    pub fn topic_partition(&self) -> TopicPartition {
        TopicPartition::new(self.topic.clone(), self.partition)
    }
}
