use std::collections::HashMap;

use crate::error::ManagerError;
use crate::types::{GenerationId, MonitorToken, TopicPartition};
use crate::worker::WorkerHandle;

/// In-memory mapping `(topic, partition) -> WorkerHandle`.
///
/// All operations are pure and non-blocking; the manager is the sole owner and mutator. Keyed by
/// `(topic, partition)` because that's the natural Kafka identity — reverse lookup by monitor
/// token only happens on worker death, so a linear scan there is fine.
#[derive(Debug, Default)]
pub struct WorkerTable {
    handles: HashMap<TopicPartition, WorkerHandle>,
}

impl WorkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Overwrite any prior entry for the key.
    pub fn insert(&mut self, handle: WorkerHandle) {
        self.handles.insert(handle.topic_partition(), handle);
    }

    /// Sets `latest_offset = acked_offset + 1`. Fails if the key is absent: an ack for an
    /// unassigned partition is a protocol violation, not a recoverable condition.
    pub fn update_offset(
        &mut self,
        tp: &TopicPartition,
        acked_offset: i64,
    ) -> Result<(), ManagerError> {
        let handle = self
            .handles
            .get_mut(tp)
            .ok_or_else(|| ManagerError::UnassignedPartitionAck(tp.clone()))?;
        handle.latest_offset = acked_offset + 1;
        Ok(())
    }

    pub fn get_generation(&self, tp: &TopicPartition) -> Result<GenerationId, ManagerError> {
        self.handles
            .get(tp)
            .map(|h| h.generation_id)
            .ok_or_else(|| ManagerError::UnassignedPartitionAck(tp.clone()))
    }

    /// Linear scan for the handle whose monitor token matches. Rare path (only on worker death).
    pub fn find_by_monitor(&self, token: MonitorToken) -> Option<&WorkerHandle> {
        self.handles.values().find(|h| h.monitor_token == token)
    }

    /// Returns all handles and leaves the table empty.
    pub fn drain(&mut self) -> Vec<WorkerHandle> {
        self.handles.drain().map(|(_, handle)| handle).collect()
    }

    pub fn get(&self, tp: &TopicPartition) -> Option<&WorkerHandle> {
        self.handles.get(tp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkerId;

    fn handle(topic: &str, partition: i32, token: MonitorToken, gen: GenerationId) -> WorkerHandle {
        WorkerHandle {
            identity: WorkerId(format!("{topic}-{partition}")),
            monitor_token: token,
            generation_id: gen,
            topic: topic.to_string(),
            partition,
            latest_offset: 0,
        }
    }

    #[test]
    fn insert_overwrites_prior_entry_for_key() {
        let mut table = WorkerTable::new();
        table.insert(handle("t", 0, 1, 7));
        table.insert(handle("t", 0, 2, 7));
        assert_eq!(table.len(), 1);
        let tp = TopicPartition::new("t", 0);
        assert_eq!(table.get(&tp).unwrap().monitor_token, 2);
    }

    #[test]
    fn update_offset_advances_past_acked() {
        let mut table = WorkerTable::new();
        table.insert(handle("t", 0, 1, 7));
        let tp = TopicPartition::new("t", 0);
        table.update_offset(&tp, 103).unwrap();
        assert_eq!(table.get(&tp).unwrap().latest_offset, 104);
    }

    #[test]
    fn update_offset_fails_for_unassigned_partition() {
        let mut table = WorkerTable::new();
        let tp = TopicPartition::new("t", 0);
        let err = table.update_offset(&tp, 1).unwrap_err();
        assert!(matches!(err, ManagerError::UnassignedPartitionAck(_)));
    }

    #[test]
    fn get_generation_returns_the_handles_generation() {
        let mut table = WorkerTable::new();
        table.insert(handle("t", 0, 1, 7));
        let tp = TopicPartition::new("t", 0);
        assert_eq!(table.get_generation(&tp).unwrap(), 7);
    }

    #[test]
    fn get_generation_fails_for_unassigned_partition() {
        let table = WorkerTable::new();
        let tp = TopicPartition::new("t", 0);
        let err = table.get_generation(&tp).unwrap_err();
        assert!(matches!(err, ManagerError::UnassignedPartitionAck(_)));
    }

    #[test]
    fn find_by_monitor_scans_for_matching_token() {
        let mut table = WorkerTable::new();
        table.insert(handle("t", 0, 11, 7));
        table.insert(handle("t", 1, 22, 7));
        assert_eq!(table.find_by_monitor(22).unwrap().partition, 1);
        assert!(table.find_by_monitor(99).is_none());
    }

    #[test]
    fn drain_empties_the_table() {
        let mut table = WorkerTable::new();
        table.insert(handle("t", 0, 1, 7));
        table.insert(handle("t", 1, 2, 7));
        let drained = table.drain();
        assert_eq!(drained.len(), 2);
        assert!(table.is_empty());
    }
}
