//! Metric names instrumented at the manager's event-handling seams. Kept as constants so the
//! call sites in `manager.rs` and `ack_router.rs` don't drift from each other.

pub const WORKERS_STARTED: &str = "kafka_group_manager_workers_started_total";
pub const WORKERS_RESTARTED: &str = "kafka_group_manager_workers_restarted_total";
pub const ACKS_APPLIED: &str = "kafka_group_manager_acks_applied_total";
pub const ACKS_DROPPED: &str = "kafka_group_manager_acks_dropped_total";
pub const REVOKE_DURATION_SECONDS: &str = "kafka_group_manager_revoke_duration_seconds";
pub const WORKERS_ASSIGNED: &str = "kafka_group_manager_workers_assigned";
