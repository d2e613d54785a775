//! Consumer-group manager core for a Kafka client: group-membership state machine, per-partition
//! worker lifecycle, and ack routing, with the wire protocol, worker fetch loop, and process
//! supervision consumed as external collaborators.
//!
//! [`manager::Manager`] is the actor; [`manager::spawn_with_ack_router`] is the usual entry
//! point, bundling it with an [`ack_router::AckRouter`] that shares its [`registry::AssignmentRegistry`].

pub mod ack_router;
pub mod config;
pub mod coordinator;
pub mod direct_ack;
pub mod error;
pub mod health;
pub mod hooks;
pub mod manager;
pub mod metrics;
pub mod registry;
pub mod supervisor;
pub mod types;
pub mod worker;
pub mod worker_table;

pub use ack_router::AckRouter;
pub use config::ManagerConfig;
pub use error::ManagerError;
pub use manager::{spawn_with_ack_router, Manager, ManagerHandle};
pub use registry::AssignmentRegistry;
pub use types::{Assignment, GenerationId, TopicPartition, WorkerId};
