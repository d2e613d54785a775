use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::GenerationId;

#[derive(Clone, Default)]
struct RegistrySnapshot {
    assignments: Option<(Arc<str>, GenerationId)>,
}

/// Process-wide shared cell holding `(member_id, current_generation)`.
///
/// Single writer (the [`crate::manager::Manager`]), many readers (ack routers on arbitrary
/// caller threads). Implemented as an atomically swappable snapshot behind a `parking_lot`
/// `RwLock` rather than an `async` lock, since the ack path is latency-sensitive and reads must
/// never block on manager activity.
pub struct AssignmentRegistry {
    direct_ack: bool,
    snapshot: RwLock<RegistrySnapshot>,
}

impl AssignmentRegistry {
    pub fn new(direct_ack: bool) -> Arc<Self> {
        Arc::new(Self {
            direct_ack,
            snapshot: RwLock::new(RegistrySnapshot::default()),
        })
    }

    /// Written once at init, never changes afterwards.
    pub fn direct_ack(&self) -> bool {
        self.direct_ack
    }

    pub fn set_assignment(&self, member_id: Arc<str>, generation_id: GenerationId) {
        *self.snapshot.write() = RegistrySnapshot {
            assignments: Some((member_id, generation_id)),
        };
    }

    pub fn clear_assignment(&self) {
        *self.snapshot.write() = RegistrySnapshot::default();
    }

    pub fn current_assignment(&self) -> Option<(Arc<str>, GenerationId)> {
        self.snapshot.read().assignments.clone()
    }
}
