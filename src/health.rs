use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Liveness signal for the manager's single long-lived actor.
///
/// A trimmed-down relative of `common/health`'s `HealthRegistry`/`HealthHandle` pair: that one
/// tracks an arbitrary number of independently-reporting components behind an mpsc-fed registry,
/// which is more than this crate needs since it only ever has one component (the manager's event
/// loop). A single atomic timestamp with a fixed deadline captures the same "did this report
/// recently enough" check without the registry machinery. Has no HTTP surface of its own —
/// serving `/healthz` is the embedding service's job, out of scope here.
#[derive(Clone)]
pub struct ManagerHealth {
    last_heartbeat_millis: Arc<AtomicI64>,
    deadline: Duration,
}

impl ManagerHealth {
    pub fn new(deadline: Duration) -> Self {
        let health = Self {
            last_heartbeat_millis: Arc::new(AtomicI64::new(0)),
            deadline,
        };
        health.report_healthy();
        health
    }

    /// Call on every processed event; cheap enough to call unconditionally.
    pub fn report_healthy(&self) {
        let now = now_millis();
        self.last_heartbeat_millis.store(now, Ordering::Relaxed);
    }

    pub fn is_healthy(&self) -> bool {
        let last = self.last_heartbeat_millis.load(Ordering::Relaxed);
        let elapsed = now_millis().saturating_sub(last);
        elapsed <= self.deadline.as_millis() as i64
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_immediately_after_construction() {
        let health = ManagerHealth::new(Duration::from_secs(30));
        assert!(health.is_healthy());
    }

    #[test]
    fn unhealthy_once_deadline_in_the_past() {
        let health = ManagerHealth::new(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(!health.is_healthy());
    }
}
