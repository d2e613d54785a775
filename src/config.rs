use std::str::FromStr;
use std::time::Duration;

use envconfig::Envconfig;

/// Long outer budget for draining a revoke: workers get real time to flush in-flight messages
/// before the manager gives up waiting and moves on.
pub const REVOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Throttle applied after a fatal exit, so the enclosing supervisor doesn't spin.
pub const FATAL_EXIT_COOLDOWN: Duration = Duration::from_secs(2);

/// How long the event loop can go without processing anything before `ManagerHealth` reports
/// unhealthy. Generous relative to normal event latency, since a synchronous lifecycle hook is
/// allowed to run long.
pub const HEALTH_DEADLINE: Duration = Duration::from_secs(60);

/// Bound on the manager's event mailbox. Acks are the high-volume producer; this is sized well
/// above normal in-flight ack counts so `try_send` backpressure is a real signal, not noise.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Envconfig, Clone, Debug)]
pub struct ManagerConfig {
    /// Identity for the registry and shared state.
    #[envconfig(from = "KAFKA_GROUP_MANAGER_NAME")]
    pub name: String,

    #[envconfig(from = "KAFKA_BROKERS")]
    pub brokers: String,

    #[envconfig(from = "KAFKA_GROUP")]
    pub group: String,

    #[envconfig(from = "KAFKA_TOPICS")]
    pub topics: CommaSeparated,

    /// Bypass the coordinator and commit offsets directly, tagged with the member id.
    #[envconfig(from = "KAFKA_DIRECT_ACK", default = "false")]
    pub direct_ack: bool,

    #[envconfig(nested = true)]
    pub fetch: FetchConfig,
}

/// Passed through to the per-partition worker's fetch engine; the manager itself never reads
/// these values, it only plumbs them into `WorkerInit`.
#[derive(Envconfig, Clone, Debug)]
pub struct FetchConfig {
    #[envconfig(default = "1")]
    pub min_bytes: i32,

    #[envconfig(default = "52428800")]
    pub max_bytes: i32,

    #[envconfig(default = "500")]
    pub max_wait_time_ms: i32,

    #[envconfig(default = "1")]
    pub sleep_timeout_ms: i32,

    #[envconfig(default = "10")]
    pub prefetch_count: i32,

    #[envconfig(default = "104857600")]
    pub prefetch_bytes: i32,

    // earliest, latest
    #[envconfig(default = "earliest")]
    pub offset_reset_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommaSeparated(pub Vec<String>);

#[derive(Debug, PartialEq, Eq)]
pub struct EmptyTopicListError;

impl FromStr for CommaSeparated {
    type Err = EmptyTopicListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let topics: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();
        if topics.is_empty() {
            Err(EmptyTopicListError)
        } else {
            Ok(CommaSeparated(topics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_topics() {
        let parsed: CommaSeparated = " a, b ,c".parse().unwrap();
        assert_eq!(parsed.0, vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_empty_topic_list() {
        assert_eq!("".parse::<CommaSeparated>(), Err(EmptyTopicListError));
        assert_eq!(" , ".parse::<CommaSeparated>(), Err(EmptyTopicListError));
    }
}
