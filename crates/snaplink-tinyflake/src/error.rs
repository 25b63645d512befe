use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

/// Errors returned by Tinyflake initialization and id generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid node id {node_id}; expected 0..={max_node_id}")]
    InvalidNodeId { node_id: u8, max_node_id: u8 },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("clock moved backward by {drift:#}, tolerance is {tolerance:#}")]
    ClockMovedBackward {
        drift: SignedDuration,
        tolerance: SignedDuration,
    },
    #[error("timestamp field exhausted: {elapsed}s since epoch")]
    OverTimeLimit { elapsed: i64 },
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
