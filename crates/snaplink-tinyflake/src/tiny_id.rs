use modular_bitfield::prelude::*;
use std::fmt;

/// Width of a packed [`TinyId`] in bytes.
pub const TINY_ID_BYTES: usize = 6;

#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TinyId {
    /// 30 bits for timestamp (seconds since a custom epoch, ~34 years).
    pub timestamp: B30,
    /// 16 bits for sequence number (resets every second).
    pub sequence: B16,
    /// 2 bits for node ID (allows up to 4 nodes).
    pub node_id: B2,
}

impl TinyId {
    /// Returns the id as an integer in `[0, 2^48)`.
    ///
    /// Timestamp occupies the high bits, so ids from one node compare in
    /// generation order.
    pub fn as_u64(&self) -> u64 {
        (u64::from(self.timestamp()) << 18)
            | (u64::from(self.sequence()) << 2)
            | u64::from(self.node_id())
    }
}

impl fmt::Debug for TinyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TinyId")
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("node_id", &self.node_id())
            .finish()
    }
}
