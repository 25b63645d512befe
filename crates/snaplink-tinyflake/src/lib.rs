//! Sortable 48-bit ids in the style of Sonyflake.
//!
//! A [`TinyId`] packs whole seconds since a custom epoch, a per-second
//! sequence and a node index. [`Tinyflake`] hands them out in strictly
//! increasing order for a given node.

mod clock;
pub mod error;
mod tiny_id;
mod tinyflake;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use tiny_id::TinyId;
pub use tinyflake::{Tinyflake, TinyflakeSettings, MAX_NODE_ID};
