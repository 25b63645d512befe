use crate::{
    clock::{Clock, SystemClock},
    error::Error,
    TinyId,
};
use jiff::{SignedDuration, Timestamp};
use std::sync::Mutex;
use typed_builder::TypedBuilder;

const MAX_TIMESTAMP_SECONDS: i64 = (1_i64 << 30) - 1;
const MAX_SEQUENCE: u16 = u16::MAX;
/// Largest node index that fits the 2-bit node field.
pub const MAX_NODE_ID: u8 = 0b11;

/// Configures a Tinyflake generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct TinyflakeSettings {
    /// A unique node index in the range `[0, 3]`.
    pub node_id: u8,
    /// Custom epoch used as the zero point for the 30-bit timestamp field.
    ///
    /// Only whole seconds are modeled (`Timestamp::as_second`).
    pub start_epoch: Timestamp,
    /// How far the clock may step backward before `next_id` gives up
    /// instead of waiting for it to catch up.
    #[builder(default = SignedDuration::from_secs(5))]
    pub max_backward_drift: SignedDuration,
}

#[derive(Debug, Default)]
struct GeneratorState {
    last: Option<Timestamp>,
    sequence: u16,
}

/// Tinyflake ID generator with Sonyflake-style wait-on-overflow semantics.
pub struct Tinyflake<C: Clock> {
    start_time: Timestamp,
    node_id: u8,
    max_backward_drift: SignedDuration,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl Tinyflake<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: TinyflakeSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Tinyflake<C> {
    /// Creates a generator reading time from `clock`.
    pub fn with_clock(settings: TinyflakeSettings, clock: C) -> Result<Self, Error> {
        if settings.node_id > MAX_NODE_ID {
            return Err(Error::InvalidNodeId {
                node_id: settings.node_id,
                max_node_id: MAX_NODE_ID,
            });
        }

        let now = clock.now();
        if settings.start_epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.start_epoch,
                now,
            });
        }

        Ok(Self {
            start_time: settings.start_epoch,
            node_id: settings.node_id,
            max_backward_drift: settings.max_backward_drift,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    /// Generates the next unique TinyId.
    ///
    /// - per-second sequence exhausted: wait for the next second
    /// - clock moved backward within tolerance: wait until it catches up
    /// - clock moved backward beyond tolerance: [`Error::ClockMovedBackward`]
    pub fn next_id(&self) -> Result<TinyId, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let mut now = self.clock.now();

        if let Some(last) = state.last {
            if now < last {
                let drift = last.duration_since(now);
                if drift > self.max_backward_drift {
                    return Err(Error::ClockMovedBackward {
                        drift,
                        tolerance: self.max_backward_drift,
                    });
                }
                self.clock.wait_until(last);
                now = self.clock.now();
            }

            if now.as_second() == last.as_second() {
                if state.sequence < MAX_SEQUENCE {
                    state.sequence += 1;
                } else {
                    let next_second = Timestamp::from_second(last.as_second() + 1).map_err(
                        |_| Error::OverTimeLimit {
                            elapsed: last.as_second() - self.start_time.as_second(),
                        },
                    )?;
                    self.clock.wait_until(next_second);
                    now = self.clock.now();
                    state.sequence = 0;
                }
            } else {
                state.sequence = 0;
            }
        }

        let elapsed = now.as_second() - self.start_time.as_second();
        if elapsed < 0 {
            return Err(Error::EpochAhead {
                epoch: self.start_time,
                now,
            });
        }
        if elapsed > MAX_TIMESTAMP_SECONDS {
            return Err(Error::OverTimeLimit { elapsed });
        }

        let id = TinyId::new()
            .with_timestamp(elapsed as u32)
            .with_sequence(state.sequence)
            .with_node_id(self.node_id);

        state.last = Some(now);

        Ok(id)
    }
}
