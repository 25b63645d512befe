use jiff::Timestamp;
use std::time::Duration;

/// Source of wall-clock time for a [`Tinyflake`](crate::Tinyflake).
pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block and wait until the clock reaches the target time.
    fn wait_until(&self, target: Timestamp);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp) {
        loop {
            let now = Timestamp::now();
            if now >= target {
                return;
            }
            let remaining = target.duration_since(now).unsigned_abs();
            // 1 ms floor avoids spinning on sub-millisecond gaps.
            std::thread::sleep(remaining.max(Duration::from_millis(1)));
        }
    }
}
