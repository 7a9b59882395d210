//! System clock adapter

use chrono::{DateTime, Utc};
use timeloom_core::timer::ports::Clock;

/// Wall clock backed by `Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
