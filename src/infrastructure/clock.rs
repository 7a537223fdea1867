use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A pinned calendar date; `now` is midnight UTC of that date.
///
/// Used by `--as-of` replay and by tests that step a scenario through
/// several days. `Clone` shares the pinned date, so a test can keep a handle
/// and advance the engine's clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Arc<RwLock<NaiveDate>>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(RwLock::new(today)),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self
            .today
            .write()
            .unwrap_or_else(PoisonError::into_inner) = today;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let today = *self.today.read().unwrap_or_else(PoisonError::into_inner);
        today.and_time(NaiveTime::MIN).and_utc()
    }
}
