use std::fmt::{Debug, Formatter};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => panic!("invalid end of day"),
};

/// Query window with UTC-normalised boundaries.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Midnight to `23:59:59` of the calendar day, the way the provider expects the day.
    pub fn whole_day(on: NaiveDate) -> Self {
        Self::new(
            on.and_time(NaiveTime::MIN).and_utc(),
            on.and_time(END_OF_DAY).and_utc(),
        )
    }
}
