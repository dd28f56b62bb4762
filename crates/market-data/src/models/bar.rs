use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of a price series (OHLCV).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the bar
    pub timestamp: DateTime<Utc>,

    /// GMT offset of the listing exchange, in seconds, as reported with the series
    pub utc_offset_secs: i32,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Create a bar stamped at UTC.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            utc_offset_secs: 0,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Attach the exchange's GMT offset.
    pub fn with_utc_offset(mut self, utc_offset_secs: i32) -> Self {
        self.utc_offset_secs = utc_offset_secs;
        self
    }

    /// Calendar date of the bar at the listing exchange.
    ///
    /// Daily bars are stamped at the exchange's session open, which can fall
    /// on the previous UTC day for exchanges east of UTC+12 or so.
    pub fn local_date(&self) -> NaiveDate {
        match FixedOffset::east_opt(self.utc_offset_secs) {
            Some(offset) => self.timestamp.with_timezone(&offset).date_naive(),
            None => self.timestamp.date_naive(),
        }
    }
}
