use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Span of a price-history request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryRange {
    /// A provider-relative lookback such as `"1d"` or `"5d"`, ending now.
    Period(&'static str),

    /// An explicit window, `start` inclusive and `end` exclusive.
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl HistoryRange {
    /// The most recent trading day.
    pub fn last_day() -> Self {
        HistoryRange::Period("1d")
    }

    /// Window covering `[start 00:00 UTC, end 00:00 UTC)`.
    pub fn between_dates(start: NaiveDate, end: NaiveDate) -> Self {
        HistoryRange::Between {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end: end.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}
