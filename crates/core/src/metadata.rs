use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capture instant read from a photo. EXIF carries no zone for `DateTimeOriginal`,
/// so the value is taken as UTC.
pub type CaptureTimestamp = DateTime<Utc>;

/// Span of capture dates found in one directory. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: CaptureTimestamp,
    end: CaptureTimestamp,
}

impl DateRange {
    pub fn new(a: CaptureTimestamp, b: CaptureTimestamp) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single(date: CaptureTimestamp) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Min/max reduction over every timestamp; `None` when the iterator is empty.
    pub fn from_timestamps<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = CaptureTimestamp>,
    {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(Self::single(date)),
            Some(range) => Some(Self {
                start: range.start.min(date),
                end: range.end.max(date),
            }),
        })
    }

    pub fn start(&self) -> CaptureTimestamp {
        self.start
    }

    pub fn end(&self) -> CaptureTimestamp {
        self.end
    }
}
