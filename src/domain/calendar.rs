//! Time intervals, date windows and the booking clock

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Longest slot-generation horizon accepted, in days
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Longest default recurring window accepted, in weeks
pub const MAX_RECURRING_WEEKS: u32 = 52;

// ── TimeRange ──────────────────────────────────────────────────

/// Half-open `[start, end)` interval within one day.
///
/// `end <= start` means the interval runs past midnight, so `22:00-00:00`
/// lasts two hours. `start == end` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if start == end {
            return Err(DomainError::Validation(format!(
                "empty interval {}",
                start.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from whole hours; `hours(20, 21)` is `20:00-21:00`.
    pub fn hours(start: u32, end: u32) -> DomainResult<Self> {
        let at = |h: u32| {
            NaiveTime::from_hms_opt(h % 24, 0, 0)
                .ok_or_else(|| DomainError::Validation(format!("invalid hour {}", h)))
        };
        Self::new(at(start)?, at(end)?)
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Offsets from midnight in seconds, with `end` shifted by a day when the
    /// interval wraps.
    fn bounds(&self) -> (i64, i64) {
        let start = i64::from(self.start.num_seconds_from_midnight());
        let mut end = i64::from(self.end.num_seconds_from_midnight());
        if end <= start {
            end += SECONDS_PER_DAY;
        }
        (start, end)
    }

    pub fn duration_minutes(&self) -> i64 {
        let (start, end) = self.bounds();
        (end - start) / 60
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        let (a_start, a_end) = self.bounds();
        let (b_start, b_end) = other.bounds();
        a_start < b_end && b_start < a_end
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        let (a_start, a_end) = self.bounds();
        let (b_start, b_end) = other.bounds();
        a_start <= b_start && b_end <= a_end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

// ── DateWindow ─────────────────────────────────────────────────

/// Half-open `[start, end)` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::Validation(format!(
                "date window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// `days` dates starting at `start`; the end saturates at the last
    /// representable date.
    pub fn days(start: NaiveDate, days: u32) -> Self {
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Generation horizon of `days` dates from `start`, bounded by
    /// `MAX_HORIZON_DAYS`.
    pub fn horizon(start: NaiveDate, days: u32) -> DomainResult<Self> {
        if !(1..=MAX_HORIZON_DAYS).contains(&days) {
            return Err(DomainError::Validation(format!(
                "horizon of {} days is outside 1..={}",
                days, MAX_HORIZON_DAYS
            )));
        }
        Ok(Self::days(start, days))
    }

    /// `weeks` whole weeks starting on the Monday of the week containing
    /// `today`, bounded by `MAX_RECURRING_WEEKS`.
    pub fn weeks_from_current_week(today: NaiveDate, weeks: u32) -> DomainResult<Self> {
        let days = weeks
            .checked_mul(7)
            .filter(|_| (1..=MAX_RECURRING_WEEKS).contains(&weeks))
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "recurring window of {} weeks is outside 1..={}",
                    weeks, MAX_RECURRING_WEEKS
                ))
            })?;
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        Ok(Self::days(monday, days))
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn intersect(&self, other: &DateWindow) -> DateWindow {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end).max(start);
        DateWindow { start, end }
    }

    /// Last date inside the window, if any.
    pub fn last(&self) -> Option<NaiveDate> {
        if self.is_empty() {
            None
        } else {
            self.end.pred_opt()
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

// ── Clock & booking policy ─────────────────────────────────────

/// Source of "today" for booking rules.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock shifted to the venue's UTC offset.
    System { utc_offset: FixedOffset },
    /// Pinned date, for tests and replays.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System { utc_offset } => Utc::now().with_timezone(utc_offset).date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

/// Which dates may be booked: from tomorrow up to `today + horizon_days`,
/// both inclusive.
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    pub clock: Clock,
    pub horizon_days: u32,
}

impl BookingPolicy {
    pub fn new(clock: Clock, horizon_days: u32) -> Self {
        Self {
            clock,
            horizon_days,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn tomorrow(&self) -> NaiveDate {
        self.today() + Duration::days(1)
    }

    pub fn booking_window(&self) -> DateWindow {
        DateWindow::days(self.tomorrow(), self.horizon_days)
    }

    pub fn ensure_bookable(&self, date: NaiveDate) -> DomainResult<()> {
        let window = self.booking_window();
        if window.contains(date) {
            return Ok(());
        }
        Err(DomainError::Validation(format!(
            "date {} is outside the booking window {}..={}",
            date,
            window.start,
            window.last().map_or_else(|| "-".to_string(), |d| d.to_string())
        )))
    }
}
