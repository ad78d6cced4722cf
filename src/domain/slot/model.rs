//! Slot domain entity

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::TimeRange;
use crate::domain::money::Money;
use crate::domain::pricing::DayPeriod;
use crate::domain::{DomainError, DomainResult};

/// Occupancy of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    /// Free to book
    Available,
    /// Bound to the given active reservation item
    Reserved(i32),
    /// Taken out of the catalog (maintenance, private event)
    Blocked,
}

impl SlotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved(_) => "Reserved",
            Self::Blocked => "Blocked",
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Atomic bookable interval of one court on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i32,
    pub court_id: i32,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub price: Money,
    pub period: DayPeriod,
    pub state: SlotState,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.state == SlotState::Available
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self.state, SlotState::Reserved(_))
    }

    pub fn is_daytime(&self) -> bool {
        self.period.is_daytime()
    }
}

/// Slot about to be inserted, already priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub date: NaiveDate,
    pub range: TimeRange,
    pub price: Money,
    pub period: DayPeriod,
}

/// Requested slot for bulk creation, before pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub date: NaiveDate,
    pub range: TimeRange,
    /// Flat price for this slot, bypassing court/complex rates.
    pub price_override: Option<Money>,
}

impl SlotSpec {
    pub fn new(date: NaiveDate, range: TimeRange) -> Self {
        Self {
            date,
            range,
            price_override: None,
        }
    }
}

/// Weekly opening hours of a court, consumed by slot generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScheduleTemplate {
    pub court_id: i32,
    pub weekday: Weekday,
    pub range: TimeRange,
}

/// Fail with `IntervalOverlap` if any slot of `batch` intersects another
/// slot of `batch` or an `existing` slot on the same date.
///
/// Callers pass slots of a single court.
pub fn ensure_no_overlap(batch: &[NewSlot], existing: &[Slot]) -> DomainResult<()> {
    for (i, candidate) in batch.iter().enumerate() {
        if let Some(hit) = existing
            .iter()
            .find(|s| s.date == candidate.date && s.range.overlaps(&candidate.range))
        {
            return Err(DomainError::IntervalOverlap(format!(
                "{} {} collides with slot {} ({})",
                candidate.date, candidate.range, hit.id, hit.range
            )));
        }
        if let Some(other) = batch[i + 1..]
            .iter()
            .find(|o| o.date == candidate.date && o.range.overlaps(&candidate.range))
        {
            return Err(DomainError::IntervalOverlap(format!(
                "{} {} collides with {} in the same batch",
                candidate.date, candidate.range, other.range
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn new_slot(start: u32, end: u32) -> NewSlot {
        NewSlot {
            date: date(),
            range: TimeRange::hours(start, end).unwrap(),
            price: Money::from_major(100),
            period: DayPeriod::Daytime,
        }
    }

    fn stored(id: i32, start: u32, end: u32) -> Slot {
        Slot {
            id,
            court_id: 1,
            date: date(),
            range: TimeRange::hours(start, end).unwrap(),
            price: Money::from_major(100),
            period: DayPeriod::Daytime,
            state: SlotState::Available,
        }
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        let batch = vec![new_slot(8, 9), new_slot(9, 10)];
        assert!(ensure_no_overlap(&batch, &[stored(1, 10, 11)]).is_ok());
    }

    #[test]
    fn overlap_with_existing_slot() {
        let err = ensure_no_overlap(&[new_slot(10, 12)], &[stored(1, 11, 12)]).unwrap_err();
        assert!(matches!(err, DomainError::IntervalOverlap(_)));
    }

    #[test]
    fn overlap_inside_batch() {
        let err = ensure_no_overlap(&[new_slot(8, 10), new_slot(9, 11)], &[]).unwrap_err();
        assert!(matches!(err, DomainError::IntervalOverlap(_)));
    }

    #[test]
    fn other_dates_are_ignored() {
        let mut other_day = stored(1, 8, 9);
        other_day.date = date().succ_opt().unwrap();
        assert!(ensure_no_overlap(&[new_slot(8, 9)], &[other_day]).is_ok());
    }

    #[test]
    fn state_predicates() {
        let mut slot = stored(1, 8, 9);
        assert!(slot.is_available());
        slot.state = SlotState::Reserved(5);
        assert!(slot.is_reserved());
        assert!(!slot.is_available());
        slot.state = SlotState::Blocked;
        assert!(!slot.is_reserved());
        assert_eq!(slot.state.to_string(), "Blocked");
    }
}
