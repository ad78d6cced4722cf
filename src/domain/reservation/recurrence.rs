//! Recurring booking patterns and slot matching

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::model::Reservation;
use crate::domain::calendar::{DateWindow, TimeRange};
use crate::domain::money::Money;
use crate::domain::payment::Payment;
use crate::domain::slot::Slot;

/// Same time range on every `weekday`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRule {
    pub weekday: Weekday,
    pub range: TimeRange,
}

/// Time range on one specific date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedRange {
    pub date: NaiveDate,
    pub range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrencePattern {
    Weekly(Vec<WeeklyRule>),
    Explicit(Vec<DatedRange>),
}

impl RecurrencePattern {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Weekly(rules) => rules.is_empty(),
            Self::Explicit(ranges) => ranges.is_empty(),
        }
    }

    /// Concrete date/time ranges of this pattern inside `window`, in date
    /// order.
    pub fn expand(&self, window: &DateWindow) -> Vec<DatedRange> {
        let mut out: Vec<DatedRange> = match self {
            Self::Weekly(rules) => window
                .dates()
                .flat_map(move |date| {
                    rules
                        .iter()
                        .filter(move |r| r.weekday == date.weekday())
                        .map(move |r| DatedRange {
                            date,
                            range: r.range,
                        })
                })
                .collect(),
            Self::Explicit(ranges) => ranges
                .iter()
                .filter(|r| window.contains(r.date))
                .copied()
                .collect(),
        };
        out.sort_by_key(|r| (r.date, r.range.start));
        out
    }
}

/// Recurring request on one court
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRequest {
    pub court_id: i32,
    pub pattern: RecurrencePattern,
    pub window: DateWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingReason {
    /// A slot exists but is reserved or blocked
    Unavailable,
    /// No slot was ever created for this date and time
    NoSlot,
}

/// Part of a recurring pattern that could not be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSlot {
    pub date: NaiveDate,
    pub range: TimeRange,
    pub slot_id: Option<i32>,
    pub reason: MissingReason,
}

impl MissingSlot {
    pub fn unavailable(slot: &Slot) -> Self {
        Self {
            date: slot.date,
            range: slot.range,
            slot_id: Some(slot.id),
            reason: MissingReason::Unavailable,
        }
    }
}

/// Read-only price estimate of a recurring booking
#[derive(Debug, Clone, Serialize)]
pub struct RecurringQuote {
    pub count: usize,
    pub total: Money,
    pub slots: Vec<Slot>,
    pub missing: Vec<MissingSlot>,
}

#[derive(Debug, Clone)]
pub struct RecurringBooking {
    pub reservation: Reservation,
    pub payment: Payment,
    pub missing: Vec<MissingSlot>,
}

/// Split `slots` into bookable candidates and missing entries for the given
/// ranges. A slot matches a range when it lies entirely inside it.
pub fn match_slots(ranges: &[DatedRange], slots: &[Slot]) -> (Vec<Slot>, Vec<MissingSlot>) {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut missing = Vec::new();

    for wanted in ranges {
        let mut matched_any = false;
        for slot in slots
            .iter()
            .filter(|s| s.date == wanted.date && wanted.range.contains(&s.range))
        {
            matched_any = true;
            if !seen.insert(slot.id) {
                continue;
            }
            if slot.is_available() {
                candidates.push(slot.clone());
            } else {
                missing.push(MissingSlot::unavailable(slot));
            }
        }
        if !matched_any {
            missing.push(MissingSlot {
                date: wanted.date,
                range: wanted.range,
                slot_id: None,
                reason: MissingReason::NoSlot,
            });
        }
    }

    (candidates, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::DayPeriod;
    use crate::domain::slot::SlotState;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn slot(id: i32, date: NaiveDate, start: u32, state: SlotState) -> Slot {
        Slot {
            id,
            court_id: 1,
            date,
            range: TimeRange::hours(start, start + 1).unwrap(),
            price: Money::from_major(150),
            period: DayPeriod::Nighttime,
            state,
        }
    }

    fn mondays_at_eight() -> RecurrencePattern {
        RecurrencePattern::Weekly(vec![WeeklyRule {
            weekday: Weekday::Mon,
            range: TimeRange::hours(20, 21).unwrap(),
        }])
    }

    #[test]
    fn weekly_pattern_expands_per_matching_day() {
        // 2026-10-19 is a Monday.
        let window = DateWindow::days(d(2026, 10, 17), 28);
        let ranges = mondays_at_eight().expand(&window);
        let dates: Vec<_> = ranges.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![d(2026, 10, 19), d(2026, 10, 26), d(2026, 11, 2), d(2026, 11, 9)]
        );
    }

    #[test]
    fn explicit_pattern_is_clipped_to_window() {
        let range = TimeRange::hours(9, 10).unwrap();
        let pattern = RecurrencePattern::Explicit(vec![
            DatedRange { date: d(2026, 10, 20), range },
            DatedRange { date: d(2026, 12, 1), range },
        ]);
        let window = DateWindow::days(d(2026, 10, 17), 30);
        assert_eq!(pattern.expand(&window).len(), 1);
    }

    #[test]
    fn taken_and_absent_slots_are_missing() {
        let ranges = mondays_at_eight().expand(&DateWindow::days(d(2026, 10, 19), 14));
        let slots = vec![
            slot(1, d(2026, 10, 19), 20, SlotState::Reserved(9)),
            slot(2, d(2026, 10, 19), 18, SlotState::Available),
        ];
        let (candidates, missing) = match_slots(&ranges, &slots);
        assert!(candidates.is_empty());
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].reason, MissingReason::Unavailable);
        assert_eq!(missing[0].slot_id, Some(1));
        assert_eq!(missing[1].reason, MissingReason::NoSlot);
        assert_eq!(missing[1].date, d(2026, 10, 26));
    }

    #[test]
    fn overlapping_rules_do_not_double_count() {
        let date = d(2026, 10, 19);
        let ranges = vec![
            DatedRange { date, range: TimeRange::hours(19, 22).unwrap() },
            DatedRange { date, range: TimeRange::hours(20, 21).unwrap() },
        ];
        let slots = vec![slot(1, date, 20, SlotState::Available)];
        let (candidates, missing) = match_slots(&ranges, &slots);
        assert_eq!(candidates.len(), 1);
        assert!(missing.is_empty());
    }
}
