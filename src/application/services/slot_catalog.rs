//! Slot catalog: creates, generates and toggles bookable slots

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;

use super::court_context;
use crate::domain::calendar::{BookingPolicy, DateWindow, TimeRange};
use crate::domain::court::CourtContext;
use crate::domain::pricing::PricingEngine;
use crate::domain::slot::{NewSlot, Slot, SlotSpec, WeeklyScheduleTemplate};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Result of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedSlots {
    pub count: usize,
    pub slot_ids: Vec<i32>,
}

pub struct SlotCatalog {
    repos: Arc<dyn RepositoryProvider>,
    pricing: PricingEngine,
    policy: BookingPolicy,
}

impl SlotCatalog {
    pub fn new(repos: Arc<dyn RepositoryProvider>, pricing: PricingEngine, policy: BookingPolicy) -> Self {
        Self {
            repos,
            pricing,
            policy,
        }
    }

    /// Create one `Available` slot priced through the court's rate chain.
    pub async fn create_slot(
        &self,
        court_id: i32,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> DomainResult<Slot> {
        let range = TimeRange::new(start, end)?;
        let ctx = court_context(self.repos.as_ref(), court_id).await?;
        let batch = self.price_specs(&ctx, &[SlotSpec::new(date, range)], None);

        let mut created = self.repos.slots().insert_batch(court_id, batch).await?;
        created
            .pop()
            .ok_or_else(|| DomainError::Storage("slot insert returned no row".into()))
    }

    /// Create every slot of `specs` or none of them. Returns the new ids.
    pub async fn create_slots_bulk(&self, court_id: i32, specs: &[SlotSpec]) -> DomainResult<Vec<i32>> {
        let ctx = court_context(self.repos.as_ref(), court_id).await?;
        let batch = self.price_specs(&ctx, specs, None);
        let created = self.repos.slots().insert_batch(court_id, batch).await?;
        Ok(created.into_iter().map(|s| s.id).collect())
    }

    /// Slice weekly templates into one-hour slots for every day of
    /// `[tomorrow, tomorrow + horizon_days)` and insert them atomically.
    ///
    /// `cutoff_hour` overrides the court and complex cutoff for this run.
    pub async fn generate_recurring_slots(
        &self,
        court_id: i32,
        templates: &[WeeklyScheduleTemplate],
        horizon_days: u32,
        cutoff_hour: Option<u32>,
    ) -> DomainResult<GeneratedSlots> {
        if let Some(t) = templates.iter().find(|t| t.court_id != court_id) {
            return Err(DomainError::Validation(format!(
                "template for court {} passed to court {}",
                t.court_id, court_id
            )));
        }
        if let Some(h) = cutoff_hour.filter(|h| *h > 23) {
            return Err(DomainError::Validation(format!("invalid cutoff hour {}", h)));
        }

        let window = DateWindow::horizon(self.policy.tomorrow(), horizon_days)?;
        let ctx = court_context(self.repos.as_ref(), court_id).await?;

        let specs: Vec<SlotSpec> = window
            .dates()
            .flat_map(move |date| {
                templates
                    .iter()
                    .filter(move |t| t.weekday == date.weekday())
                    .flat_map(move |t| hourly_slices(date, &t.range))
            })
            .collect();

        if specs.is_empty() {
            info!(court_id, horizon_days, "No template matched the horizon");
            return Ok(GeneratedSlots::default());
        }

        let batch = self.price_specs(&ctx, &specs, cutoff_hour);
        let created = self.repos.slots().insert_batch(court_id, batch).await?;
        let slot_ids: Vec<i32> = created.into_iter().map(|s| s.id).collect();

        info!(court_id, horizon_days, count = slot_ids.len(), "Recurring slots generated");
        Ok(GeneratedSlots {
            count: slot_ids.len(),
            slot_ids,
        })
    }

    /// Flip unreserved slots between `Available` and `Blocked`. With a
    /// `time_range`, only slots intersecting it are touched.
    pub async fn set_availability(
        &self,
        court_id: i32,
        window: DateWindow,
        available: bool,
        time_range: Option<TimeRange>,
    ) -> DomainResult<u64> {
        court_context(self.repos.as_ref(), court_id).await?;
        self.repos
            .slots()
            .set_availability(court_id, window, time_range, available)
            .await
    }

    pub async fn list_slots(&self, court_id: i32, window: DateWindow) -> DomainResult<Vec<Slot>> {
        self.repos.slots().find_for_court(court_id, window).await
    }

    /// Ids of the slots of a court in `window` that can still be booked.
    pub async fn available_slot_ids(&self, court_id: i32, window: DateWindow) -> DomainResult<HashSet<i32>> {
        let slots = self.list_slots(court_id, window).await?;
        Ok(slots.into_iter().filter(Slot::is_available).map(|s| s.id).collect())
    }

    fn price_specs(&self, ctx: &CourtContext, specs: &[SlotSpec], cutoff_hour: Option<u32>) -> Vec<NewSlot> {
        let cutoff = cutoff_hour.unwrap_or_else(|| ctx.cutoff_hour(self.pricing.default_cutoff_hour()));
        specs
            .iter()
            .map(|spec| {
                let quote = self
                    .pricing
                    .price(&spec.range, cutoff, ctx.rate_chain(spec.price_override));
                NewSlot {
                    date: spec.date,
                    range: spec.range,
                    price: quote.price,
                    period: quote.period,
                }
            })
            .collect()
    }
}

/// Cut `range` on `date` into whole hours. A remainder under an hour is
/// dropped; hours starting after midnight belong to the next date.
fn hourly_slices(date: NaiveDate, range: &TimeRange) -> Vec<SlotSpec> {
    let hours = range.duration_minutes() / 60;
    (0..hours)
        .filter_map(|i| {
            let (start, overflow) = range.start.overflowing_add_signed(Duration::hours(i));
            let day = if overflow == 0 { Some(date) } else { date.succ_opt() }?;
            let end = start + Duration::hours(1);
            TimeRange::new(start, end).ok().map(|r| SlotSpec::new(day, r))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn morning_template_yields_four_slots() {
        let slices = hourly_slices(d(2026, 10, 19), &TimeRange::hours(6, 10).unwrap());
        let starts: Vec<_> = slices.iter().map(|s| s.range.to_string()).collect();
        assert_eq!(starts, vec!["06:00-07:00", "07:00-08:00", "08:00-09:00", "09:00-10:00"]);
    }

    #[test]
    fn short_remainder_is_dropped() {
        let range = TimeRange::new(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(hourly_slices(d(2026, 10, 19), &range).len(), 2);
    }

    #[test]
    fn after_midnight_hours_move_to_next_date() {
        let slices = hourly_slices(d(2026, 10, 19), &TimeRange::hours(22, 2).unwrap());
        let dates: Vec<_> = slices.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![d(2026, 10, 19), d(2026, 10, 19), d(2026, 10, 20), d(2026, 10, 20)]
        );
        assert!(slices[1].range.crosses_midnight());
        assert_eq!(slices[2].range.to_string(), "00:00-01:00");
    }
}
