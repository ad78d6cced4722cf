//! Reservation service: single-day and recurring booking, cancellation

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use super::court_context;
use crate::domain::calendar::{BookingPolicy, DateWindow};
use crate::domain::identity::Identity;
use crate::domain::money::Money;
use crate::domain::reservation::{
    match_slots, BindOutcome, BindRequest, BookingMode, DatedRange, MissingSlot, Reservation,
    RecurringBooking, RecurringQuote, RecurringRequest, SlotClaim,
};
use crate::domain::slot::Slot;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
    recurring_weeks: u32,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BookingPolicy, recurring_weeks: u32) -> Self {
        Self {
            repos,
            policy,
            recurring_weeks,
        }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Default window for recurring requests: whole weeks starting on the
    /// Monday of the current week.
    pub fn recurring_window(&self, weeks: Option<u32>) -> DomainResult<DateWindow> {
        DateWindow::weeks_from_current_week(self.policy.today(), weeks.unwrap_or(self.recurring_weeks))
    }

    /// Book `slot_ids` of a single date, all or nothing.
    ///
    /// Every request check runs before any slot is touched.
    pub async fn create(&self, identity: &Identity, slot_ids: &[i32]) -> DomainResult<BindOutcome> {
        if slot_ids.is_empty() {
            return Err(DomainError::Validation("no slots requested".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = slot_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(DomainError::Validation(format!("slot {} requested twice", dup)));
        }

        let slots = self.repos.slots().find_by_ids(slot_ids).await?;
        if let Some(missing) = slot_ids.iter().find(|id| !slots.iter().any(|s| s.id == **id)) {
            return Err(DomainError::not_found("Slot", "id", missing));
        }

        let date = slots[0].date;
        if slots.iter().any(|s| s.date != date) {
            return Err(DomainError::Validation(
                "all slots of a reservation must be on the same date".into(),
            ));
        }
        self.policy.ensure_bookable(date)?;

        let outcome = self
            .repos
            .reservations()
            .bind_slots(BindRequest {
                user_id: identity.user_id.clone(),
                claims: claims_for(&slots),
                mode: BookingMode::AllOrNothing,
            })
            .await?;

        info!(
            reservation_id = outcome.reservation.id,
            user_id = %identity.user_id,
            %date,
            total = %outcome.reservation.total,
            "Single-day reservation created"
        );
        Ok(outcome)
    }

    /// Cancel a pending reservation owned by `identity` and free its slots.
    pub async fn cancel(&self, identity: &Identity, reservation_id: i32) -> DomainResult<Reservation> {
        let reservation = self.get(reservation_id).await?;
        reservation.ensure_cancellable_by(identity)?;

        self.repos
            .reservations()
            .cancel(reservation_id, &identity.user_id)
            .await
    }

    /// Book every free slot matching a recurring pattern. Taken or absent
    /// slots are reported in `missing` and never substituted.
    pub async fn create_recurring(
        &self,
        identity: &Identity,
        request: &RecurringRequest,
    ) -> DomainResult<RecurringBooking> {
        let (candidates, mut missing) = self.match_request(request).await?;
        if candidates.is_empty() {
            return Err(DomainError::SlotUnavailable(format!(
                "no slot of the pattern is available on court {}",
                request.court_id
            )));
        }

        let outcome = self
            .repos
            .reservations()
            .bind_slots(BindRequest {
                user_id: identity.user_id.clone(),
                claims: claims_for(&candidates),
                mode: BookingMode::BestEffort,
            })
            .await?;

        // Slots lost to a concurrent booking between matching and binding.
        missing.extend(
            candidates
                .iter()
                .filter(|s| outcome.skipped.contains(&s.id))
                .map(MissingSlot::unavailable),
        );
        missing.sort_by_key(|m| (m.date, m.range.start));

        info!(
            reservation_id = outcome.reservation.id,
            user_id = %identity.user_id,
            court_id = request.court_id,
            bound = outcome.reservation.items.len(),
            missing = missing.len(),
            "Recurring reservation created"
        );

        Ok(RecurringBooking {
            reservation: outcome.reservation,
            payment: outcome.payment,
            missing,
        })
    }

    /// Price a recurring request without booking anything.
    pub async fn preview_recurring(&self, request: &RecurringRequest) -> DomainResult<RecurringQuote> {
        let (slots, missing) = self.match_request(request).await?;
        Ok(RecurringQuote {
            count: slots.len(),
            total: slots.iter().map(|s| s.price).sum::<Money>(),
            slots,
            missing,
        })
    }

    pub async fn get(&self, reservation_id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))
    }

    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_for_user(user_id).await
    }

    async fn match_request(&self, request: &RecurringRequest) -> DomainResult<(Vec<Slot>, Vec<MissingSlot>)> {
        if request.pattern.is_empty() {
            return Err(DomainError::Validation("recurring pattern is empty".into()));
        }
        court_context(self.repos.as_ref(), request.court_id).await?;

        let window = request.window.intersect(&self.policy.booking_window());
        if window.is_empty() {
            return Err(DomainError::Validation(format!(
                "window {}..{} lies outside the booking window",
                request.window.start, request.window.end
            )));
        }

        let ranges: Vec<DatedRange> = request.pattern.expand(&window);
        let slots = self
            .repos
            .slots()
            .find_for_court(request.court_id, window)
            .await?;
        Ok(match_slots(&ranges, &slots))
    }
}

fn claims_for(slots: &[Slot]) -> Vec<SlotClaim> {
    slots
        .iter()
        .map(|s| SlotClaim {
            slot_id: s.id,
            price: s.price,
        })
        .collect()
}
