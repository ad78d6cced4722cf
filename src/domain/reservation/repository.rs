//! Reservation repository interface

use async_trait::async_trait;

use super::model::{BindOutcome, BindRequest, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Create a pending reservation and its pending payment, binding the
    /// claimed slots in one transaction according to `request.mode`.
    ///
    /// A slot binds only if it is `Available` at commit time; the unique
    /// active-slot index makes concurrent binders of one slot fail with
    /// `SlotUnavailable`.
    async fn bind_slots(&self, request: BindRequest) -> DomainResult<BindOutcome>;

    /// Find reservation by ID, with all its items
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// All reservations of a user, newest first
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;

    /// Cancel a pending reservation in one transaction: release its items,
    /// make its slots available, and close its pending payment.
    async fn cancel(&self, id: i32, cancelled_by: &str) -> DomainResult<Reservation>;
}
