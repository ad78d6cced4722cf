//! Payment repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Decision, Payment};
use crate::domain::money::Money;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;

    async fn find_by_reservation(&self, reservation_id: i32) -> DomainResult<Option<Payment>>;

    /// Open the single pending payment of a reservation
    async fn create(&self, reservation_id: i32, amount: Money) -> DomainResult<Payment>;

    /// Store proof references on a pending payment; state stays `Pending`.
    async fn attach_proof(
        &self,
        id: i32,
        proof_ref: String,
        qr_ref: Option<String>,
    ) -> DomainResult<Payment>;

    /// Apply `decision` to a pending payment and its pending reservation in
    /// one transaction. Rejecting also releases every slot of the
    /// reservation.
    async fn settle(
        &self,
        id: i32,
        decision: Decision,
        settled_by: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Payment>;

    /// Reject a pending payment that still has no proof, releasing its
    /// reservation like `settle`. Returns `None` and changes nothing when the
    /// payment was settled or received a proof in the meantime.
    async fn expire(
        &self,
        id: i32,
        settled_by: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Option<Payment>>;

    /// Pending payments without proof, opened before `created_before`
    async fn find_stale_pending(&self, created_before: DateTime<Utc>) -> DomainResult<Vec<Payment>>;
}
