//! Payment service: proof upload and admin settlement

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::court_context;
use crate::domain::identity::Identity;
use crate::domain::payment::{Decision, Payment};
use crate::domain::reservation::{Reservation, ReservationState};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Actor recorded on payments rejected by the expiry task
pub const EXPIRY_ACTOR: &str = "system:expiry";

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Payment of a reservation, opening it if none exists yet.
    pub async fn create(&self, reservation_id: i32) -> DomainResult<Payment> {
        if let Some(existing) = self.repos.payments().find_by_reservation(reservation_id).await? {
            return Ok(existing);
        }

        let reservation = self.reservation(reservation_id).await?;
        if reservation.state == ReservationState::Cancelled {
            return Err(DomainError::InvalidStateTransition(format!(
                "reservation {} is cancelled",
                reservation_id
            )));
        }
        self.repos.payments().create(reservation_id, reservation.total).await
    }

    pub async fn get(&self, payment_id: i32) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", payment_id))
    }

    /// Store the transfer receipt sent by the reservation owner.
    pub async fn attach_proof(
        &self,
        identity: &Identity,
        payment_id: i32,
        proof_ref: &str,
        qr_ref: Option<&str>,
    ) -> DomainResult<Payment> {
        if proof_ref.trim().is_empty() {
            return Err(DomainError::Validation("proof reference is empty".into()));
        }

        let payment = self.get(payment_id).await?;
        let reservation = self.reservation(payment.reservation_id).await?;
        if !reservation.is_owned_by(identity) {
            return Err(DomainError::Forbidden(format!(
                "payment {} does not belong to {}",
                payment_id, identity.user_id
            )));
        }
        payment.ensure_pending()?;

        let payment = self
            .repos
            .payments()
            .attach_proof(payment_id, proof_ref.to_string(), qr_ref.map(str::to_string))
            .await?;
        info!(payment_id, user_id = %identity.user_id, "Payment proof attached");
        Ok(payment)
    }

    /// Confirm a pending payment; the reservation becomes `Confirmed`.
    pub async fn confirm(&self, identity: &Identity, payment_id: i32) -> DomainResult<Payment> {
        self.decide(identity, payment_id, Decision::Confirm).await
    }

    /// Reject a pending payment; the reservation is cancelled and its slots
    /// become available again.
    pub async fn reject(&self, identity: &Identity, payment_id: i32) -> DomainResult<Payment> {
        self.decide(identity, payment_id, Decision::Reject).await
    }

    /// Reject pending payments without proof that are older than `ttl`.
    /// Returns how many were rejected. Payments that got a proof or a
    /// decision after the scan are left alone; failures are logged and
    /// skipped.
    pub async fn expire_stale(&self, now: DateTime<Utc>, ttl: Duration) -> DomainResult<usize> {
        let stale = self.repos.payments().find_stale_pending(now - ttl).await?;
        if stale.is_empty() {
            return Ok(0);
        }

        info!(count = stale.len(), "Expiring stale pending payments");

        let mut expired = 0;
        for payment in stale {
            match self
                .repos
                .payments()
                .expire(payment.id, EXPIRY_ACTOR, now)
                .await
            {
                Ok(Some(_)) => expired += 1,
                Ok(None) => {}
                Err(e) => warn!(payment_id = payment.id, error = %e, "Failed to expire payment"),
            }
        }
        Ok(expired)
    }

    async fn decide(&self, identity: &Identity, payment_id: i32, decision: Decision) -> DomainResult<Payment> {
        let payment = self.get(payment_id).await?;
        let reservation = self.reservation(payment.reservation_id).await?;
        self.authorize_admin(identity, &reservation).await?;

        payment.ensure_pending()?;
        reservation.ensure_pending()?;

        self.repos
            .payments()
            .settle(payment_id, decision, &identity.user_id, Utc::now())
            .await
    }

    /// The caller must be an admin owning the court of every slot.
    async fn authorize_admin(&self, identity: &Identity, reservation: &Reservation) -> DomainResult<()> {
        if !identity.is_admin() {
            return Err(DomainError::Forbidden(format!(
                "{} is not an admin",
                identity.user_id
            )));
        }

        let slots = self.repos.slots().find_by_ids(&reservation.slot_ids()).await?;
        let courts: BTreeSet<i32> = slots.iter().map(|s| s.court_id).collect();
        if courts.is_empty() {
            return Err(DomainError::Forbidden(format!(
                "reservation {} has no slot to administer",
                reservation.id
            )));
        }

        for court_id in courts {
            let ctx = court_context(self.repos.as_ref(), court_id).await?;
            if !ctx.is_administered_by(identity) {
                return Err(DomainError::Forbidden(format!(
                    "{} does not administer court {}",
                    identity.user_id, court_id
                )));
            }
        }
        Ok(())
    }

    async fn reservation(&self, reservation_id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))
    }
}
