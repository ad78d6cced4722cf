//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::money::Money;
use crate::domain::payment::{Decision, Payment, PaymentRepository, PaymentState};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{payment, reservation};

use super::reservation_repository::release_items;
use super::{db_err, is_unique_violation};

/// Precondition checked inside the settlement transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettleGuard {
    /// Admin decision: payment must be pending
    Pending,
    /// Expiry: payment must be pending with no proof attached
    PendingWithoutProof,
}

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> DomainResult<Payment> {
        payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))
    }

    /// Settle `id` in one transaction. `Ok(None)` means an expiry found the
    /// payment no longer eligible; nothing was written.
    async fn apply_settlement(
        &self,
        id: i32,
        decision: Decision,
        settled_by: &str,
        at: DateTime<Utc>,
        guard: SettleGuard,
    ) -> DomainResult<Option<Payment>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let current = payment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))?;
        if guard == SettleGuard::PendingWithoutProof
            && (current.state != PaymentState::Pending || current.has_proof())
        {
            debug!(payment_id = id, state = %current.state, "Payment no longer eligible for expiry");
            return Ok(None);
        }
        current.ensure_pending()?;

        let mut update = payment::Entity::update_many()
            .set(payment::ActiveModel {
                state: Set(state_to_db(decision.target_state())),
                settled_at: Set(Some(at)),
                settled_by: Set(Some(settled_by.to_string())),
                ..Default::default()
            })
            .filter(payment::Column::Id.eq(id))
            .filter(payment::Column::State.eq(payment::PaymentStatus::Pending));
        if guard == SettleGuard::PendingWithoutProof {
            update = update.filter(payment::Column::ProofRef.is_null());
        }
        let settled = update.exec(&txn).await.map_err(db_err)?;
        if settled.rows_affected == 0 {
            if guard == SettleGuard::PendingWithoutProof {
                debug!(payment_id = id, "Payment changed before expiry, skipped");
                return Ok(None);
            }
            return Err(DomainError::InvalidStateTransition(format!(
                "payment {} was settled concurrently",
                id
            )));
        }

        let reservation_state = match decision {
            Decision::Confirm => reservation::ReservationStatus::Confirmed,
            Decision::Reject => reservation::ReservationStatus::Cancelled,
        };
        let moved = reservation::Entity::update_many()
            .set(reservation::ActiveModel {
                state: Set(reservation_state),
                updated_at: Set(at),
                ..Default::default()
            })
            .filter(reservation::Column::Id.eq(current.reservation_id))
            .filter(reservation::Column::State.eq(reservation::ReservationStatus::Pending))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if moved.rows_affected == 0 {
            return Err(DomainError::InvalidStateTransition(format!(
                "reservation {} is no longer pending",
                current.reservation_id
            )));
        }

        if decision == Decision::Reject {
            let released = release_items(&txn, current.reservation_id, at)
                .await
                .map_err(db_err)?;
            debug!(reservation_id = current.reservation_id, released, "Released slots");
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            payment_id = id,
            reservation_id = current.reservation_id,
            decision = ?decision,
            settled_by,
            "Payment settled"
        );
        self.load(id).await.map(Some)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: payment::Model) -> Payment {
    Payment {
        id: m.id,
        reservation_id: m.reservation_id,
        state: state_from_db(m.state),
        amount: Money::from_minor(m.amount),
        proof_ref: m.proof_ref,
        qr_ref: m.qr_ref,
        created_at: m.created_at,
        settled_at: m.settled_at,
        settled_by: m.settled_by,
    }
}

fn state_from_db(s: payment::PaymentStatus) -> PaymentState {
    match s {
        payment::PaymentStatus::Pending => PaymentState::Pending,
        payment::PaymentStatus::Confirmed => PaymentState::Confirmed,
        payment::PaymentStatus::Rejected => PaymentState::Rejected,
    }
}

fn state_to_db(s: PaymentState) -> payment::PaymentStatus {
    match s {
        PaymentState::Pending => payment::PaymentStatus::Pending,
        PaymentState::Confirmed => payment::PaymentStatus::Confirmed,
        PaymentState::Rejected => payment::PaymentStatus::Rejected,
    }
}

pub(super) fn pending_payment(reservation_id: i32, amount: Money, now: DateTime<Utc>) -> payment::ActiveModel {
    payment::ActiveModel {
        id: NotSet,
        reservation_id: Set(reservation_id),
        state: Set(payment::PaymentStatus::Pending),
        amount: Set(amount.minor()),
        proof_ref: Set(None),
        qr_ref: Set(None),
        created_at: Set(now),
        settled_at: Set(None),
        settled_by: Set(None),
    }
}

// ── PaymentRepository impl ──────────────────────────────────────

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_reservation(&self, reservation_id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find()
            .filter(payment::Column::ReservationId.eq(reservation_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, reservation_id: i32, amount: Money) -> DomainResult<Payment> {
        debug!(reservation_id, %amount, "Creating payment");

        let saved = pending_payment(reservation_id, amount, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::InvalidStateTransition(format!(
                        "reservation {} already has a payment",
                        reservation_id
                    ))
                } else {
                    db_err(e)
                }
            })?;
        Ok(model_to_domain(saved))
    }

    async fn attach_proof(
        &self,
        id: i32,
        proof_ref: String,
        qr_ref: Option<String>,
    ) -> DomainResult<Payment> {
        debug!(payment_id = id, "Attaching payment proof");

        let result = payment::Entity::update_many()
            .set(payment::ActiveModel {
                proof_ref: Set(Some(proof_ref)),
                qr_ref: Set(qr_ref),
                ..Default::default()
            })
            .filter(payment::Column::Id.eq(id))
            .filter(payment::Column::State.eq(payment::PaymentStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let current = self.load(id).await?;
        if result.rows_affected == 0 {
            current.ensure_pending()?;
        }
        Ok(current)
    }

    async fn settle(
        &self,
        id: i32,
        decision: Decision,
        settled_by: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        self.apply_settlement(id, decision, settled_by, at, SettleGuard::Pending)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))
    }

    async fn expire(
        &self,
        id: i32,
        settled_by: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Option<Payment>> {
        self.apply_settlement(id, Decision::Reject, settled_by, at, SettleGuard::PendingWithoutProof)
            .await
    }

    async fn find_stale_pending(&self, created_before: DateTime<Utc>) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .filter(payment::Column::State.eq(payment::PaymentStatus::Pending))
            .filter(payment::Column::ProofRef.is_null())
            .filter(payment::Column::CreatedAt.lt(created_before))
            .order_by_asc(payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
