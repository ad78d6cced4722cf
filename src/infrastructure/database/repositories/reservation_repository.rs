//! SeaORM implementation of ReservationRepository
//!
//! Binding a slot takes two guards inside one transaction: a conditional
//! `Available → Reserved` update on the slot row, then an item insert under
//! the unique `active_slot_id` index. Either guard failing means another
//! reservation got there first.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::money::Money;
use crate::domain::reservation::{
    BindOutcome, BindRequest, BookingMode, Reservation, ReservationItem, ReservationRepository,
    ReservationState,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{payment, reservation, reservation_item, slot};

use super::payment_repository::{model_to_domain as payment_to_domain, pending_payment};
use super::{db_err, is_unique_violation};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn item_to_domain(m: reservation_item::Model) -> ReservationItem {
    ReservationItem {
        id: m.id,
        reservation_id: m.reservation_id,
        slot_id: m.slot_id,
        locked_price: Money::from_minor(m.locked_price),
        active: m.active_slot_id.is_some(),
    }
}

fn state_from_db(s: reservation::ReservationStatus) -> ReservationState {
    match s {
        reservation::ReservationStatus::Pending => ReservationState::Pending,
        reservation::ReservationStatus::Confirmed => ReservationState::Confirmed,
        reservation::ReservationStatus::Cancelled => ReservationState::Cancelled,
    }
}

fn model_to_domain(m: reservation::Model, items: Vec<reservation_item::Model>) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        state: state_from_db(m.state),
        items: items.into_iter().map(item_to_domain).collect(),
        total: Money::from_minor(m.total),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

// ── Shared release path ─────────────────────────────────────────

/// Release every active item of a reservation and put its slots back to
/// `Available`. Runs on the caller's connection so it joins the caller's
/// transaction. Returns the number of slots freed.
pub(super) async fn release_items<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i32,
    at: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let active = reservation_item::Entity::find()
        .filter(reservation_item::Column::ReservationId.eq(reservation_id))
        .filter(reservation_item::Column::ActiveSlotId.is_not_null())
        .all(conn)
        .await?;
    if active.is_empty() {
        return Ok(0);
    }

    let item_ids: Vec<i32> = active.iter().map(|i| i.id).collect();
    let slot_ids: Vec<i32> = active.iter().map(|i| i.slot_id).collect();

    reservation_item::Entity::update_many()
        .set(reservation_item::ActiveModel {
            active_slot_id: Set(None),
            released_at: Set(Some(at)),
            ..Default::default()
        })
        .filter(reservation_item::Column::Id.is_in(item_ids.clone()))
        .exec(conn)
        .await?;

    let freed = slot::Entity::update_many()
        .set(slot::ActiveModel {
            status: Set(slot::SlotStatus::Available),
            reservation_item_id: Set(None),
            updated_at: Set(at),
            ..Default::default()
        })
        .filter(slot::Column::Id.is_in(slot_ids))
        .filter(slot::Column::Status.eq(slot::SlotStatus::Reserved))
        .filter(slot::Column::ReservationItemId.is_in(item_ids))
        .exec(conn)
        .await?;

    Ok(freed.rows_affected)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn bind_slots(&self, request: BindRequest) -> DomainResult<BindOutcome> {
        debug!(
            user_id = %request.user_id,
            claims = request.claims.len(),
            mode = ?request.mode,
            "Binding slots"
        );

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let header = reservation::ActiveModel {
            id: NotSet,
            user_id: Set(request.user_id.clone()),
            state: Set(reservation::ReservationStatus::Pending),
            total: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let mut items = Vec::with_capacity(request.claims.len());
        let mut skipped = Vec::new();

        for claim in &request.claims {
            let flipped = slot::Entity::update_many()
                .set(slot::ActiveModel {
                    status: Set(slot::SlotStatus::Reserved),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(slot::Column::Id.eq(claim.slot_id))
                .filter(slot::Column::Status.eq(slot::SlotStatus::Available))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if flipped.rows_affected == 0 {
                match request.mode {
                    BookingMode::AllOrNothing => {
                        return Err(DomainError::SlotUnavailable(format!(
                            "slot {} is not available",
                            claim.slot_id
                        )));
                    }
                    BookingMode::BestEffort => {
                        skipped.push(claim.slot_id);
                        continue;
                    }
                }
            }

            // The slot row is already flipped in this transaction, so a
            // unique violation here aborts the whole bind in either mode.
            let item = reservation_item::ActiveModel {
                id: NotSet,
                reservation_id: Set(header.id),
                slot_id: Set(claim.slot_id),
                locked_price: Set(claim.price.minor()),
                active_slot_id: Set(Some(claim.slot_id)),
                released_at: Set(None),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::SlotUnavailable(format!(
                        "slot {} is already bound",
                        claim.slot_id
                    ))
                } else {
                    db_err(e)
                }
            })?;

            slot::Entity::update_many()
                .set(slot::ActiveModel {
                    reservation_item_id: Set(Some(item.id)),
                    ..Default::default()
                })
                .filter(slot::Column::Id.eq(claim.slot_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            items.push(item);
        }

        if items.is_empty() {
            return Err(DomainError::SlotUnavailable(
                "none of the requested slots is available".into(),
            ));
        }

        let total: i64 = items.iter().map(|i| i.locked_price).sum();
        let header = reservation::ActiveModel {
            id: Set(header.id),
            total: Set(total),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(db_err)?;

        let payment = pending_payment(header.id, Money::from_minor(total), now)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            reservation_id = header.id,
            user_id = %header.user_id,
            bound = items.len(),
            skipped = skipped.len(),
            total,
            "Reservation created"
        );

        Ok(BindOutcome {
            reservation: model_to_domain(header, items),
            payment: payment_to_domain(payment),
            skipped,
        })
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let Some(model) = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let items = reservation_item::Entity::find()
            .filter(reservation_item::Column::ReservationId.eq(id))
            .order_by_asc(reservation_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(Some(model_to_domain(model, items)))
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut items_by_reservation: HashMap<i32, Vec<reservation_item::Model>> = HashMap::new();
        for item in reservation_item::Entity::find()
            .filter(reservation_item::Column::ReservationId.is_in(ids))
            .order_by_asc(reservation_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
        {
            items_by_reservation
                .entry(item.reservation_id)
                .or_default()
                .push(item);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let items = items_by_reservation.remove(&m.id).unwrap_or_default();
                model_to_domain(m, items)
            })
            .collect())
    }

    async fn cancel(&self, id: i32, cancelled_by: &str) -> DomainResult<Reservation> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let moved = reservation::Entity::update_many()
            .set(reservation::ActiveModel {
                state: Set(reservation::ReservationStatus::Cancelled),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::State.eq(reservation::ReservationStatus::Pending))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if moved.rows_affected == 0 {
            let current = reservation::Entity::find_by_id(id)
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or_else(|| DomainError::not_found("Reservation", "id", id))?;
            return Err(DomainError::InvalidStateTransition(format!(
                "reservation {} is {}",
                id,
                state_from_db(current.state)
            )));
        }

        let released = release_items(&txn, id, now).await.map_err(db_err)?;

        payment::Entity::update_many()
            .set(payment::ActiveModel {
                state: Set(payment::PaymentStatus::Rejected),
                settled_at: Set(Some(now)),
                settled_by: Set(Some(cancelled_by.to_string())),
                ..Default::default()
            })
            .filter(payment::Column::ReservationId.eq(id))
            .filter(payment::Column::State.eq(payment::PaymentStatus::Pending))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(reservation_id = id, released, cancelled_by, "Reservation cancelled");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }
}
