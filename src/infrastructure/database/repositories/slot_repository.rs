//! SeaORM implementation of SlotRepository

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::calendar::{DateWindow, TimeRange};
use crate::domain::money::Money;
use crate::domain::pricing::DayPeriod;
use crate::domain::slot::{ensure_no_overlap, NewSlot, Slot, SlotRepository, SlotState};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::slot;

use super::db_err;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: slot::Model) -> DomainResult<Slot> {
    let range = TimeRange::new(m.start_time, m.end_time)
        .map_err(|e| DomainError::Storage(format!("slot {}: {}", m.id, e)))?;
    let state = match (m.status, m.reservation_item_id) {
        (slot::SlotStatus::Available, _) => SlotState::Available,
        (slot::SlotStatus::Blocked, _) => SlotState::Blocked,
        (slot::SlotStatus::Reserved, Some(item_id)) => SlotState::Reserved(item_id),
        (slot::SlotStatus::Reserved, None) => {
            return Err(DomainError::Storage(format!(
                "slot {} is reserved without an item",
                m.id
            )))
        }
    };
    Ok(Slot {
        id: m.id,
        court_id: m.court_id,
        date: m.date,
        range,
        price: Money::from_minor(m.price),
        period: period_from_db(m.period),
        state,
    })
}

fn models_to_domain(models: Vec<slot::Model>) -> DomainResult<Vec<Slot>> {
    models.into_iter().map(model_to_domain).collect()
}

fn period_from_db(p: slot::Period) -> DayPeriod {
    match p {
        slot::Period::Daytime => DayPeriod::Daytime,
        slot::Period::Nighttime => DayPeriod::Nighttime,
    }
}

fn period_to_db(p: DayPeriod) -> slot::Period {
    match p {
        DayPeriod::Daytime => slot::Period::Daytime,
        DayPeriod::Nighttime => slot::Period::Nighttime,
    }
}

// ── SlotRepository impl ─────────────────────────────────────────

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>> {
        let model = slot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Slot>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = slot::Entity::find()
            .filter(slot::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(slot::Column::Date)
            .order_by_asc(slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_for_court(&self, court_id: i32, window: DateWindow) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .filter(slot::Column::CourtId.eq(court_id))
            .filter(slot::Column::Date.gte(window.start))
            .filter(slot::Column::Date.lt(window.end))
            .order_by_asc(slot::Column::Date)
            .order_by_asc(slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn insert_batch(&self, court_id: i32, slots: Vec<NewSlot>) -> DomainResult<Vec<Slot>> {
        if slots.is_empty() {
            return Ok(Vec::new());
        }
        debug!(court_id, count = slots.len(), "Inserting slot batch");

        let txn = self.db.begin().await.map_err(db_err)?;

        let dates: BTreeSet<_> = slots.iter().map(|s| s.date).collect();
        let existing = slot::Entity::find()
            .filter(slot::Column::CourtId.eq(court_id))
            .filter(slot::Column::Date.is_in(dates))
            .all(&txn)
            .await
            .map_err(db_err)?;
        ensure_no_overlap(&slots, &models_to_domain(existing)?)?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(slots.len());
        for s in slots {
            let model = slot::ActiveModel {
                id: NotSet,
                court_id: Set(court_id),
                date: Set(s.date),
                start_time: Set(s.range.start),
                end_time: Set(s.range.end),
                price: Set(s.price.minor()),
                period: Set(period_to_db(s.period)),
                status: Set(slot::SlotStatus::Available),
                reservation_item_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(model.insert(&txn).await.map_err(db_err)?);
        }

        txn.commit().await.map_err(db_err)?;

        info!(court_id, count = created.len(), "Slots created");
        models_to_domain(created)
    }

    async fn set_availability(
        &self,
        court_id: i32,
        window: DateWindow,
        time_range: Option<TimeRange>,
        available: bool,
    ) -> DomainResult<u64> {
        let (from, to) = if available {
            (slot::SlotStatus::Blocked, slot::SlotStatus::Available)
        } else {
            (slot::SlotStatus::Available, slot::SlotStatus::Blocked)
        };

        let txn = self.db.begin().await.map_err(db_err)?;

        let candidates = slot::Entity::find()
            .filter(slot::Column::CourtId.eq(court_id))
            .filter(slot::Column::Date.gte(window.start))
            .filter(slot::Column::Date.lt(window.end))
            .filter(slot::Column::Status.eq(from))
            .all(&txn)
            .await
            .map_err(db_err)?;

        let ids: Vec<i32> = models_to_domain(candidates)?
            .into_iter()
            .filter(|s| time_range.map_or(true, |r| r.overlaps(&s.range)))
            .map(|s| s.id)
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }

        // Re-check the source status so a slot reserved meanwhile is skipped.
        let result = slot::Entity::update_many()
            .set(slot::ActiveModel {
                status: Set(to),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(slot::Column::Id.is_in(ids))
            .filter(slot::Column::Status.eq(from))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(court_id, available, changed = result.rows_affected, "Slot availability updated");
        Ok(result.rows_affected)
    }
}
