//! SeaORM implementation of CourtRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Set};
use tracing::debug;

use crate::domain::court::{Complex, Court, CourtRepository};
use crate::domain::money::Money;
use crate::domain::pricing::RateCard;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{complex, court};

use super::db_err;

pub struct SeaOrmCourtRepository {
    db: DatabaseConnection,
}

impl SeaOrmCourtRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn rates(daytime: Option<i64>, nighttime: Option<i64>) -> RateCard {
    RateCard::new(daytime.map(Money::from_minor), nighttime.map(Money::from_minor))
}

fn hour(h: Option<i32>) -> Option<u32> {
    h.and_then(|h| u32::try_from(h).ok())
}

fn complex_to_domain(m: complex::Model) -> Complex {
    Complex {
        id: m.id,
        name: m.name,
        admin_id: m.admin_id,
        rates: rates(m.daytime_rate, m.nighttime_rate),
        cutoff_hour: hour(m.cutoff_hour),
    }
}

fn court_to_domain(m: court::Model) -> Court {
    Court {
        id: m.id,
        name: m.name,
        complex_id: m.complex_id,
        admin_id: m.admin_id,
        rates: rates(m.daytime_rate, m.nighttime_rate),
        cutoff_hour: hour(m.cutoff_hour),
    }
}

// ── CourtRepository impl ────────────────────────────────────────

#[async_trait]
impl CourtRepository for SeaOrmCourtRepository {
    async fn find_court(&self, id: i32) -> DomainResult<Option<Court>> {
        let model = court::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(court_to_domain))
    }

    async fn find_complex(&self, id: i32) -> DomainResult<Option<Complex>> {
        let model = complex::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(complex_to_domain))
    }

    async fn save_complex(&self, c: Complex) -> DomainResult<Complex> {
        debug!(name = %c.name, "Saving complex");

        let model = complex::ActiveModel {
            id: NotSet,
            name: Set(c.name),
            admin_id: Set(c.admin_id),
            daytime_rate: Set(c.rates.daytime.map(|m| m.minor())),
            nighttime_rate: Set(c.rates.nighttime.map(|m| m.minor())),
            cutoff_hour: Set(c.cutoff_hour.map(|h| h as i32)),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(complex_to_domain(saved))
    }

    async fn save_court(&self, c: Court) -> DomainResult<Court> {
        debug!(name = %c.name, complex_id = ?c.complex_id, "Saving court");

        let model = court::ActiveModel {
            id: NotSet,
            name: Set(c.name),
            complex_id: Set(c.complex_id),
            admin_id: Set(c.admin_id),
            daytime_rate: Set(c.rates.daytime.map(|m| m.minor())),
            nighttime_rate: Set(c.rates.nighttime.map(|m| m.minor())),
            cutoff_hour: Set(c.cutoff_hour.map(|h| h as i32)),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(court_to_domain(saved))
    }
}
