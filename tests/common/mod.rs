//! Shared fixtures: in-memory database with migrations, seeded courts,
//! and a clock pinned to Friday 2026-10-16.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use court_booking::domain::calendar::{BookingPolicy, Clock, TimeRange};
use court_booking::domain::court::{Complex, Court};
use court_booking::domain::money::Money;
use court_booking::domain::pricing::{PricingEngine, RateCard};
use court_booking::domain::slot::SlotSpec;
use court_booking::domain::RepositoryProvider;
use court_booking::{
    init_database, DatabaseConfig, Migrator, PaymentService, ReservationService, SeaOrmRepositoryProvider,
    SlotCatalog,
};

pub const PLAYER: &str = "player-1";
pub const OTHER_PLAYER: &str = "player-2";
pub const COURT_ADMIN: &str = "admin-court";
pub const COMPLEX_ADMIN: &str = "admin-complex";

/// Daytime rate of the standalone court (per hour)
pub const COURT_DAY_RATE: i64 = 10_000;
/// Nighttime rate of the standalone court (per hour)
pub const COURT_NIGHT_RATE: i64 = 15_000;

pub struct TestEngine {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub catalog: SlotCatalog,
    pub reservations: ReservationService,
    pub payments: PaymentService,
    pub policy: BookingPolicy,
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn hours(start: u32, end: u32) -> TimeRange {
    TimeRange::hours(start, end).unwrap()
}

pub fn today() -> NaiveDate {
    d(2026, 10, 16)
}

/// First Monday inside the booking window
pub fn monday() -> NaiveDate {
    d(2026, 10, 19)
}

pub async fn setup() -> TestEngine {
    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let policy = BookingPolicy::new(Clock::Fixed(today()), 30);
    let pricing = PricingEngine::new(6, 18, Money::from_minor(5_000), Money::from_minor(7_000));

    TestEngine {
        catalog: SlotCatalog::new(repos.clone(), pricing, policy),
        reservations: ReservationService::new(repos.clone(), policy, 4),
        payments: PaymentService::new(repos.clone()),
        db,
        repos,
        policy,
    }
}

/// Standalone court administered by [`COURT_ADMIN`] with its own rates.
pub async fn seed_court(engine: &TestEngine) -> Court {
    engine
        .repos
        .courts()
        .save_court(Court::standalone("Center Court", COURT_ADMIN).with_rates(
            Some(Money::from_minor(COURT_DAY_RATE)),
            Some(Money::from_minor(COURT_NIGHT_RATE)),
        ))
        .await
        .expect("Failed to seed court")
}

/// Complex administered by [`COMPLEX_ADMIN`] and one rate-less court in it.
pub async fn seed_complex_court(engine: &TestEngine) -> (Complex, Court) {
    let complex = engine
        .repos
        .courts()
        .save_complex(Complex {
            id: 0,
            name: "Riverside".into(),
            admin_id: COMPLEX_ADMIN.into(),
            rates: RateCard::new(Some(Money::from_minor(8_000)), Some(Money::from_minor(12_000))),
            cutoff_hour: Some(19),
        })
        .await
        .expect("Failed to seed complex");
    let court = engine
        .repos
        .courts()
        .save_court(Court::in_complex("Riverside 1", complex.id))
        .await
        .expect("Failed to seed complex court");
    (complex, court)
}

/// One-hour slots starting at each of `starts` on `date`.
pub async fn seed_slots(engine: &TestEngine, court_id: i32, date: NaiveDate, starts: &[u32]) -> Vec<i32> {
    let specs: Vec<SlotSpec> = starts
        .iter()
        .map(|h| SlotSpec::new(date, hours(*h, h + 1)))
        .collect();
    engine
        .catalog
        .create_slots_bulk(court_id, &specs)
        .await
        .expect("Failed to seed slots")
}
