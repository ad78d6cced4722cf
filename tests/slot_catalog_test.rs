mod common;

use chrono::Weekday;

use common::*;
use court_booking::domain::calendar::{DateWindow, TimeRange};
use court_booking::domain::money::Money;
use court_booking::domain::pricing::DayPeriod;
use court_booking::domain::slot::{SlotSpec, SlotState, WeeklyScheduleTemplate};
use court_booking::domain::identity::Identity;
use court_booking::DomainError;

#[tokio::test]
async fn overlapping_slot_is_rejected() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    engine
        .catalog
        .create_slot(court.id, monday(), t(8, 0), t(9, 0))
        .await
        .unwrap();

    let err = engine
        .catalog
        .create_slot(court.id, monday(), t(8, 30), t(9, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IntervalOverlap(_)), "got {err:?}");

    // Adjacent and other-date slots are fine.
    engine
        .catalog
        .create_slot(court.id, monday(), t(9, 0), t(10, 0))
        .await
        .unwrap();
    engine
        .catalog
        .create_slot(court.id, d(2026, 10, 20), t(8, 30), t(9, 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn malformed_interval_and_unknown_court() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    let err = engine
        .catalog
        .create_slot(court.id, monday(), t(8, 0), t(8, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = engine
        .catalog
        .create_slot(999, monday(), t(8, 0), t(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Court", .. }));
}

#[tokio::test]
async fn bulk_insert_is_all_or_nothing() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    let specs = vec![
        SlotSpec::new(monday(), hours(8, 9)),
        SlotSpec::new(monday(), hours(10, 11)),
        SlotSpec::new(monday(), TimeRange::new(t(10, 30), t(11, 30)).unwrap()),
    ];
    let err = engine
        .catalog
        .create_slots_bulk(court.id, &specs)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IntervalOverlap(_)));

    let stored = engine
        .catalog
        .list_slots(court.id, DateWindow::days(monday(), 1))
        .await
        .unwrap();
    assert!(stored.is_empty(), "no partial insert expected");

    let ids = engine
        .catalog
        .create_slots_bulk(court.id, &specs[..2])
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn slots_are_priced_by_period_and_override() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    let specs = vec![
        SlotSpec::new(monday(), hours(9, 10)),
        SlotSpec::new(monday(), hours(20, 22)),
        SlotSpec {
            price_override: Some(Money::from_minor(1_234)),
            ..SlotSpec::new(monday(), hours(12, 13))
        },
    ];
    engine.catalog.create_slots_bulk(court.id, &specs).await.unwrap();

    let slots = engine
        .catalog
        .list_slots(court.id, DateWindow::days(monday(), 1))
        .await
        .unwrap();
    assert_eq!(slots.len(), 3);

    assert_eq!(slots[0].period, DayPeriod::Daytime);
    assert_eq!(slots[0].price, Money::from_minor(COURT_DAY_RATE));

    assert_eq!(slots[1].range, hours(12, 13));
    assert_eq!(slots[1].price, Money::from_minor(1_234));

    assert_eq!(slots[2].period, DayPeriod::Nighttime);
    assert_eq!(slots[2].price, Money::from_minor(2 * COURT_NIGHT_RATE));
}

#[tokio::test]
async fn complex_rates_and_cutoff_apply_to_rateless_court() {
    let engine = setup().await;
    let (_, court) = seed_complex_court(&engine).await;

    // Complex cutoff is 19:00, so 18:00 is still daytime.
    seed_slots(&engine, court.id, monday(), &[18, 19]).await;
    let slots = engine
        .catalog
        .list_slots(court.id, DateWindow::days(monday(), 1))
        .await
        .unwrap();

    assert_eq!(slots[0].period, DayPeriod::Daytime);
    assert_eq!(slots[0].price, Money::from_minor(8_000));
    assert_eq!(slots[1].period, DayPeriod::Nighttime);
    assert_eq!(slots[1].price, Money::from_minor(12_000));
}

#[tokio::test]
async fn monday_morning_template_generates_four_daytime_slots() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    let templates = [WeeklyScheduleTemplate {
        court_id: court.id,
        weekday: Weekday::Mon,
        range: hours(6, 10),
    }];
    // Horizon of one week from tomorrow contains exactly one Monday.
    let generated = engine
        .catalog
        .generate_recurring_slots(court.id, &templates, 7, Some(18))
        .await
        .unwrap();
    assert_eq!(generated.count, 4);
    assert_eq!(generated.slot_ids.len(), 4);

    let slots = engine
        .catalog
        .list_slots(court.id, DateWindow::days(engine.policy.tomorrow(), 7))
        .await
        .unwrap();
    assert_eq!(slots.len(), 4);
    assert!(slots.iter().all(|s| s.date == monday()));
    assert!(slots.iter().all(|s| s.is_daytime()));
    assert!(slots.iter().all(|s| s.range.duration_minutes() == 60));
    assert!(slots.iter().all(|s| s.state == SlotState::Available));
}

#[tokio::test]
async fn generation_without_matching_day_creates_nothing() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    // Tomorrow is Saturday; two days never reach a Wednesday.
    let templates = [WeeklyScheduleTemplate {
        court_id: court.id,
        weekday: Weekday::Wed,
        range: hours(8, 12),
    }];
    let generated = engine
        .catalog
        .generate_recurring_slots(court.id, &templates, 2, None)
        .await
        .unwrap();
    assert_eq!(generated.count, 0);
    assert!(generated.slot_ids.is_empty());
}

#[tokio::test]
async fn generation_rejects_unbounded_horizon() {
    let engine = setup().await;
    let court = seed_court(&engine).await;

    let templates = [WeeklyScheduleTemplate {
        court_id: court.id,
        weekday: Weekday::Mon,
        range: hours(6, 10),
    }];
    for horizon in [0, 367, u32::MAX] {
        let err = engine
            .catalog
            .generate_recurring_slots(court.id, &templates, horizon, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "horizon {horizon}: {err:?}");
    }

    let slots = engine
        .catalog
        .list_slots(court.id, DateWindow::days(engine.policy.tomorrow(), 366))
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn generation_rejects_overlap_with_existing_slots() {
    let engine = setup().await;
    let court = seed_court(&engine).await;
    seed_slots(&engine, court.id, monday(), &[7]).await;

    let templates = [WeeklyScheduleTemplate {
        court_id: court.id,
        weekday: Weekday::Mon,
        range: hours(6, 10),
    }];
    let err = engine
        .catalog
        .generate_recurring_slots(court.id, &templates, 7, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IntervalOverlap(_)));

    let slots = engine
        .catalog
        .list_slots(court.id, DateWindow::days(monday(), 1))
        .await
        .unwrap();
    assert_eq!(slots.len(), 1);
}

#[tokio::test]
async fn blocking_skips_reserved_slots() {
    let engine = setup().await;
    let court = seed_court(&engine).await;
    let ids = seed_slots(&engine, court.id, monday(), &[8, 9, 10, 11]).await;

    engine
        .reservations
        .create(&Identity::player(PLAYER), &ids[..1])
        .await
        .unwrap();

    let window = DateWindow::days(monday(), 1);
    let blocked = engine
        .catalog
        .set_availability(court.id, window, false, None)
        .await
        .unwrap();
    assert_eq!(blocked, 3);

    let available = engine.catalog.available_slot_ids(court.id, window).await.unwrap();
    assert!(available.is_empty());

    let slots = engine.catalog.list_slots(court.id, window).await.unwrap();
    assert!(slots[0].is_reserved());
    assert!(slots[1..].iter().all(|s| s.state == SlotState::Blocked));

    // Reopen only the late morning.
    let reopened = engine
        .catalog
        .set_availability(court.id, window, true, Some(hours(10, 12)))
        .await
        .unwrap();
    assert_eq!(reopened, 2);

    let available = engine.catalog.available_slot_ids(court.id, window).await.unwrap();
    assert_eq!(available.len(), 2);
    assert!(available.contains(&ids[2]) && available.contains(&ids[3]));
}
