mod common;

use chrono::{Duration, Utc};

use common::*;
use court_booking::application::services::EXPIRY_ACTOR;
use court_booking::domain::identity::Identity;
use court_booking::domain::payment::PaymentState;
use court_booking::domain::reservation::{BindOutcome, ReservationState};
use court_booking::DomainError;

async fn booked(engine: &TestEngine, starts: &[u32]) -> (BindOutcome, Vec<i32>) {
    let court = seed_court(engine).await;
    let ids = seed_slots(engine, court.id, monday(), starts).await;
    let outcome = engine
        .reservations
        .create(&Identity::player(PLAYER), &ids)
        .await
        .unwrap();
    (outcome, ids)
}

#[tokio::test]
async fn reject_cancels_reservation_and_frees_every_slot() {
    let engine = setup().await;
    let (outcome, ids) = booked(&engine, &[9, 10, 11]).await;

    let payment = engine
        .payments
        .reject(&Identity::admin(COURT_ADMIN), outcome.payment.id)
        .await
        .unwrap();
    assert_eq!(payment.state, PaymentState::Rejected);
    assert_eq!(payment.settled_by.as_deref(), Some(COURT_ADMIN));
    assert!(payment.settled_at.is_some());

    let reservation = engine.reservations.get(outcome.reservation.id).await.unwrap();
    assert_eq!(reservation.state, ReservationState::Cancelled);
    assert!(reservation.active_slot_ids().is_empty());

    let slots = engine.repos.slots().find_by_ids(&ids).await.unwrap();
    assert!(slots.iter().all(|s| s.is_available()));

    engine
        .reservations
        .create(&Identity::player(OTHER_PLAYER), &ids)
        .await
        .unwrap();
}

#[tokio::test]
async fn confirm_is_terminal() {
    let engine = setup().await;
    let (outcome, ids) = booked(&engine, &[9]).await;
    let admin = Identity::admin(COURT_ADMIN);

    let payment = engine.payments.confirm(&admin, outcome.payment.id).await.unwrap();
    assert_eq!(payment.state, PaymentState::Confirmed);

    let reservation = engine.reservations.get(outcome.reservation.id).await.unwrap();
    assert_eq!(reservation.state, ReservationState::Confirmed);
    let slot = engine.repos.slots().find_by_id(ids[0]).await.unwrap().unwrap();
    assert!(slot.is_reserved());

    for result in [
        engine.payments.confirm(&admin, outcome.payment.id).await,
        engine.payments.reject(&admin, outcome.payment.id).await,
    ] {
        assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
    }

    let err = engine
        .reservations
        .cancel(&Identity::player(PLAYER), outcome.reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn only_the_owning_admin_may_decide() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;
    let payment_id = outcome.payment.id;

    let err = engine
        .payments
        .confirm(&Identity::player(COURT_ADMIN), payment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)), "player role must not decide");

    let err = engine
        .payments
        .reject(&Identity::admin(COMPLEX_ADMIN), payment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)), "foreign admin must not decide");

    let err = engine
        .payments
        .confirm(&Identity::admin(COURT_ADMIN), 999)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Payment", .. }));

    let payment = engine.payments.get(payment_id).await.unwrap();
    assert_eq!(payment.state, PaymentState::Pending);
}

#[tokio::test]
async fn complex_admin_decides_for_courts_in_complex() {
    let engine = setup().await;
    let (_, court) = seed_complex_court(&engine).await;
    let ids = seed_slots(&engine, court.id, monday(), &[19]).await;
    let outcome = engine
        .reservations
        .create(&Identity::player(PLAYER), &ids)
        .await
        .unwrap();

    let err = engine
        .payments
        .confirm(&Identity::admin(COURT_ADMIN), outcome.payment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let payment = engine
        .payments
        .confirm(&Identity::admin(COMPLEX_ADMIN), outcome.payment.id)
        .await
        .unwrap();
    assert_eq!(payment.state, PaymentState::Confirmed);
}

#[tokio::test]
async fn concurrent_decisions_have_one_winner() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;
    let admin = Identity::admin(COURT_ADMIN);

    let (confirm, reject) = tokio::join!(
        engine.payments.confirm(&admin, outcome.payment.id),
        engine.payments.reject(&admin, outcome.payment.id),
    );
    assert_eq!([confirm.is_ok(), reject.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let loser = confirm.err().or(reject.err()).unwrap();
    assert!(matches!(loser, DomainError::InvalidStateTransition(_)), "got {loser:?}");
}

#[tokio::test]
async fn proof_is_attached_by_owner_only() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;
    let owner = Identity::player(PLAYER);
    let payment_id = outcome.payment.id;

    let err = engine
        .payments
        .attach_proof(&Identity::player(OTHER_PLAYER), payment_id, "receipts/1.png", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = engine
        .payments
        .attach_proof(&owner, payment_id, "  ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let payment = engine
        .payments
        .attach_proof(&owner, payment_id, "receipts/1.png", Some("qr/admin-court.png"))
        .await
        .unwrap();
    assert_eq!(payment.state, PaymentState::Pending);
    assert!(payment.has_proof());
    assert_eq!(payment.qr_ref.as_deref(), Some("qr/admin-court.png"));

    engine
        .payments
        .confirm(&Identity::admin(COURT_ADMIN), payment_id)
        .await
        .unwrap();
    let err = engine
        .payments
        .attach_proof(&owner, payment_id, "receipts/2.png", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn create_returns_the_single_payment() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;

    let payment = engine.payments.create(outcome.reservation.id).await.unwrap();
    assert_eq!(payment.id, outcome.payment.id);

    let again = engine.payments.create(outcome.reservation.id).await.unwrap();
    assert_eq!(again.id, outcome.payment.id);

    let err = engine.payments.create(999).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Reservation", .. }));
}

#[tokio::test]
async fn decisions_after_cancel_are_rejected() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;
    engine
        .reservations
        .cancel(&Identity::player(PLAYER), outcome.reservation.id)
        .await
        .unwrap();

    let err = engine
        .payments
        .confirm(&Identity::admin(COURT_ADMIN), outcome.payment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn stale_payments_without_proof_expire() {
    let engine = setup().await;
    let court = seed_court(&engine).await;
    let ids = seed_slots(&engine, court.id, monday(), &[9, 10]).await;

    let quiet = engine
        .reservations
        .create(&Identity::player(PLAYER), &ids[..1])
        .await
        .unwrap();
    let with_proof = engine
        .reservations
        .create(&Identity::player(OTHER_PLAYER), &ids[1..])
        .await
        .unwrap();
    engine
        .payments
        .attach_proof(&Identity::player(OTHER_PLAYER), with_proof.payment.id, "receipts/9.png", None)
        .await
        .unwrap();

    let ttl = Duration::hours(24);
    assert_eq!(engine.payments.expire_stale(Utc::now(), ttl).await.unwrap(), 0);

    let later = Utc::now() + Duration::hours(25);
    assert_eq!(engine.payments.expire_stale(later, ttl).await.unwrap(), 1);

    let expired = engine.payments.get(quiet.payment.id).await.unwrap();
    assert_eq!(expired.state, PaymentState::Rejected);
    assert_eq!(expired.settled_by.as_deref(), Some(EXPIRY_ACTOR));
    let slot = engine.repos.slots().find_by_id(ids[0]).await.unwrap().unwrap();
    assert!(slot.is_available());

    let kept = engine.payments.get(with_proof.payment.id).await.unwrap();
    assert_eq!(kept.state, PaymentState::Pending);
}

#[tokio::test]
async fn proof_attached_after_stale_scan_survives_expiry() {
    let engine = setup().await;
    let (outcome, ids) = booked(&engine, &[9]).await;

    let later = Utc::now() + Duration::hours(25);
    let stale = engine
        .repos
        .payments()
        .find_stale_pending(later - Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(stale.len(), 1);

    // Owner uploads the receipt between the scan and the expiry write.
    engine
        .payments
        .attach_proof(&Identity::player(PLAYER), outcome.payment.id, "receipts/late.png", None)
        .await
        .unwrap();

    let skipped = engine
        .repos
        .payments()
        .expire(stale[0].id, EXPIRY_ACTOR, later)
        .await
        .unwrap();
    assert!(skipped.is_none());

    let payment = engine.payments.get(outcome.payment.id).await.unwrap();
    assert_eq!(payment.state, PaymentState::Pending);
    assert_eq!(payment.proof_ref.as_deref(), Some("receipts/late.png"));
    let reservation = engine.reservations.get(outcome.reservation.id).await.unwrap();
    assert_eq!(reservation.state, ReservationState::Pending);
    let slot = engine.repos.slots().find_by_id(ids[0]).await.unwrap().unwrap();
    assert!(!slot.is_available());
}

#[tokio::test]
async fn expiry_skips_payment_settled_after_scan() {
    let engine = setup().await;
    let (outcome, _) = booked(&engine, &[9]).await;

    engine
        .payments
        .confirm(&Identity::admin(COURT_ADMIN), outcome.payment.id)
        .await
        .unwrap();

    let skipped = engine
        .repos
        .payments()
        .expire(outcome.payment.id, EXPIRY_ACTOR, Utc::now())
        .await
        .unwrap();
    assert!(skipped.is_none());
    let payment = engine.payments.get(outcome.payment.id).await.unwrap();
    assert_eq!(payment.state, PaymentState::Confirmed);
}
