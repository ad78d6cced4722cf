//! Application services

mod payment;
mod payment_expiry;
mod reservation;
mod slot_catalog;

pub use payment::{PaymentService, EXPIRY_ACTOR};
pub use payment_expiry::start_payment_expiry_task;
pub use reservation::ReservationService;
pub use slot_catalog::{GeneratedSlots, SlotCatalog};

use crate::domain::court::CourtContext;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Load a court with its parent complex.
async fn court_context(repos: &dyn RepositoryProvider, court_id: i32) -> DomainResult<CourtContext> {
    let court = repos
        .courts()
        .find_court(court_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Court", "id", court_id))?;

    let complex = match court.complex_id {
        Some(complex_id) => Some(
            repos
                .courts()
                .find_complex(complex_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Complex", "id", complex_id))?,
        ),
        None => None,
    };

    Ok(CourtContext { court, complex })
}
