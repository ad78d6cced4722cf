//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::court::CourtRepository;
use super::payment::PaymentRepository;
use super::reservation::ReservationRepository;
use super::slot::SlotRepository;

pub use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// Every repository shares one connection pool, so slot state written by the
/// catalog, the reservation manager and the payment machine goes through the
/// same transactional store:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let slot = repos.slots().find_by_id(42).await?;
///     let reservation = repos.reservations().find_by_id(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn courts(&self) -> &dyn CourtRepository;
    fn slots(&self) -> &dyn SlotRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn payments(&self) -> &dyn PaymentRepository;
}
