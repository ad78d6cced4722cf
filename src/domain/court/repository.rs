//! Court repository interface

use async_trait::async_trait;

use super::model::{Complex, Court};
use crate::domain::DomainResult;

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn find_court(&self, id: i32) -> DomainResult<Option<Court>>;

    async fn find_complex(&self, id: i32) -> DomainResult<Option<Complex>>;

    /// Insert a complex; `id` of the argument is ignored.
    async fn save_complex(&self, complex: Complex) -> DomainResult<Complex>;

    /// Insert a court; `id` of the argument is ignored.
    async fn save_court(&self, court: Court) -> DomainResult<Court>;
}
