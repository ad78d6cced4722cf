//! Slot repository interface

use async_trait::async_trait;

use super::model::{NewSlot, Slot};
use crate::domain::calendar::{DateWindow, TimeRange};
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Find slot by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Slot>>;

    /// Find all slots among `ids`; unknown ids are simply absent.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Slot>>;

    /// All slots of a court within `window`, ordered by date and start time
    async fn find_for_court(&self, court_id: i32, window: DateWindow) -> DomainResult<Vec<Slot>>;

    /// Insert `slots` in one transaction after checking them against each
    /// other and against stored slots. Any overlap aborts the whole batch.
    async fn insert_batch(&self, court_id: i32, slots: Vec<NewSlot>) -> DomainResult<Vec<Slot>>;

    /// Move unreserved slots of a court between `Available` and `Blocked`.
    /// Reserved slots are never touched. Returns how many slots changed.
    async fn set_availability(
        &self,
        court_id: i32,
        window: DateWindow,
        time_range: Option<TimeRange>,
        available: bool,
    ) -> DomainResult<u64>;
}
