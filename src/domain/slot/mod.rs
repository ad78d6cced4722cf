//! Slot aggregate
//!
//! Contains the Slot entity, its occupancy state and the repository interface.

pub mod model;
pub mod repository;

pub use model::{ensure_no_overlap, NewSlot, Slot, SlotSpec, SlotState, WeeklyScheduleTemplate};
pub use repository::SlotRepository;
