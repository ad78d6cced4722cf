//! Court aggregate
//!
//! Read-only bookable-resource hierarchy: courts, optionally grouped into a
//! complex. Supplies rates, cutoff hours and admin ownership.

pub mod model;
pub mod repository;

pub use model::{Complex, Court, CourtContext};
pub use repository::CourtRepository;
