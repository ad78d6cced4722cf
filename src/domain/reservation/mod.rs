//! Reservation aggregate
//!
//! Contains the Reservation entity, recurring patterns, and repository interface.

pub mod model;
pub mod recurrence;
pub mod repository;

pub use model::{
    BindOutcome, BindRequest, BookingMode, Reservation, ReservationItem, ReservationState,
    SlotClaim,
};
pub use recurrence::{
    match_slots, DatedRange, MissingReason, MissingSlot, RecurrencePattern, RecurringBooking,
    RecurringQuote, RecurringRequest, WeeklyRule,
};
pub use repository::ReservationRepository;
