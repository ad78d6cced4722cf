//! Domain layer: entities, value types, rules and repository interfaces

pub mod calendar;
pub mod court;
pub mod identity;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod repositories;
pub mod reservation;
pub mod slot;

pub use calendar::{BookingPolicy, Clock, DateWindow, TimeRange};
pub use court::{Complex, Court, CourtContext};
pub use identity::{Identity, Role};
pub use money::Money;
pub use payment::{Decision, Payment, PaymentState};
pub use pricing::{DayPeriod, PricingEngine, RateCard};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{BookingMode, Reservation, ReservationItem, ReservationState};
pub use slot::{Slot, SlotState};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, ErrorKind};
