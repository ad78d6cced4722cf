//! Payment aggregate
//!
//! Out-of-band settlement of a reservation, decided by the court admin.

pub mod model;
pub mod repository;

pub use model::{Decision, Payment, PaymentState};
pub use repository::PaymentRepository;
