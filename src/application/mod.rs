pub mod services;

// Re-export key types for convenience
pub use services::{
    start_payment_expiry_task, GeneratedSlots, PaymentService, ReservationService, SlotCatalog,
};
