//! Database entities module

pub mod complex;
pub mod court;
pub mod payment;
pub mod reservation;
pub mod reservation_item;
pub mod slot;

pub use complex::Entity as Complex;
pub use court::Entity as Court;
pub use payment::Entity as Payment;
pub use reservation::Entity as Reservation;
pub use reservation_item::Entity as ReservationItem;
pub use slot::Entity as Slot;
