//! # Court Booking Engine
//!
//! Slot reservation and payment confirmation for sports courts.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Slots, reservations, payments, pricing rules and repository traits
//! - **application**: Slot catalog, reservation and payment services, expiry task
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **shared**: Error types and shutdown signal
//!
//! A slot is bound to at most one active reservation item. Binding happens in
//! one database transaction guarded by a conditional status update and a
//! unique index, so of two concurrent bookings of the same slot exactly one
//! commits.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, Migrator, SeaOrmRepositoryProvider};

pub use application::services::{PaymentService, ReservationService, SlotCatalog};
pub use shared::errors::{DomainError, DomainResult, ErrorKind};
