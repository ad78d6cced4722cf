//! Reservation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identity::Identity;
use crate::domain::money::Money;
use crate::domain::payment::Payment;
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationState {
    /// Slots are held, payment not yet decided
    Pending,
    /// Payment confirmed by the court admin
    Confirmed,
    /// Cancelled by the owner or by a rejected payment
    Cancelled,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binding of one slot to one reservation at a locked price.
///
/// Released items stay attached to their reservation as history but no
/// longer occupy the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationItem {
    pub id: i32,
    pub reservation_id: i32,
    pub slot_id: i32,
    pub locked_price: Money,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub user_id: String,
    pub state: ReservationState,
    pub items: Vec<ReservationItem>,
    /// Always the sum of the items' locked prices
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.user_id == identity.user_id
    }

    pub fn is_pending(&self) -> bool {
        self.state == ReservationState::Pending
    }

    pub fn items_total(&self) -> Money {
        self.items.iter().map(|i| i.locked_price).sum()
    }

    /// Slots of every item, released or not
    pub fn slot_ids(&self) -> Vec<i32> {
        self.items.iter().map(|i| i.slot_id).collect()
    }

    /// Slots this reservation currently occupies
    pub fn active_slot_ids(&self) -> Vec<i32> {
        self.items
            .iter()
            .filter(|i| i.active)
            .map(|i| i.slot_id)
            .collect()
    }

    pub fn ensure_pending(&self) -> DomainResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition(format!(
                "reservation {} is {}",
                self.id, self.state
            )))
        }
    }

    /// Owner check first, then state: only a pending reservation can be
    /// cancelled by its user.
    pub fn ensure_cancellable_by(&self, identity: &Identity) -> DomainResult<()> {
        if !self.is_owned_by(identity) {
            return Err(DomainError::Forbidden(format!(
                "reservation {} does not belong to {}",
                self.id, identity.user_id
            )));
        }
        self.ensure_pending()
    }
}

/// Consistency policy when binding several slots into one reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingMode {
    /// Every slot binds or nothing does; any taken slot fails the whole
    /// request with `SlotUnavailable`.
    AllOrNothing,
    /// Bind whatever is still free; taken slots are skipped and reported.
    BestEffort,
}

/// One slot to bind, with the price to lock in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotClaim {
    pub slot_id: i32,
    pub price: Money,
}

#[derive(Debug, Clone)]
pub struct BindRequest {
    pub user_id: String,
    pub claims: Vec<SlotClaim>,
    pub mode: BookingMode,
}

#[derive(Debug, Clone)]
pub struct BindOutcome {
    pub reservation: Reservation,
    pub payment: Payment,
    /// Slots skipped in `BestEffort` mode because they were no longer free
    pub skipped: Vec<i32>,
}

// ── Tests ──────────────────────────────────────────────────────
