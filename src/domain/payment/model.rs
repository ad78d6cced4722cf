//! Payment domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::{DomainError, DomainResult};

/// Settlement status of a reservation's bank transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    /// Awaiting transfer or admin decision
    Pending,
    /// Admin confirmed the transfer
    Confirmed,
    /// Admin rejected the transfer; the reservation was cancelled
    Rejected,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin verdict on a pending payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Confirm,
    Reject,
}

impl Decision {
    pub fn target_state(&self) -> PaymentState {
        match self {
            Self::Confirm => PaymentState::Confirmed,
            Self::Reject => PaymentState::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i32,
    pub reservation_id: i32,
    pub state: PaymentState,
    /// Reservation total at the time the payment was opened
    pub amount: Money,
    /// Opaque reference to the uploaded transfer receipt
    pub proof_ref: Option<String>,
    /// Opaque reference to the admin QR image the user paid against
    pub qr_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub settled_by: Option<String>,
}

impl Payment {
    pub fn has_proof(&self) -> bool {
        self.proof_ref.is_some()
    }

    pub fn ensure_pending(&self) -> DomainResult<()> {
        if self.state == PaymentState::Pending {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition(format!(
                "payment {} is already {}",
                self.id, self.state
            )))
        }
    }
}
