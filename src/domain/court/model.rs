//! Court and complex records

use serde::{Deserialize, Serialize};

use crate::domain::identity::Identity;
use crate::domain::pricing::{RateCard, RateChain};
use crate::domain::money::Money;

/// Group of courts under one administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complex {
    pub id: i32,
    pub name: String,
    pub admin_id: String,
    pub rates: RateCard,
    pub cutoff_hour: Option<u32>,
}

/// Bookable court, standalone or part of a complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: i32,
    pub name: String,
    pub complex_id: Option<i32>,
    /// Administrator of a standalone court. Ignored when `complex_id` is set.
    pub admin_id: Option<String>,
    pub rates: RateCard,
    pub cutoff_hour: Option<u32>,
}

impl Court {
    pub fn standalone(name: impl Into<String>, admin_id: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            complex_id: None,
            admin_id: Some(admin_id.into()),
            rates: RateCard::default(),
            cutoff_hour: None,
        }
    }

    pub fn in_complex(name: impl Into<String>, complex_id: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            complex_id: Some(complex_id),
            admin_id: None,
            rates: RateCard::default(),
            cutoff_hour: None,
        }
    }

    pub fn with_rates(mut self, daytime: Option<Money>, nighttime: Option<Money>) -> Self {
        self.rates = RateCard::new(daytime, nighttime);
        self
    }
}

/// A court together with its parent complex, if any.
#[derive(Debug, Clone)]
pub struct CourtContext {
    pub court: Court,
    pub complex: Option<Complex>,
}

impl CourtContext {
    /// Administrator owning the court: the complex admin, or the court's own
    /// admin for standalone courts.
    pub fn owner_admin(&self) -> Option<&str> {
        match &self.complex {
            Some(complex) => Some(complex.admin_id.as_str()),
            None => self.court.admin_id.as_deref(),
        }
    }

    pub fn is_administered_by(&self, identity: &Identity) -> bool {
        identity.is_admin() && self.owner_admin() == Some(identity.user_id.as_str())
    }

    /// Cutoff hour: court, then complex, then `default`.
    pub fn cutoff_hour(&self, default: u32) -> u32 {
        self.court
            .cutoff_hour
            .or_else(|| self.complex.as_ref().and_then(|c| c.cutoff_hour))
            .unwrap_or(default)
    }

    pub fn rate_chain(&self, slot_override: Option<Money>) -> RateChain<'_> {
        RateChain {
            slot_override,
            court: Some(&self.court.rates),
            complex: self.complex.as_ref().map(|c| &c.rates),
        }
    }
}
