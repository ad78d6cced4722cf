//! Day/night classification and slot pricing

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::calendar::TimeRange;
use super::money::Money;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Tariff period of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPeriod {
    Daytime,
    Nighttime,
}

impl DayPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daytime => "Daytime",
            Self::Nighttime => "Nighttime",
        }
    }

    pub fn is_daytime(&self) -> bool {
        *self == Self::Daytime
    }
}

impl std::fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify `time` on a circular 24h wheel: `[day_start, cutoff)` is
/// daytime, `[cutoff, day_start)` wrapping through midnight is nighttime.
///
/// When `day_start == cutoff` there is no night at all.
pub fn classify(time: NaiveTime, day_start: NaiveTime, cutoff: NaiveTime) -> DayPeriod {
    let secs = |t: NaiveTime| i64::from(t.num_seconds_from_midnight());
    let day_len = (secs(cutoff) - secs(day_start)).rem_euclid(SECONDS_PER_DAY);
    if day_len == 0 {
        return DayPeriod::Daytime;
    }
    let offset = (secs(time) - secs(day_start)).rem_euclid(SECONDS_PER_DAY);
    if offset < day_len {
        DayPeriod::Daytime
    } else {
        DayPeriod::Nighttime
    }
}

/// Optional hourly rates attached to a court or a complex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    pub daytime: Option<Money>,
    pub nighttime: Option<Money>,
}

impl RateCard {
    pub fn new(daytime: Option<Money>, nighttime: Option<Money>) -> Self {
        Self { daytime, nighttime }
    }

    pub fn rate_for(&self, period: DayPeriod) -> Option<Money> {
        match period {
            DayPeriod::Daytime => self.daytime,
            DayPeriod::Nighttime => self.nighttime,
        }
    }
}

/// Where the price of a slot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    SlotOverride,
    Court,
    Complex,
    Default,
}

/// Inputs of the rate fallback chain for one slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateChain<'a> {
    /// Explicit flat price for this slot; wins over every rate.
    pub slot_override: Option<Money>,
    pub court: Option<&'a RateCard>,
    pub complex: Option<&'a RateCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub period: DayPeriod,
    pub source: RateSource,
    pub price: Money,
}

/// Prices slots from hourly rates.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    day_start: NaiveTime,
    default_cutoff_hour: u32,
    defaults: RateCard,
}

impl PricingEngine {
    pub fn new(
        day_start_hour: u32,
        default_cutoff_hour: u32,
        default_daytime_rate: Money,
        default_nighttime_rate: Money,
    ) -> Self {
        Self {
            day_start: hour(day_start_hour),
            default_cutoff_hour: default_cutoff_hour % 24,
            defaults: RateCard::new(Some(default_daytime_rate), Some(default_nighttime_rate)),
        }
    }

    pub fn default_cutoff_hour(&self) -> u32 {
        self.default_cutoff_hour
    }

    pub fn classify(&self, time: NaiveTime, cutoff_hour: u32) -> DayPeriod {
        classify(time, self.day_start, hour(cutoff_hour))
    }

    /// Price `range` as `rate × duration`, where the slot is classified by
    /// its start time and `rate` comes from the first link of `chain` that
    /// defines one.
    pub fn price(&self, range: &TimeRange, cutoff_hour: u32, chain: RateChain<'_>) -> Quote {
        let period = self.classify(range.start, cutoff_hour);

        if let Some(price) = chain.slot_override {
            return Quote {
                period,
                source: RateSource::SlotOverride,
                price,
            };
        }

        let (rate, source) = chain
            .court
            .and_then(|c| c.rate_for(period))
            .map(|r| (r, RateSource::Court))
            .or_else(|| {
                chain
                    .complex
                    .and_then(|c| c.rate_for(period))
                    .map(|r| (r, RateSource::Complex))
            })
            .unwrap_or_else(|| {
                (
                    self.defaults.rate_for(period).unwrap_or(Money::ZERO),
                    RateSource::Default,
                )
            });

        Quote {
            period,
            source,
            price: Money::hourly_for_minutes(rate, range.duration_minutes()),
        }
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h % 24, 0, 0).unwrap_or(NaiveTime::MIN)
}
