// src/risk.rs
use serde::{Deserialize, Serialize};

/// Convertibility band of the peg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PegBand {
    pub lower: f64,
    pub upper: f64,
}

pub const PEG_BAND: PegBand = PegBand { lower: 7.75, upper: 7.85 };

/// Spot levels past which the monetary authority is expected to step in.
pub const USD_SELL_TRIGGER: f64 = 7.84;
pub const USD_BUY_TRIGGER: f64 = 7.76;

impl PegBand {
    /// Where `spot` sits in the band: 0.0 at the strong side, 1.0 at the weak
    /// side, clamped.
    pub fn position(&self, spot: f64) -> f64 {
        ((spot - self.lower) / (self.upper - self.lower)).clamp(0.0, 1.0)
    }

    pub fn contains(&self, spot: f64) -> bool {
        (self.lower..=self.upper).contains(&spot)
    }
}

/// Informational flag near the band edges. Never changes the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionAdvisory {
    /// Spot near the weak-side convertibility undertaking.
    ProbableUsdSell,
    /// Spot near the strong-side convertibility undertaking.
    ProbableUsdBuy,
}

impl InterventionAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            InterventionAdvisory::ProbableUsdSell => "probable intervention (USD sell)",
            InterventionAdvisory::ProbableUsdBuy => "probable intervention (USD buy)",
        }
    }
}

pub fn advisory_for(spot: f64) -> Option<InterventionAdvisory> {
    if spot > USD_SELL_TRIGGER {
        Some(InterventionAdvisory::ProbableUsdSell)
    } else if spot < USD_BUY_TRIGGER {
        Some(InterventionAdvisory::ProbableUsdBuy)
    } else {
        None
    }
}
