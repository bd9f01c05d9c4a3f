//! Strategy Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named strategy a trade's leg composition represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Not classified yet.
    #[default]
    Undefined,
    /// Long shares only.
    LongStock,
    /// Short shares only.
    ShortStock,
    /// Long bonds.
    LongBond,
    /// Long shares with a short call struck below their average cost.
    BuyWrite,
    /// Long shares with a short call struck at or above their average cost.
    CoveredShortCall,
    /// More short options than long ones on the same side.
    FrontRatioSpread,
    /// Short puts only.
    ShortPut,
    /// Long puts only.
    LongPut,
    /// Short calls only.
    NakedShortCall,
    /// Long calls only.
    LongCall,
    /// Long calls financed by short puts.
    RiskReversal,
    /// Short calls and short puts.
    ShortStrangle,
    /// Long calls and long puts.
    LongStrangle,
    /// Balanced call spread and put spread.
    IronCondor,
    /// Vertical spread that profits from a falling underlying.
    BearSpread,
    /// Vertical spread that profits from a rising underlying.
    BullSpread,
    /// Short put assigned into stock, then covered calls sold against it.
    TheWheel,
}

impl Strategy {
    /// Whether a strategy has been assigned.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Whether the strategy can still be refined into [`Strategy::TheWheel`].
    #[must_use]
    pub const fn is_wheel_candidate(&self) -> bool {
        matches!(self, Self::ShortPut | Self::RiskReversal)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::LongStock => write!(f, "Long Stock"),
            Self::ShortStock => write!(f, "Short Stock"),
            Self::LongBond => write!(f, "Long Bond"),
            Self::BuyWrite => write!(f, "Buy Write"),
            Self::CoveredShortCall => write!(f, "Covered Short Call"),
            Self::FrontRatioSpread => write!(f, "Front Ratio Spread"),
            Self::ShortPut => write!(f, "Short Put"),
            Self::LongPut => write!(f, "Long Put"),
            Self::NakedShortCall => write!(f, "Naked Short Call"),
            Self::LongCall => write!(f, "Long Call"),
            Self::RiskReversal => write!(f, "Risk Reversal"),
            Self::ShortStrangle => write!(f, "Short Strangle"),
            Self::LongStrangle => write!(f, "Long Strangle"),
            Self::IronCondor => write!(f, "Iron Condor"),
            Self::BearSpread => write!(f, "Bear Spread"),
            Self::BullSpread => write!(f, "Bull Spread"),
            Self::TheWheel => write!(f, "The Wheel"),
        }
    }
}
