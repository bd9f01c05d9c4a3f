//! Contract Descriptor Value Object

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ledger::errors::LedgerError;
use crate::domain::shared::ContractId;

/// Default contract multiplier for equity options.
pub const DEFAULT_OPTION_MULTIPLIER: u32 = 100;

/// Security type of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecType {
    /// Common stock or ETF.
    Stock,
    /// Bond, quoted per lot.
    Bond,
    /// Listed equity/index option.
    Option,
    /// Option on a future.
    FutureOption,
    /// Future.
    Future,
    /// Cash balance or FX.
    Cash,
}

impl SecType {
    /// Whether contracts of this type carry option terms.
    #[must_use]
    pub const fn is_option(self) -> bool {
        matches!(self, Self::Option | Self::FutureOption)
    }
}

impl fmt::Display for SecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => write!(f, "STOCK"),
            Self::Bond => write!(f, "BOND"),
            Self::Option => write!(f, "OPTION"),
            Self::FutureOption => write!(f, "FUTURE_OPTION"),
            Self::Future => write!(f, "FUTURE"),
            Self::Cash => write!(f, "CASH"),
        }
    }
}

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Terms carried by option contracts only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTerms {
    /// Call or put.
    pub right: OptionRight,
    /// Strike price (always positive).
    pub strike: Decimal,
    /// Contract multiplier (always positive).
    pub multiplier: u32,
    /// Last trading day.
    pub expiry: NaiveDate,
}

/// Immutable description of a tradeable contract.
///
/// Options always carry valid [`OptionTerms`]; every other security type never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContract", into = "RawContract")]
pub struct ContractDescriptor {
    id: ContractId,
    symbol: String,
    currency: String,
    sec_type: SecType,
    option: Option<OptionTerms>,
}

impl ContractDescriptor {
    /// Build a contract from loosely-typed parts, enforcing the option-terms invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn try_from_parts(
        id: ContractId,
        symbol: impl Into<String>,
        currency: impl Into<String>,
        sec_type: SecType,
        right: Option<OptionRight>,
        strike: Option<Decimal>,
        multiplier: Option<u32>,
        expiry: Option<NaiveDate>,
    ) -> Result<Self, LedgerError> {
        let option = if sec_type.is_option() {
            let right = right.ok_or(LedgerError::MissingOptionTerms {
                contract_id: id,
                field: "right",
            })?;
            let strike = strike.ok_or(LedgerError::MissingOptionTerms {
                contract_id: id,
                field: "strike",
            })?;
            let expiry = expiry.ok_or(LedgerError::MissingOptionTerms {
                contract_id: id,
                field: "expiry",
            })?;
            let multiplier = multiplier.unwrap_or(DEFAULT_OPTION_MULTIPLIER);

            if strike <= Decimal::ZERO {
                return Err(LedgerError::InvalidOptionTerms {
                    contract_id: id,
                    message: format!("strike must be positive, got {strike}"),
                });
            }
            if multiplier == 0 {
                return Err(LedgerError::InvalidOptionTerms {
                    contract_id: id,
                    message: "multiplier must be positive".to_string(),
                });
            }

            Some(OptionTerms {
                right,
                strike,
                multiplier,
                expiry,
            })
        } else {
            if right.is_some() || strike.is_some() {
                return Err(LedgerError::UnexpectedOptionTerms {
                    contract_id: id,
                    sec_type,
                });
            }
            None
        };

        Ok(Self {
            id,
            symbol: symbol.into(),
            currency: currency.into(),
            sec_type,
            option,
        })
    }

    /// Create a USD stock contract.
    #[must_use]
    pub fn stock(id: ContractId, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            currency: "USD".to_string(),
            sec_type: SecType::Stock,
            option: None,
        }
    }

    /// Create a USD bond contract.
    #[must_use]
    pub fn bond(id: ContractId, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            currency: "USD".to_string(),
            sec_type: SecType::Bond,
            option: None,
        }
    }

    /// Create a USD option contract with the default multiplier.
    pub fn option(
        id: ContractId,
        symbol: impl Into<String>,
        right: OptionRight,
        strike: Decimal,
        expiry: NaiveDate,
    ) -> Result<Self, LedgerError> {
        Self::try_from_parts(
            id,
            symbol,
            "USD",
            SecType::Option,
            Some(right),
            Some(strike),
            None,
            Some(expiry),
        )
    }

    /// Get the contract id.
    #[must_use]
    pub const fn id(&self) -> ContractId {
        self.id
    }

    /// Get the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the trading currency.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Get the security type.
    #[must_use]
    pub const fn sec_type(&self) -> SecType {
        self.sec_type
    }

    /// Get the option terms, if this is an option.
    #[must_use]
    pub const fn option_terms(&self) -> Option<&OptionTerms> {
        self.option.as_ref()
    }

    /// Get the strike price, if this is an option.
    #[must_use]
    pub fn strike(&self) -> Option<Decimal> {
        self.option.map(|o| o.strike)
    }

    /// Get the option right, if this is an option.
    #[must_use]
    pub fn right(&self) -> Option<OptionRight> {
        self.option.map(|o| o.right)
    }

    /// Get the expiry date, if this is an option.
    #[must_use]
    pub fn expiry(&self) -> Option<NaiveDate> {
        self.option.map(|o| o.expiry)
    }

    /// Units per quantity: the option multiplier, or 1 for everything else.
    #[must_use]
    pub fn multiplier(&self) -> u32 {
        self.option.map_or(1, |o| o.multiplier)
    }

    /// Check if this is an option (listed or on a future).
    #[must_use]
    pub const fn is_option(&self) -> bool {
        self.option.is_some()
    }

    /// Check if this is a call option.
    #[must_use]
    pub fn is_call(&self) -> bool {
        self.right() == Some(OptionRight::Call)
    }

    /// Check if this is a put option.
    #[must_use]
    pub fn is_put(&self) -> bool {
        self.right() == Some(OptionRight::Put)
    }
}

impl fmt::Display for ContractDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.option {
            Some(terms) => write!(
                f,
                "{} {} {} {}",
                self.symbol, terms.expiry, terms.strike, terms.right
            ),
            None => write!(f, "{} ({})", self.symbol, self.sec_type),
        }
    }
}

/// Flat serialized form of a contract row.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawContract {
    id: ContractId,
    symbol: String,
    #[serde(default = "default_currency")]
    currency: String,
    sec_type: SecType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right: Option<OptionRight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strike: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiplier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<NaiveDate>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl TryFrom<RawContract> for ContractDescriptor {
    type Error = LedgerError;

    fn try_from(raw: RawContract) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            raw.id,
            raw.symbol,
            raw.currency,
            raw.sec_type,
            raw.right,
            raw.strike,
            raw.multiplier,
            raw.expiry,
        )
    }
}

impl From<ContractDescriptor> for RawContract {
    fn from(contract: ContractDescriptor) -> Self {
        Self {
            id: contract.id,
            symbol: contract.symbol,
            currency: contract.currency,
            sec_type: contract.sec_type,
            right: contract.option.map(|o| o.right),
            strike: contract.option.map(|o| o.strike),
            multiplier: contract.option.map(|o| o.multiplier),
            expiry: contract.option.map(|o| o.expiry),
        }
    }
}
