//! # Coins
//!
//! Single-denom [`Coin`] and sorted multi-asset [`Coins`] amounts.
//!
//! Arithmetic is checked: a mismatched denom or an overflow/underflow is an
//! error, never a wrap or a clamp.

use super::errors::SwapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum denom length.
pub const MIN_DENOM_LENGTH: usize = 3;

/// Maximum denom length.
pub const MAX_DENOM_LENGTH: usize = 128;

/// Check denomination syntax: `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), SwapError> {
    let len = denom.len();
    if !(MIN_DENOM_LENGTH..=MAX_DENOM_LENGTH).contains(&len) {
        return Err(SwapError::InvalidDenom(format!(
            "{denom:?}: length must be within [{MIN_DENOM_LENGTH}, {MAX_DENOM_LENGTH}]"
        )));
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(SwapError::InvalidDenom(format!(
            "{denom:?}: must start with a letter"
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || "/:._-".contains(*c))) {
        return Err(SwapError::InvalidDenom(format!(
            "{denom:?}: invalid character {bad:?}"
        )));
    }
    Ok(())
}

/// An amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in base units.
    pub amount: u128,
}

impl Coin {
    /// Create a new coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Zero amount of `denom`.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    /// True if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    fn ensure_same_denom(&self, other: &Coin) -> Result<(), SwapError> {
        if self.denom != other.denom {
            return Err(SwapError::DenomMismatch {
                left: self.denom.clone(),
                right: other.denom.clone(),
            });
        }
        Ok(())
    }

    /// `self + other`, failing on denom mismatch or overflow.
    pub fn checked_add(&self, other: &Coin) -> Result<Coin, SwapError> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| SwapError::SupplyOverflow {
                denom: self.denom.clone(),
                field: "coin",
            })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// `self - other`, failing on denom mismatch or underflow.
    pub fn checked_sub(&self, other: &Coin, field: &'static str) -> Result<Coin, SwapError> {
        self.ensure_same_denom(other)?;
        let amount =
            self.amount
                .checked_sub(other.amount)
                .ok_or_else(|| SwapError::SupplyUnderflow {
                    denom: self.denom.clone(),
                    field,
                    value: self.amount,
                    amount: other.amount,
                })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Strictly-less-than comparison within one denom.
    pub fn is_lt(&self, other: &Coin) -> Result<bool, SwapError> {
        self.ensure_same_denom(other)?;
        Ok(self.amount < other.amount)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins, sorted by denom with no duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Wrap a coin list as given. Use [`Coins::validate`] to check it.
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// A set holding exactly one coin.
    pub fn single(coin: Coin) -> Self {
        Self(vec![coin])
    }

    /// Entries in order.
    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map_or(0, |c| c.amount)
    }

    /// Non-empty, every denom valid, every amount positive, strictly sorted.
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.0.is_empty() {
            return Err(SwapError::InvalidAmount("amount cannot be empty".into()));
        }
        for coin in &self.0 {
            validate_denom(&coin.denom)
                .map_err(|e| SwapError::InvalidAmount(e.to_string()))?;
            if coin.is_zero() {
                return Err(SwapError::InvalidAmount(format!(
                    "coin {coin} must be positive"
                )));
            }
        }
        if let Some(pair) = self.0.windows(2).find(|w| w[0].denom >= w[1].denom) {
            return Err(SwapError::InvalidAmount(format!(
                "coins must be sorted with unique denoms: {} then {}",
                pair[0].denom, pair[1].denom
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
