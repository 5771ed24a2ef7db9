use crate::error::{PayFastError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute tolerance used when reconciling notified amounts.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// A positive monetary amount in rand, held to 2 decimal places.
///
/// Values are rounded half-to-even on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        if rounded > Decimal::ZERO {
            // Always render two decimals, e.g. "100.00".
            let mut normalized = rounded;
            normalized.rescale(2);
            Ok(Self(normalized))
        } else {
            Err(PayFastError::Validation(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PayFastError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True when `gross` is within `tolerance` of `expected`.
pub fn reconcile_amount(gross: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
    gross
        .checked_sub(expected)
        .is_some_and(|diff| diff.abs() <= tolerance)
}
