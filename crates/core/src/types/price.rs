//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are stored in the currency's standard unit (pesos, not centavos)
/// and serialized as strings to avoid floating-point drift in JSON clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the house currency (Philippine peso).
    #[must_use]
    pub const fn php(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::PHP)
    }

    /// Format for display (e.g., "₱1299.50").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD => "$",
        }
    }

    /// ISO 4217 three-letter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PHP => "PHP",
            Self::USD => "USD",
        }
    }
}
