use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The card product families offered by the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFamily {
    MoneyBack,
    Titanium,
    Platinum,
}

impl CardFamily {
    pub const ALL: [CardFamily; 3] = [
        CardFamily::MoneyBack,
        CardFamily::Titanium,
        CardFamily::Platinum,
    ];

    /// The registry key for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardFamily::MoneyBack => "MoneyBack",
            CardFamily::Titanium => "Titanium",
            CardFamily::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for CardFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credit card product. Each variant is one family's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditCard {
    MoneyBack,
    Titanium,
    Platinum,
}

impl CreditCard {
    pub fn card_type(&self) -> &'static str {
        match self {
            CreditCard::MoneyBack => "Money back",
            CreditCard::Titanium => "Titanium",
            CreditCard::Platinum => "Platinum",
        }
    }

    pub fn credit_limit(&self) -> Decimal {
        match self {
            CreditCard::MoneyBack => Decimal::from(5),
            CreditCard::Titanium => Decimal::from(15),
            CreditCard::Platinum => Decimal::from(25),
        }
    }

    pub fn annual_charge(&self) -> Decimal {
        match self {
            CreditCard::MoneyBack => Decimal::from(10),
            CreditCard::Titanium => Decimal::from(20),
            CreditCard::Platinum => Decimal::from(30),
        }
    }

    pub fn family(&self) -> CardFamily {
        match self {
            CreditCard::MoneyBack => CardFamily::MoneyBack,
            CreditCard::Titanium => CardFamily::Titanium,
            CreditCard::Platinum => CardFamily::Platinum,
        }
    }
}
