use serde::{Deserialize, Serialize};

use super::card::CardFamily;

/// The vehicle bundled with a card family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vehicle {
    Car,
    Bike,
}

impl Vehicle {
    pub fn model(&self) -> &'static str {
        match self {
            Vehicle::Car => "Car",
            Vehicle::Bike => "Bike",
        }
    }

    /// The card family this vehicle is bundled with.
    pub fn family(&self) -> CardFamily {
        match self {
            Vehicle::Car => CardFamily::MoneyBack,
            Vehicle::Bike => CardFamily::Platinum,
        }
    }
}
