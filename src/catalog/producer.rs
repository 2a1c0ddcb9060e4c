//! Concrete producers for the card catalog.
//!
//! See the [`FamilyProducer`] implementation on [`CardFactory`] for which roles each
//! family fills.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::{CardFamily, CreditCard};
use super::vehicle::Vehicle;
use crate::framework::{FamilyProducer, Themed};

/// The roles a card family can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductRole {
    CreditCard,
    Vehicle,
}

impl fmt::Display for ProductRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductRole::CreditCard => f.write_str("CreditCard"),
            ProductRole::Vehicle => f.write_str("Vehicle"),
        }
    }
}

/// Anything a [`CardFactory`] can hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    Card(CreditCard),
    Vehicle(Vehicle),
}

impl Product {
    pub fn as_card(&self) -> Option<&CreditCard> {
        match self {
            Product::Card(card) => Some(card),
            Product::Vehicle(_) => None,
        }
    }

    pub fn as_vehicle(&self) -> Option<&Vehicle> {
        match self {
            Product::Vehicle(vehicle) => Some(vehicle),
            Product::Card(_) => None,
        }
    }
}

impl Themed for Product {
    fn theme(&self) -> &str {
        match self {
            Product::Card(card) => card.family().as_str(),
            Product::Vehicle(vehicle) => vehicle.family().as_str(),
        }
    }
}

/// One producer per card family.
///
/// `MoneyBack` and `Platinum` bundle a vehicle with the card. `Titanium` only issues
/// the card, so asking it for a `Vehicle` yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFactory {
    MoneyBack,
    Titanium,
    Platinum,
}

impl CardFactory {
    pub fn for_family(family: CardFamily) -> Self {
        match family {
            CardFamily::MoneyBack => CardFactory::MoneyBack,
            CardFamily::Titanium => CardFactory::Titanium,
            CardFamily::Platinum => CardFactory::Platinum,
        }
    }

    fn card_family(&self) -> CardFamily {
        match self {
            CardFactory::MoneyBack => CardFamily::MoneyBack,
            CardFactory::Titanium => CardFamily::Titanium,
            CardFactory::Platinum => CardFamily::Platinum,
        }
    }
}

impl FamilyProducer for CardFactory {
    type Role = ProductRole;
    type Product = Product;

    fn family(&self) -> &str {
        self.card_family().as_str()
    }

    fn roles(&self) -> Vec<ProductRole> {
        match self {
            CardFactory::Titanium => vec![ProductRole::CreditCard],
            CardFactory::MoneyBack | CardFactory::Platinum => {
                vec![ProductRole::CreditCard, ProductRole::Vehicle]
            }
        }
    }

    fn create(&self, role: &ProductRole) -> Option<Product> {
        match (self, role) {
            (CardFactory::MoneyBack, ProductRole::CreditCard) => {
                Some(Product::Card(CreditCard::MoneyBack))
            }
            (CardFactory::MoneyBack, ProductRole::Vehicle) => Some(Product::Vehicle(Vehicle::Car)),
            (CardFactory::Platinum, ProductRole::CreditCard) => {
                Some(Product::Card(CreditCard::Platinum))
            }
            (CardFactory::Platinum, ProductRole::Vehicle) => Some(Product::Vehicle(Vehicle::Bike)),
            (CardFactory::Titanium, ProductRole::CreditCard) => {
                Some(Product::Card(CreditCard::Titanium))
            }
            (CardFactory::Titanium, ProductRole::Vehicle) => None,
        }
    }
}
