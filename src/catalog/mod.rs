//! Card catalog: credit cards, bundled vehicles, and the producers that issue them.

pub mod card;
pub mod producer;
pub mod vehicle;

pub use card::*;
pub use producer::*;
pub use vehicle::*;

use crate::framework::{CreationError, FactoryRegistry};

/// Registry of card families.
pub type CatalogRegistry = FactoryRegistry<ProductRole, Product>;

/// Creates a registry with every [`CardFamily`] registered under its own name.
pub fn new_registry() -> Result<CatalogRegistry, CreationError> {
    let registry = CatalogRegistry::new();
    for family in CardFamily::ALL {
        registry.register(family.as_str(), CardFactory::for_family(family))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{create_family, Themed};
    use rust_decimal::Decimal;

    #[test]
    fn test_every_family_is_consistent() {
        let registry = new_registry().unwrap();
        for family in CardFamily::ALL {
            let set = registry.build_family(family.as_str()).unwrap();
            assert!(set.iter().all(|(_, product)| product.theme() == family.as_str()));
        }
    }

    #[test]
    fn test_platinum_bundle() {
        let set = create_family(&CardFactory::Platinum).unwrap();
        let card = set.get(&ProductRole::CreditCard).and_then(Product::as_card).unwrap();
        assert_eq!(card.card_type(), "Platinum");
        assert_eq!(card.credit_limit(), Decimal::from(25));
        assert_eq!(card.annual_charge(), Decimal::from(30));
        assert_eq!(
            set.get(&ProductRole::Vehicle).and_then(Product::as_vehicle),
            Some(&Vehicle::Bike)
        );
    }

    #[test]
    fn test_titanium_issues_card_only() {
        let registry = new_registry().unwrap();
        let set = registry.build_family("Titanium").unwrap();
        assert_eq!(set.len(), 1);

        let err = registry.create_product("Titanium", &ProductRole::Vehicle).unwrap_err();
        assert_eq!(err, CreationError::NotFound("Titanium/Vehicle".into()));
    }
}
