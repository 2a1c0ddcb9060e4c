use creation_recipe::catalog::{self, CardFactory, Product, ProductRole, Vehicle};
use creation_recipe::framework::mock::{CallCounter, MockProducer};
use creation_recipe::framework::{create_family, CreationError, FactoryRegistry, Themed};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

/// MoneyBack yields exactly the "Money back" card (limit 5, charge 10) and a Car.
#[test]
fn test_money_back_family() {
    let registry = catalog::new_registry().expect("Failed to build registry");

    let producer = registry.resolve("MoneyBack").expect("MoneyBack not registered");
    let set = create_family(producer.as_ref()).expect("Failed to create family");

    assert_eq!(set.len(), 2);
    let card = set
        .get(&ProductRole::CreditCard)
        .and_then(Product::as_card)
        .expect("No card in family");
    assert_eq!(card.card_type(), "Money back");
    assert_eq!(card.credit_limit(), Decimal::from(5));
    assert_eq!(card.annual_charge(), Decimal::from(10));

    let vehicle = set
        .get(&ProductRole::Vehicle)
        .and_then(Product::as_vehicle)
        .expect("No vehicle in family");
    assert_eq!(vehicle, &Vehicle::Car);
    assert_eq!(vehicle.model(), "Car");
}

/// Every registered key resolves to a producer whose products all carry that key as theme.
#[test]
fn test_every_key_yields_its_own_theme() {
    let registry = catalog::new_registry().unwrap();
    for key in registry.keys() {
        let set = registry.build_family(&key).unwrap();
        assert_eq!(set.family(), key);
        for (role, product) in set.iter() {
            assert_eq!(product.theme(), key, "{role} of {key} has foreign theme");
        }
    }
}

#[test]
fn test_unregistered_key_fails() {
    let registry = catalog::new_registry().unwrap();
    for key in ["Gold", "", "moneyback"] {
        match registry.resolve(key) {
            Err(CreationError::NotFound(k)) => assert_eq!(k, key),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("resolved unregistered key {key:?}"),
        }
    }
}

#[test]
fn test_registration_is_never_implicitly_overwritten() {
    let registry = catalog::new_registry().unwrap();

    let err = registry.register("Platinum", CardFactory::Platinum).unwrap_err();
    assert_eq!(err, CreationError::DuplicateKey("Platinum".into()));

    // A MoneyBack producer cannot be filed under the Platinum key, even explicitly.
    let replaced = registry.replace("Platinum", CardFactory::MoneyBack);
    assert!(matches!(replaced, Err(CreationError::ThemeMismatch { .. })));

    let previous = registry.replace("Platinum", CardFactory::Platinum).unwrap();
    assert!(previous.is_some());
    assert_eq!(registry.len(), 3);
}

/// A producer that leaks a product of another family never returns a mixed set.
#[test]
fn test_mock_producer_with_foreign_product() {
    let counter = CallCounter::new();
    let leaky = MockProducer::<ProductRole, Product>::new("MoneyBack")
        .with_product(ProductRole::CreditCard, Product::Card(catalog::CreditCard::MoneyBack))
        .with_product(ProductRole::Vehicle, Product::Vehicle(Vehicle::Bike))
        .counted(&counter);

    let registry = FactoryRegistry::new();
    registry.register("MoneyBack", leaky).unwrap();

    let err = registry.build_family("MoneyBack").unwrap_err();
    assert_eq!(
        err,
        CreationError::ThemeMismatch {
            expected: "MoneyBack".into(),
            found: "Platinum".into(),
        }
    );
    assert_eq!(counter.count(), 2);

    // The card role on its own is fine.
    let card = registry
        .create_product("MoneyBack", &ProductRole::CreditCard)
        .unwrap();
    assert_eq!(card.theme(), "MoneyBack");
    assert_eq!(counter.count(), 3);
}

/// Resolution from many threads while another thread registers.
#[test]
fn test_concurrent_resolve_and_register() {
    let registry = Arc::new(FactoryRegistry::<ProductRole, Product>::new());
    registry.register("MoneyBack", CardFactory::MoneyBack).unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let set = registry.build_family("MoneyBack").unwrap();
                assert_eq!(set.len(), 2);
            }
        }));
    }
    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            registry.register("Platinum", CardFactory::Platinum).unwrap();
            registry.register("Titanium", CardFactory::Titanium).unwrap();
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    writer.join().unwrap();
    assert_eq!(registry.keys(), vec!["MoneyBack", "Platinum", "Titanium"]);
}
