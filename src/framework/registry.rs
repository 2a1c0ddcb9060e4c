//! # Factory Registry
//!
//! Maps a family key to the producer that creates that family's products.
//!
//! ## Key Types
//!
//! - [`FamilyProducer`]: The trait every concrete producer implements.
//! - [`Themed`]: Implemented by products so the registry can check which family they belong to.
//! - [`FactoryRegistry`]: The keyed store of producers.
//! - [`FamilySet`]: A complete, consistent set of products created by one producer.
//!
//! ## Architecture Note
//! Abstract Factory ("create every product of a theme") and Factory Method ("create
//! this one product") are the same thing here: a producer declares the roles it can
//! fill, and callers either ask for all of them ([`create_family`]) or for one
//! ([`FactoryRegistry::create_product`]).

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use super::error::CreationError;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Implemented by every product so its family can be checked after creation.
pub trait Themed {
    /// The family label this product belongs to (e.g. `"MoneyBack"`).
    fn theme(&self) -> &str;
}

/// A concrete producer for one product family.
///
/// The associated `Role` type names the slots the family fills (e.g. `CreditCard`,
/// `Vehicle`), and `Product` is the closed set of things it can hand back.
pub trait FamilyProducer: Send + Sync {
    type Role: Eq + Hash + Clone + Debug + Display + Send + Sync;
    type Product: Themed;

    /// The family this producer creates products for.
    fn family(&self) -> &str;

    /// Every role this producer can fill, in creation order.
    fn roles(&self) -> Vec<Self::Role>;

    /// Create the product for one role. Returns `None` for roles the producer does not declare.
    fn create(&self, role: &Self::Role) -> Option<Self::Product>;
}

/// Type alias for the shared, type-erased producer handle stored by the registry.
pub type SharedProducer<R, X> = Arc<dyn FamilyProducer<Role = R, Product = X>>;

// =============================================================================
// 2. THE FAMILY SET
// =============================================================================

/// The products created for every role of one family, in the producer's role order.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySet<R, X> {
    family: String,
    products: Vec<(R, X)>,
}

impl<R: PartialEq, X> FamilySet<R, X> {
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn get(&self, role: &R) -> Option<&X> {
        self.products
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, product)| product)
    }

    pub fn roles(&self) -> impl Iterator<Item = &R> {
        self.products.iter().map(|(role, _)| role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R, &X)> {
        self.products.iter().map(|(role, product)| (role, product))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<R, X> IntoIterator for FamilySet<R, X> {
    type Item = (R, X);
    type IntoIter = std::vec::IntoIter<(R, X)>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}

/// Creates one product for every role the producer declares.
///
/// Fails with [`CreationError::ThemeMismatch`] if any product belongs to another
/// family, so a caller never receives a mixed set.
pub fn create_family<P>(producer: &P) -> Result<FamilySet<P::Role, P::Product>, CreationError>
where
    P: FamilyProducer + ?Sized,
{
    let family = producer.family();
    let roles = producer.roles();
    let mut products = Vec::with_capacity(roles.len());

    for role in roles {
        let product = producer
            .create(&role)
            .ok_or_else(|| CreationError::NotFound(format!("{family}/{role}")))?;
        check_theme(family, &product)?;
        debug!(family, %role, "Created");
        products.push((role, product));
    }

    Ok(FamilySet {
        family: family.to_string(),
        products,
    })
}

fn check_theme<X: Themed>(family: &str, product: &X) -> Result<(), CreationError> {
    if product.theme() != family {
        warn!(family, found = product.theme(), "Product from foreign family");
        return Err(CreationError::ThemeMismatch {
            expected: family.to_string(),
            found: product.theme().to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// 3. THE REGISTRY
// =============================================================================

/// Keyed store of family producers.
///
/// **Concurrency Model**:
/// Registration takes the write lock; resolution takes the read lock and clones the
/// `Arc`, so product creation always runs outside the lock.
pub struct FactoryRegistry<R, X> {
    producers: RwLock<HashMap<String, SharedProducer<R, X>>>,
}

impl<R, X> Default for FactoryRegistry<R, X> {
    fn default() -> Self {
        Self {
            producers: RwLock::new(HashMap::new()),
        }
    }
}

impl<R, X> FactoryRegistry<R, X>
where
    R: Eq + Hash + Clone + Debug + Display + Send + Sync + 'static,
    X: Themed + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `key` with `producer`.
    ///
    /// # Errors
    /// - [`CreationError::DuplicateKey`] if `key` is already registered.
    /// - [`CreationError::ThemeMismatch`] if the producer serves a different family than `key`.
    pub fn register<P>(&self, key: impl Into<String>, producer: P) -> Result<(), CreationError>
    where
        P: FamilyProducer<Role = R, Product = X> + 'static,
    {
        let key = key.into();
        check_producer(&key, &producer)?;

        let mut producers = self.producers.write().unwrap_or_else(PoisonError::into_inner);
        if producers.contains_key(&key) {
            warn!(family = %key, "Already registered");
            return Err(CreationError::DuplicateKey(key));
        }
        producers.insert(key.clone(), Arc::new(producer));
        info!(family = %key, size = producers.len(), "Registered");
        Ok(())
    }

    /// Explicitly overwrites the producer for `key`, returning the one it displaced.
    pub fn replace<P>(
        &self,
        key: impl Into<String>,
        producer: P,
    ) -> Result<Option<SharedProducer<R, X>>, CreationError>
    where
        P: FamilyProducer<Role = R, Product = X> + 'static,
    {
        let key = key.into();
        check_producer(&key, &producer)?;

        let mut producers = self.producers.write().unwrap_or_else(PoisonError::into_inner);
        let previous = producers.insert(key.clone(), Arc::new(producer));
        info!(family = %key, replaced = previous.is_some(), "Replaced");
        Ok(previous)
    }

    /// Looks up the producer registered under `key`.
    pub fn resolve(&self, key: &str) -> Result<SharedProducer<R, X>, CreationError> {
        let producers = self.producers.read().unwrap_or_else(PoisonError::into_inner);
        let found = producers.get(key).cloned();
        debug!(family = key, found = found.is_some(), "Resolve");
        found.ok_or_else(|| CreationError::NotFound(key.to_string()))
    }

    /// Resolves `key` and creates its full product family.
    pub fn build_family(&self, key: &str) -> Result<FamilySet<R, X>, CreationError> {
        let producer = self.resolve(key)?;
        create_family(producer.as_ref())
    }

    /// Creates the single product for `role` from the family registered under `key`.
    pub fn create_product(&self, key: &str, role: &R) -> Result<X, CreationError> {
        let producer = self.resolve(key)?;
        let product = producer
            .create(role)
            .ok_or_else(|| CreationError::NotFound(format!("{key}/{role}")))?;
        check_theme(key, &product)?;
        debug!(family = key, %role, "Created");
        Ok(product)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.producers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let producers = self.producers.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = producers.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.producers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_producer<P: FamilyProducer + ?Sized>(
    key: &str,
    producer: &P,
) -> Result<(), CreationError> {
    if producer.family() != key {
        warn!(family = key, found = producer.family(), "Producer filed under foreign key");
        return Err(CreationError::ThemeMismatch {
            expected: key.to_string(),
            found: producer.family().to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// 4. EXAMPLE USAGE (Test)
// =============================================================================
