//! # Mock Framework
//!
//! Utilities for testing creation paths in isolation.
//!
//! - [`MockProducer`]: a [`FamilyProducer`] whose products are scripted by the test.
//! - [`CallCounter`]: a cloneable counter for asserting how often a factory ran.
//!
//! # Example
//! ```ignore
//! let counter = CallCounter::new();
//! let producer = MockProducer::new("Steel")
//!     .with_product("Frame", piece)
//!     .counted(&counter);
//!
//! registry.register("Steel", producer)?;
//! registry.build_family("Steel")?;
//! assert_eq!(counter.count(), 1);
//! ```

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::framework::{FamilyProducer, Themed};

/// Shared call counter. Clones observe the same count.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    hits: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one call and returns the count before it.
    pub fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A producer that hands out clones of scripted products.
///
/// The declared roles are exactly the roles given to [`MockProducer::with_product`],
/// in that order. Every `create` call is recorded on the attached [`CallCounter`].
pub struct MockProducer<R, X> {
    family: String,
    products: Vec<(R, X)>,
    counter: CallCounter,
}

impl<R, X> MockProducer<R, X> {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            products: Vec::new(),
            counter: CallCounter::new(),
        }
    }

    pub fn with_product(mut self, role: impl Into<R>, product: X) -> Self {
        self.products.push((role.into(), product));
        self
    }

    /// Records `create` calls on `counter` instead of a private one.
    pub fn counted(mut self, counter: &CallCounter) -> Self {
        self.counter = counter.clone();
        self
    }

    pub fn counter(&self) -> CallCounter {
        self.counter.clone()
    }
}

impl<R, X> FamilyProducer for MockProducer<R, X>
where
    R: Eq + Hash + Clone + Debug + Display + Send + Sync,
    X: Themed + Clone + Send + Sync,
{
    type Role = R;
    type Product = X;

    fn family(&self) -> &str {
        &self.family
    }

    fn roles(&self) -> Vec<R> {
        self.products.iter().map(|(role, _)| role.clone()).collect()
    }

    fn create(&self, role: &R) -> Option<X> {
        self.counter.hit();
        self.products
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, product)| product.clone())
    }
}
