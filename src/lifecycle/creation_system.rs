use std::sync::Arc;
use tracing::{info, instrument};

use crate::catalog::{self, CatalogRegistry, Product, ProductRole};
use crate::framework::{global, CreationError, FamilySet, SingletonManager};
use crate::kitchen::{Meal, Restaurant};
use crate::services::OperationLog;

/// The composition root wiring the three creation paths together.
///
/// `CreationSystem` is responsible for:
/// - **Registration**: filling the card registry once, at startup
/// - **Direction**: holding the restaurant recipe used for meal orders
/// - **Shared state**: pointing at the process-wide singleton manager
///
/// # Example
///
/// ```ignore
/// let system = CreationSystem::new()?;
///
/// let bundle = system.issue_family("MoneyBack")?;
/// let meal = system.order_meal()?;
/// let log = system.operation_log()?;
/// log.do_singleton_operation();
/// ```
pub struct CreationSystem {
    /// Card families, keyed by name.
    pub registry: CatalogRegistry,

    /// Recipe used by [`order_meal`](Self::order_meal).
    pub restaurant: Restaurant,

    singletons: &'static SingletonManager,
}

impl CreationSystem {
    /// Creates a system with every card family registered and the default recipe.
    pub fn new() -> Result<Self, CreationError> {
        Ok(Self::with_registry(catalog::new_registry()?))
    }

    /// Creates a system around a caller-built registry.
    pub fn with_registry(registry: CatalogRegistry) -> Self {
        Self {
            registry,
            restaurant: Restaurant::default(),
            singletons: global(),
        }
    }

    /// Resolves `family` and creates all of its products.
    #[instrument(skip(self))]
    pub fn issue_family(
        &self,
        family: &str,
    ) -> Result<FamilySet<ProductRole, Product>, CreationError> {
        let producer = self.registry.resolve(family)?;
        let set = crate::framework::create_family(producer.as_ref())?;
        info!(family, products = set.len(), "Issued");
        Ok(set)
    }

    /// Creates one product of `family` (e.g. just the card).
    #[instrument(skip(self))]
    pub fn issue_product(&self, family: &str, role: ProductRole) -> Result<Product, CreationError> {
        self.registry.create_product(family, &role)
    }

    /// Has the restaurant direct a fresh meal builder.
    pub fn order_meal(&self) -> Result<Arc<Meal>, CreationError> {
        self.restaurant.create_custom_meal()
    }

    /// The process-wide operation log.
    pub fn operation_log(&self) -> Result<Arc<OperationLog>, CreationError> {
        OperationLog::instance()
    }

    /// The singleton manager this system hands instances out of.
    pub fn singletons(&self) -> &'static SingletonManager {
        self.singletons
    }
}
