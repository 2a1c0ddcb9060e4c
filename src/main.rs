//! Demo binary walking the three creation paths.
//!
//! 1. Issue the MoneyBack card family through the registry.
//! 2. Have the restaurant direct a custom meal.
//! 3. Use the shared operation log, and race several tasks for one async session.

use creation_recipe::catalog::{Product, ProductRole};
use creation_recipe::framework::{AsyncSingletonManager, CreationError};
use creation_recipe::lifecycle::{setup_tracing, CreationSystem};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Instrument};

/// Shared by the demo workers; whichever worker wins the race opens it.
#[derive(Debug)]
struct Session {
    opened_by: u32,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting creation demo");

    let system = CreationSystem::new().map_err(|e| e.to_string())?;

    let span = tracing::info_span!("card_issuing");
    span.in_scope(|| -> Result<(), CreationError> {
        let bundle = system.issue_family("MoneyBack")?;
        for (role, product) in bundle.iter() {
            match product {
                Product::Card(card) => info!(
                    %role,
                    card_type = card.card_type(),
                    credit_limit = %card.credit_limit(),
                    annual_charge = %card.annual_charge(),
                    "Card"
                ),
                Product::Vehicle(vehicle) => info!(%role, model = vehicle.model(), "Vehicle"),
            }
        }

        let titanium = system.issue_product("Titanium", ProductRole::CreditCard)?;
        info!(?titanium, "Single product issued");
        Ok(())
    })
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("meal_ordering");
    let meal = span
        .in_scope(|| system.order_meal())
        .map_err(|e| e.to_string())?;
    info!(%meal, "Meal ready");

    let span = tracing::info_span!("shared_services");
    async {
        let log = system.operation_log().map_err(|e| e.to_string())?;
        log.do_singleton_operation();

        // Several tasks racing for the same first initialization.
        let manager = Arc::new(AsyncSingletonManager::new());
        let mut handles = vec![];
        for worker in 0..4u32 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                let session = manager
                    .get_instance("session", move || async move {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Ok::<_, CreationError>(Session { opened_by: worker })
                    })
                    .await?;
                Ok::<_, CreationError>((worker, session))
            }));
        }
        for handle in handles {
            let (worker, session) = handle
                .await
                .map_err(|e| e.to_string())?
                .map_err(|e| e.to_string())?;
            let seq = log.do_singleton_operation();
            info!(worker, opened_by = session.opened_by, seq, "Worker joined session");
        }

        info!(operations = log.operations(), "Operation log total");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    info!("Demo completed successfully");
    Ok(())
}
