//! # Async Singleton Manager
//!
//! The [`SingletonManager`](super::SingletonManager) contract for tokio tasks: the
//! factory is a future, and callers that arrive during initialization `.await` the
//! initializer instead of blocking a runtime thread.
//!
//! Waiters subscribe to a `watch` channel owned by the initializer. The initializer
//! always publishes an outcome before it goes away, including when its future is
//! dropped mid-initialization, so waiters never hang on an abandoned attempt.
//!
//! A task-local set records the slots the current task is initializing. A factory
//! that awaits its own slot gets [`CreationError::InvalidState`] instead of waiting
//! on itself.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::CreationError;
use super::singleton::{downcast, Instance, SlotId};

type Outcome = Option<Result<Instance, CreationError>>;

tokio::task_local! {
    static INITIALIZING: HashSet<SlotId>;
}

fn initializing(id: &SlotId) -> bool {
    INITIALIZING
        .try_with(|slots| slots.contains(id))
        .unwrap_or(false)
}

enum AsyncState {
    Uninit,
    Initializing(watch::Receiver<Outcome>),
    Ready(Instance),
}

struct AsyncSlot {
    state: Mutex<(AsyncState, u64)>,
}

impl AsyncSlot {
    fn lock(&self) -> MutexGuard<'_, (AsyncState, u64)> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, outcome: &Result<Instance, CreationError>) {
        let mut state = self.lock();
        state.0 = match outcome {
            Ok(instance) => AsyncState::Ready(Arc::clone(instance)),
            Err(_) => AsyncState::Uninit,
        };
    }
}

/// Publishes the attempt's outcome even if the initializing future is dropped.
struct Publisher<'a> {
    slot: &'a AsyncSlot,
    id: &'a SlotId,
    sender: watch::Sender<Outcome>,
    published: bool,
}

impl Publisher<'_> {
    fn publish(&mut self, outcome: Result<Instance, CreationError>) {
        self.slot.finish(&outcome);
        self.sender.send_replace(Some(outcome));
        self.published = true;
    }
}

impl Drop for Publisher<'_> {
    fn drop(&mut self) {
        if !self.published {
            warn!(identity = %self.id, "Initializer dropped before completing");
            let err = CreationError::initialization(self.id.to_string(), "initializer cancelled");
            self.publish(Err(err));
        }
    }
}

enum Next {
    Ready(Instance),
    Wait(watch::Receiver<Outcome>),
    Initialize(u64, watch::Sender<Outcome>),
}

/// Async counterpart of [`SingletonManager`](super::SingletonManager).
#[derive(Default)]
pub struct AsyncSingletonManager {
    slots: Mutex<HashMap<SlotId, Arc<AsyncSlot>>>,
}

impl AsyncSingletonManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &SlotId) -> Arc<AsyncSlot> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.clone()).or_insert_with(|| {
            Arc::new(AsyncSlot {
                state: Mutex::new((AsyncState::Uninit, 0)),
            })
        }))
    }

    /// Returns the instance for `identity`, awaiting `factory` on first demand.
    ///
    /// Same guarantees as the blocking manager: one factory run per successful
    /// initialization, one shared `Arc`, and waiters of a failed or cancelled
    /// attempt receive its [`CreationError::Initialization`].
    pub async fn get_instance<T, F, Fut, E>(
        &self,
        identity: impl Into<SlotId>,
        factory: F,
    ) -> Result<Arc<T>, CreationError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let id = identity.into();
        let slot = self.slot(&id);

        let next = {
            let mut state = slot.lock();
            let existing = match &state.0 {
                AsyncState::Ready(instance) => Some(Next::Ready(Arc::clone(instance))),
                AsyncState::Initializing(_) if initializing(&id) => {
                    warn!(identity = %id, "Re-entrant initialization");
                    return Err(CreationError::InvalidState(format!(
                        "re-entrant initialization of {id}"
                    )));
                }
                AsyncState::Initializing(receiver) => Some(Next::Wait(receiver.clone())),
                AsyncState::Uninit => None,
            };
            match existing {
                Some(next) => next,
                None => {
                    let (sender, receiver) = watch::channel(None);
                    state.1 += 1;
                    state.0 = AsyncState::Initializing(receiver);
                    Next::Initialize(state.1, sender)
                }
            }
        };

        match next {
            Next::Ready(instance) => downcast(&id, &instance),
            Next::Wait(mut receiver) => {
                debug!(identity = %id, "Waiting for initializer");
                let outcome = receiver
                    .wait_for(Option::is_some)
                    .await
                    .ok()
                    .and_then(|outcome| outcome.clone());
                match outcome {
                    Some(Ok(instance)) => downcast(&id, &instance),
                    Some(Err(err)) => Err(err),
                    None => Err(CreationError::initialization(
                        id.to_string(),
                        "initializer vanished",
                    )),
                }
            }
            Next::Initialize(attempt, sender) => {
                debug!(identity = %id, attempt, "Initializing");
                let mut publisher = Publisher {
                    slot: &slot,
                    id: &id,
                    sender,
                    published: false,
                };

                let mut scope = INITIALIZING
                    .try_with(|slots| slots.clone())
                    .unwrap_or_default();
                scope.insert(id.clone());

                match INITIALIZING.scope(scope, factory()).await {
                    Ok(value) => {
                        let instance = Arc::new(value);
                        publisher.publish(Ok(Arc::clone(&instance) as Instance));
                        info!(identity = %id, attempt, "Instance materialized");
                        Ok(instance)
                    }
                    Err(cause) => {
                        let err = CreationError::initialization(id.to_string(), cause);
                        warn!(identity = %id, attempt, error = %err, "Initialization failed");
                        publisher.publish(Err(err.clone()));
                        Err(err)
                    }
                }
            }
        }
    }

    /// Returns the instance if it has already been materialized. Never creates one.
    pub fn get<T: Any + Send + Sync>(&self, identity: impl Into<SlotId>) -> Option<Arc<T>> {
        let id = identity.into();
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.get(&id).cloned()
        }?;
        let state = slot.lock();
        match &state.0 {
            AsyncState::Ready(instance) => downcast(&id, instance).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_tasks_share_one_instance() {
        let manager = Arc::new(AsyncSingletonManager::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..8 {
            let manager = manager.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                manager
                    .get_instance("Pool", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, std::io::Error>(vec![1u8, 2, 3])
                    })
                    .await
            }));
        }

        let mut instances = vec![];
        for handle in handles {
            instances.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_failed_attempt_fails_waiters_and_is_retryable() {
        let manager = Arc::new(AsyncSingletonManager::new());

        let initializer = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .get_instance("Conn", || async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<u32, _>("refused")
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let waiter = manager
            .get_instance("Conn", || async { Ok::<u32, std::io::Error>(9) })
            .await;

        let first = initializer.await.unwrap().unwrap_err();
        assert_eq!(waiter.unwrap_err(), first);

        let retried = manager
            .get_instance("Conn", || async { Ok::<u32, std::io::Error>(9) })
            .await
            .unwrap();
        assert_eq!(*retried, 9);
        assert_eq!(manager.get::<u32>("Conn").map(|v| *v), Some(9));
    }

    #[tokio::test]
    async fn test_cancelled_initializer_releases_waiters() {
        let manager = Arc::new(AsyncSingletonManager::new());

        let initializer = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .get_instance("Slow", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<u32, std::io::Error>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .get_instance("Slow", || async { Ok::<u32, std::io::Error>(2) })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        initializer.abort();

        let err = waiter.await.unwrap().unwrap_err();
        assert!(err.is_initialization());
        assert!(manager.get::<u32>("Slow").is_none());
    }

    #[tokio::test]
    async fn test_reentrant_initialization_is_rejected() {
        let manager = &AsyncSingletonManager::new();

        let outer = manager.get_instance("Outer", move || async move {
            manager
                .get_instance("Inner", move || async move {
                    manager
                        .get_instance("Outer", || async { Ok::<u8, std::io::Error>(1) })
                        .await
                        .map(|outer| *outer)
                })
                .await
                .map(|inner| *inner)
        });
        let err = tokio::time::timeout(Duration::from_secs(2), outer)
            .await
            .expect("nested initialization never finished")
            .unwrap_err();

        assert!(err.is_initialization());
        assert!(err.to_string().contains("re-entrant initialization of Outer"));
        assert!(manager.get::<u8>("Outer").is_none());
        assert!(manager.get::<u8>("Inner").is_none());

        // Other slots initialized from inside a factory are fine.
        let nested = manager
            .get_instance("Outer", move || async move {
                manager
                    .get_instance("Leaf", || async { Ok::<u8, std::io::Error>(3) })
                    .await
                    .map(|leaf| *leaf + 1)
            })
            .await
            .unwrap();
        assert_eq!(*nested, 4);
        assert_eq!(manager.get::<u8>("Leaf").map(|v| *v), Some(3));
    }
}
