//! # Singleton Manager
//!
//! Lazily creates at most one instance per [`SlotId`] and hands out shared `Arc`s.
//!
//! ## Slot State Machine
//!
//! ```text
//! Uninit --first caller--> Initializing --factory ok--> Ready (terminal)
//!    ^                          |
//!    +------factory failed------+
//! ```
//!
//! Exactly one caller (the *initializer*) runs the factory, and it runs it outside
//! the slot lock. Everyone else who arrives while the slot is `Initializing` blocks
//! on the slot's condvar until that attempt completes:
//!
//! - **Success**: every waiter receives the same `Arc`.
//! - **Failure**: every waiter receives the same [`CreationError::Initialization`],
//!   and the slot goes back to `Uninit` so a *later* call may retry.
//! - **Panic**: treated as a failure, so no waiter is left hanging.
//!
//! Only callers of the same slot block each other. There is no reset or destroy:
//! a `Ready` slot lives as long as its manager, and [`global`] lives for the process.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};
use tracing::{debug, info, warn};

use super::error::CreationError;

/// Type-erased instance stored in a ready slot.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

// =============================================================================
// 1. SLOT IDENTITY
// =============================================================================

/// Identifies one singleton slot.
///
/// Use [`SlotId::of`] to key a slot by type, or a plain string (`"Singleton"`) to
/// key it by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotId {
    Type(TypeId, &'static str),
    Named(String),
}

impl SlotId {
    pub fn of<T: Any>() -> Self {
        SlotId::Type(TypeId::of::<T>(), type_name::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        SlotId::Named(name.into())
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Type(_, name) => f.write_str(name),
            SlotId::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for SlotId {
    fn from(name: &str) -> Self {
        SlotId::named(name)
    }
}

impl From<String> for SlotId {
    fn from(name: String) -> Self {
        SlotId::Named(name)
    }
}

pub(crate) fn downcast<T: Any + Send + Sync>(
    id: &SlotId,
    instance: &Instance,
) -> Result<Arc<T>, CreationError> {
    Arc::clone(instance)
        .downcast::<T>()
        .map_err(|_| CreationError::TypeMismatch {
            identity: id.to_string(),
            expected: type_name::<T>(),
        })
}

// =============================================================================
// 2. THE SLOT
// =============================================================================

/// Outcome of one initialization attempt, shared by its initializer and waiters.
type Outcome = Arc<OnceLock<Result<Instance, CreationError>>>;

#[derive(Default)]
enum SlotState {
    #[default]
    Uninit,
    Initializing {
        attempt: u64,
        owner: ThreadId,
        outcome: Outcome,
    },
    Ready(Instance),
}

#[derive(Default)]
struct SlotInner {
    state: SlotState,
    attempts: u64,
}

#[derive(Default)]
struct Slot {
    inner: Mutex<SlotInner>,
    changed: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the attempt's outcome and wakes every waiter.
    fn finish(&self, outcome: &Outcome, result: Result<Instance, CreationError>) {
        let mut inner = self.lock();
        inner.state = match &result {
            Ok(instance) => SlotState::Ready(Arc::clone(instance)),
            Err(_) => SlotState::Uninit,
        };
        // One initializer per attempt, so the cell is always empty here.
        let _ = outcome.set(result);
        drop(inner);
        self.changed.notify_all();
    }
}

/// Fails the attempt if the factory unwinds before the initializer reports back.
struct InitGuard<'a> {
    slot: &'a Slot,
    id: &'a SlotId,
    attempt: u64,
    outcome: Outcome,
    armed: bool,
}

impl InitGuard<'_> {
    fn complete(mut self, result: Result<Instance, CreationError>) {
        self.armed = false;
        self.slot.finish(&self.outcome, result);
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(identity = %self.id, attempt = self.attempt, "Factory panicked");
            let err = CreationError::initialization(self.id.to_string(), "factory panicked");
            self.slot.finish(&self.outcome, Err(err));
        }
    }
}

enum Next {
    Ready(Instance),
    Wait(u64, Outcome),
    Initialize,
}

// =============================================================================
// 3. THE MANAGER
// =============================================================================

/// Owns singleton slots and serializes their first initialization.
#[derive(Default)]
pub struct SingletonManager {
    slots: Mutex<HashMap<SlotId, Arc<Slot>>>,
}

impl SingletonManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &SlotId) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    fn existing_slot(&self, id: &SlotId) -> Option<Arc<Slot>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(id).cloned()
    }

    /// Returns the instance for `identity`, creating it with `factory` on first demand.
    ///
    /// Under any number of concurrent first callers `factory` runs exactly once, and
    /// all of them receive the same `Arc`.
    ///
    /// # Errors
    /// - [`CreationError::Initialization`] if `factory` fails or panics, both for the
    ///   initializer and for every caller blocked on that attempt.
    /// - [`CreationError::TypeMismatch`] if the slot holds a different type.
    /// - [`CreationError::InvalidState`] if `factory` re-enters its own slot.
    pub fn get_instance<T, F, E>(
        &self,
        identity: impl Into<SlotId>,
        factory: F,
    ) -> Result<Arc<T>, CreationError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T, E>,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let id = identity.into();
        let slot = self.slot(&id);
        let mut inner = slot.lock();

        let next = match &inner.state {
            SlotState::Ready(instance) => Next::Ready(Arc::clone(instance)),
            SlotState::Initializing { owner, .. } if *owner == thread::current().id() => {
                warn!(identity = %id, "Re-entrant initialization");
                return Err(CreationError::InvalidState(format!(
                    "re-entrant initialization of {id}"
                )));
            }
            SlotState::Initializing {
                attempt, outcome, ..
            } => Next::Wait(*attempt, Arc::clone(outcome)),
            SlotState::Uninit => Next::Initialize,
        };

        match next {
            Next::Ready(instance) => return downcast(&id, &instance),
            Next::Wait(attempt, outcome) => {
                debug!(identity = %id, attempt, "Waiting for initializer");
                drop(
                    slot.changed
                        .wait_while(inner, |_| outcome.get().is_none())
                        .unwrap_or_else(PoisonError::into_inner),
                );
                // Only this attempt's outcome counts, whatever later attempts did.
                return match outcome.get() {
                    Some(Ok(instance)) => downcast(&id, instance),
                    Some(Err(err)) => Err(err.clone()),
                    None => Err(CreationError::initialization(
                        id.to_string(),
                        "initializer vanished",
                    )),
                };
            }
            Next::Initialize => {}
        }

        inner.attempts += 1;
        let attempt = inner.attempts;
        let outcome = Outcome::default();
        inner.state = SlotState::Initializing {
            attempt,
            owner: thread::current().id(),
            outcome: Arc::clone(&outcome),
        };
        drop(inner);

        debug!(identity = %id, attempt, "Initializing");
        let guard = InitGuard {
            slot: &slot,
            id: &id,
            attempt,
            outcome,
            armed: true,
        };

        match factory() {
            Ok(value) => {
                let instance = Arc::new(value);
                guard.complete(Ok(Arc::clone(&instance) as Instance));
                info!(identity = %id, attempt, "Instance materialized");
                Ok(instance)
            }
            Err(cause) => {
                let err = CreationError::initialization(id.to_string(), cause);
                warn!(identity = %id, attempt, error = %err, "Initialization failed");
                guard.complete(Err(err.clone()));
                Err(err)
            }
        }
    }

    /// Like [`get_instance`](Self::get_instance) for factories that cannot fail.
    pub fn get_or_init<T, F>(
        &self,
        identity: impl Into<SlotId>,
        factory: F,
    ) -> Result<Arc<T>, CreationError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        self.get_instance(identity, || Ok::<T, std::convert::Infallible>(factory()))
    }

    /// Returns the instance if it has already been materialized. Never creates one.
    pub fn get<T: Any + Send + Sync>(&self, identity: impl Into<SlotId>) -> Option<Arc<T>> {
        let id = identity.into();
        let slot = self.existing_slot(&id)?;
        let inner = slot.lock();
        match &inner.state {
            SlotState::Ready(instance) => downcast(&id, instance).ok(),
            _ => None,
        }
    }

    pub fn is_initialized(&self, identity: impl Into<SlotId>) -> bool {
        let id = identity.into();
        match self.existing_slot(&id) {
            Some(slot) => {
                let inner = slot.lock();
                matches!(inner.state, SlotState::Ready(_))
            }
            None => false,
        }
    }
}

/// The process-wide manager.
pub fn global() -> &'static SingletonManager {
    static GLOBAL: OnceLock<SingletonManager> = OnceLock::new();
    GLOBAL.get_or_init(SingletonManager::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    #[derive(Debug)]
    struct Config {
        name: String,
    }

    #[test]
    fn test_first_call_creates_then_reuses() {
        let manager = SingletonManager::new();
        let calls = AtomicUsize::new(0);

        let make = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Config { name: "prod".into() }
        };
        let a = manager.get_or_init(SlotId::of::<Config>(), make).unwrap();
        let b = manager
            .get_or_init(SlotId::of::<Config>(), || Config { name: "other".into() })
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.name, "prod");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(manager.is_initialized(SlotId::of::<Config>()));
    }

    #[test]
    fn test_failure_leaves_slot_retryable() {
        let manager = SingletonManager::new();

        let err = manager
            .get_instance("Config", || Err::<Config, _>("disk unavailable"))
            .unwrap_err();
        assert!(err.is_initialization());
        assert!(!manager.is_initialized("Config"));
        assert!(manager.get::<Config>("Config").is_none());

        let config = manager
            .get_instance("Config", || Ok::<_, std::io::Error>(Config { name: "retry".into() }))
            .unwrap();
        assert_eq!(config.name, "retry");
    }

    #[test]
    fn test_type_mismatch() {
        let manager = SingletonManager::new();
        manager.get_or_init("Shared", || 7u32).unwrap();

        let err = manager.get_or_init("Shared", || "seven".to_string()).unwrap_err();
        assert!(matches!(err, CreationError::TypeMismatch { .. }));
        assert_eq!(*manager.get::<u32>("Shared").unwrap(), 7);
    }

    #[test]
    fn test_reentrant_initialization_is_rejected() {
        let manager = SingletonManager::new();
        let err = manager
            .get_instance("Loop", || {
                manager
                    .get_or_init("Loop", || 1u8)
                    .map(|inner| *inner)
            })
            .unwrap_err();

        // The inner call reports InvalidState, which the outer call wraps.
        assert!(err.is_initialization());
        assert!(err.to_string().contains("re-entrant"));
    }

    #[test]
    fn test_panicking_factory_releases_waiters() {
        let manager = SingletonManager::new();
        let barrier = Barrier::new(2);

        thread::scope(|s| {
            let initializer = s.spawn(|| {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    manager.get_or_init("Fragile", || -> u32 {
                        barrier.wait();
                        thread::sleep(Duration::from_millis(50));
                        panic!("constructor blew up");
                    })
                }))
            });

            barrier.wait();
            let waited = manager.get_or_init("Fragile", || 0u32);

            assert!(initializer.join().unwrap().is_err());
            assert!(waited.unwrap_err().is_initialization());
        });

        assert!(!manager.is_initialized("Fragile"));
        assert_eq!(*manager.get_or_init("Fragile", || 5u32).unwrap(), 5);
    }

    #[test]
    fn test_global_is_process_wide() {
        assert!(std::ptr::eq(global(), global()));
    }
}
