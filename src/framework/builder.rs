//! # Builder Pipeline
//!
//! Accumulates named components across many calls and materializes the result once.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty --add_component--> Accumulating --build--> Finalized (terminal)
//! ```
//!
//! After [`BuilderPipeline::build`] every further [`BuilderPipeline::add_component`]
//! fails with [`CreationError::InvalidState`], and repeated `build()` calls hand back
//! the same `Arc` that the first call produced.
//!
//! How the components become a finished value is decided by an [`Assemble`]
//! strategy. [`Assembly`] is the default and simply returns the ordered list.

use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::CreationError;

/// Lifecycle of a [`BuilderPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Empty,
    Accumulating,
    Finalized,
}

/// Turns the accumulated components into the finished value.
pub trait Assemble<V> {
    type Output;

    /// Slots that must be filled before `build()` can succeed.
    fn required_slots(&self) -> &[&'static str] {
        &[]
    }

    /// Produce the output from components in insertion order.
    fn assemble(&self, components: &[(String, V)]) -> Self::Output;
}

/// Default strategy: the output is the ordered `(slot, value)` list itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembly;

impl<V: Clone> Assemble<V> for Assembly {
    type Output = Vec<(String, V)>;

    fn assemble(&self, components: &[(String, V)]) -> Self::Output {
        components.to_vec()
    }
}

/// One in-progress construction.
///
/// **Concurrency Model**: the API takes `&mut self`, so one pipeline is driven by one
/// caller at a time. Share finished results (the `Arc` from `build()`), not pipelines.
pub struct BuilderPipeline<V, A: Assemble<V> = Assembly> {
    assembler: A,
    components: Vec<(String, V)>,
    finalized: Option<Arc<A::Output>>,
}

impl<V: Clone> BuilderPipeline<V, Assembly> {
    pub fn new() -> Self {
        Self::with_assembler(Assembly)
    }
}

impl<V: Clone> Default for BuilderPipeline<V, Assembly> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, A: Assemble<V>> BuilderPipeline<V, A> {
    pub fn with_assembler(assembler: A) -> Self {
        Self {
            assembler,
            components: Vec::new(),
            finalized: None,
        }
    }

    pub fn state(&self) -> BuilderState {
        match (&self.finalized, self.components.is_empty()) {
            (Some(_), _) => BuilderState::Finalized,
            (None, true) => BuilderState::Empty,
            (None, false) => BuilderState::Accumulating,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    pub fn component(&self, slot: &str) -> Option<&V> {
        self.components
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<V: Debug, A: Assemble<V>> BuilderPipeline<V, A> {
    /// Adds `value` under `slot`, or overwrites the slot in place if it already exists.
    ///
    /// # Errors
    /// [`CreationError::InvalidState`] once the pipeline has been built.
    pub fn add_component(
        &mut self,
        slot: impl Into<String>,
        value: V,
    ) -> Result<&mut Self, CreationError> {
        let slot = slot.into();
        if self.is_finalized() {
            warn!(%slot, "Component added after build");
            return Err(CreationError::InvalidState(format!(
                "cannot add {slot}: pipeline already finalized"
            )));
        }

        debug!(%slot, ?value, "Add component");
        match self.components.iter_mut().find(|(name, _)| *name == slot) {
            Some((_, existing)) => *existing = value,
            None => self.components.push((slot, value)),
        }
        Ok(self)
    }

    /// Finalizes the pipeline and returns the assembled result.
    ///
    /// Calling it again returns the same `Arc` without re-assembling.
    ///
    /// # Errors
    /// [`CreationError::MissingComponent`] if a required slot is empty. The pipeline
    /// stays open so the caller can fill the slot and retry.
    pub fn build(&mut self) -> Result<Arc<A::Output>, CreationError> {
        if let Some(done) = &self.finalized {
            debug!("Build repeated, returning finalized result");
            return Ok(Arc::clone(done));
        }

        if let Some(missing) = self
            .assembler
            .required_slots()
            .iter()
            .find(|slot| self.component(slot).is_none())
        {
            warn!(slot = *missing, "Build with missing component");
            return Err(CreationError::MissingComponent(missing.to_string()));
        }

        let output = Arc::new(self.assembler.assemble(&self.components));
        info!(components = self.components.len(), "Finalized");
        self.finalized = Some(Arc::clone(&output));
        Ok(output)
    }
}

/// Caller-side orchestration of a fixed sequence of `add_component` calls.
///
/// The pipeline itself never assumes a recipe; a director does.
pub trait Director<V: Debug, A: Assemble<V>> {
    /// Issue this director's recipe against `pipeline`.
    fn direct(&self, pipeline: &mut BuilderPipeline<V, A>) -> Result<(), CreationError>;

    /// Run the recipe on a fresh pipeline and finalize it.
    fn construct(
        &self,
        mut pipeline: BuilderPipeline<V, A>,
    ) -> Result<Arc<A::Output>, CreationError> {
        self.direct(&mut pipeline)?;
        pipeline.build()
    }
}
