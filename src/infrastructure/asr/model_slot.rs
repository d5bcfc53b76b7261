use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::application::ports::{BackendLoadError, BackendState};
use crate::domain::{BackendFamily, ModelDescriptor};

/// A loaded model together with the descriptor it was built from.
pub struct LoadedModel<M> {
    pub descriptor: ModelDescriptor,
    pub model: Arc<M>,
}

impl<M> Clone for LoadedModel<M> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            model: Arc::clone(&self.model),
        }
    }
}

struct SlotState<M> {
    ready: Option<LoadedModel<M>>,
    loading: Option<ModelDescriptor>,
}

/// Holds one backend model and serializes its loads.
///
/// Concurrent loads of the same descriptor collapse into one: later callers
/// wait on the gate and find the model ready. The ready model stays in
/// service while a replacement loads and is kept if that load fails or its
/// future is dropped.
pub struct ModelSlot<M> {
    state: RwLock<SlotState<M>>,
    gate: Mutex<()>,
}

impl<M> Default for ModelSlot<M> {
    fn default() -> Self {
        Self {
            state: RwLock::new(SlotState {
                ready: None,
                loading: None,
            }),
            gate: Mutex::new(()),
        }
    }
}

impl<M> ModelSlot<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `loader` unless `descriptor` is already ready and `force` is unset.
    /// Returns whether a load actually happened.
    pub async fn load_with<F, Fut>(
        &self,
        descriptor: &ModelDescriptor,
        force: bool,
        loader: F,
    ) -> Result<bool, BackendLoadError>
    where
        F: FnOnce(ModelDescriptor) -> Fut,
        Fut: Future<Output = Result<M, BackendLoadError>>,
    {
        let (_, loaded) = self.ensure(descriptor, force, loader).await?;
        Ok(loaded)
    }

    /// Hands out the model built from exactly `descriptor`, loading it first
    /// when the slot holds another one.
    ///
    /// The returned handle stays valid even if a later load replaces the slot.
    pub async fn acquire<F, Fut>(
        &self,
        descriptor: &ModelDescriptor,
        loader: F,
    ) -> Result<LoadedModel<M>, BackendLoadError>
    where
        F: FnOnce(ModelDescriptor) -> Fut,
        Fut: Future<Output = Result<M, BackendLoadError>>,
    {
        let (model, _) = self.ensure(descriptor, false, loader).await?;
        Ok(model)
    }

    async fn ensure<F, Fut>(
        &self,
        descriptor: &ModelDescriptor,
        force: bool,
        loader: F,
    ) -> Result<(LoadedModel<M>, bool), BackendLoadError>
    where
        F: FnOnce(ModelDescriptor) -> Fut,
        Fut: Future<Output = Result<M, BackendLoadError>>,
    {
        if !force && let Some(ready) = self.ready_with(descriptor) {
            return Ok((ready, false));
        }

        let _gate = self.gate.lock().await;
        if !force && let Some(ready) = self.ready_with(descriptor) {
            tracing::debug!(model = %descriptor.key, "Model loaded by a concurrent caller");
            return Ok((ready, false));
        }

        let guard = LoadingGuard::start(self, descriptor.clone());
        let model = loader(descriptor.clone()).await?;
        let loaded = LoadedModel {
            descriptor: descriptor.clone(),
            model: Arc::new(model),
        };
        guard.finish(loaded.clone());

        Ok((loaded, true))
    }

    pub fn snapshot(&self) -> Option<LoadedModel<M>> {
        self.read(|state| state.ready.clone())
    }

    pub fn descriptor(&self) -> Option<ModelDescriptor> {
        self.read(|state| state.ready.as_ref().map(|r| r.descriptor.clone()))
    }

    pub fn state(&self) -> BackendState {
        self.read(|state| match (&state.loading, &state.ready) {
            (Some(target), _) => BackendState::Loading(target.clone()),
            (None, Some(ready)) => BackendState::Ready(ready.descriptor.clone()),
            (None, None) => BackendState::Unloaded,
        })
    }

    fn ready_with(&self, descriptor: &ModelDescriptor) -> Option<LoadedModel<M>> {
        self.read(|state| {
            state
                .ready
                .as_ref()
                .filter(|r| r.descriptor == *descriptor)
                .cloned()
        })
    }

    fn read<T>(&self, f: impl FnOnce(&SlotState<M>) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut SlotState<M>) -> T) -> T {
        f(&mut self.state.write().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Marks the slot as loading; clears the mark however the load ends.
struct LoadingGuard<'a, M> {
    slot: &'a ModelSlot<M>,
}

impl<'a, M> LoadingGuard<'a, M> {
    fn start(slot: &'a ModelSlot<M>, target: ModelDescriptor) -> Self {
        tracing::info!(model = %target.key, "Loading model");
        slot.write(|state| state.loading = Some(target));
        Self { slot }
    }

    fn finish(self, loaded: LoadedModel<M>) {
        tracing::info!(model = %loaded.descriptor.key, "Model ready");
        self.slot.write(|state| state.ready = Some(loaded));
    }
}

impl<M> Drop for LoadingGuard<'_, M> {
    fn drop(&mut self) {
        self.slot.write(|state| state.loading = None);
    }
}

/// Rejects descriptors registered for another backend family.
pub fn ensure_family(
    descriptor: &ModelDescriptor,
    expected: BackendFamily,
) -> Result<(), BackendLoadError> {
    if descriptor.family == expected {
        Ok(())
    } else {
        Err(BackendLoadError::WrongFamily {
            model: descriptor.key.clone(),
            expected,
        })
    }
}
