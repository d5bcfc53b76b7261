use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{BackendFamily, ModelDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelNotFoundError {
    #[error("{family} model '{key}' is not registered")]
    UnknownKey { family: BackendFamily, key: String },
    #[error("no models registered for the {0} backend")]
    UnknownFamily(BackendFamily),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelRegistryError {
    #[error("{family} model '{key}' registered twice")]
    Duplicate { family: BackendFamily, key: String },
    #[error("active {family} model '{key}' is not registered")]
    UnknownActive { family: BackendFamily, key: String },
}

struct FamilyRegistry {
    models: BTreeMap<String, Arc<ModelDescriptor>>,
    active: RwLock<Arc<ModelDescriptor>>,
}

impl FamilyRegistry {
    fn active(&self) -> Arc<ModelDescriptor> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Registered models per backend family and the active selection for each.
///
/// The registry is fixed at construction. Only the active selection changes,
/// and it is swapped as a whole descriptor so readers never see a mix of two.
pub struct ModelManager {
    families: HashMap<BackendFamily, FamilyRegistry>,
}

impl ModelManager {
    pub fn builder() -> ModelManagerBuilder {
        ModelManagerBuilder::default()
    }

    /// Descriptor for `key`, or the active one when `key` is `None`.
    pub fn get_descriptor(
        &self,
        family: BackendFamily,
        key: Option<&str>,
    ) -> Result<Arc<ModelDescriptor>, ModelNotFoundError> {
        let registry = self.registry(family)?;
        match key {
            None => Ok(registry.active()),
            Some(key) => registry.models.get(key).cloned().ok_or_else(|| {
                ModelNotFoundError::UnknownKey {
                    family,
                    key: key.to_string(),
                }
            }),
        }
    }

    pub fn set_active(&self, family: BackendFamily, key: &str) -> Result<(), ModelNotFoundError> {
        let registry = self.registry(family)?;
        let descriptor =
            registry
                .models
                .get(key)
                .cloned()
                .ok_or_else(|| ModelNotFoundError::UnknownKey {
                    family,
                    key: key.to_string(),
                })?;

        let previous = std::mem::replace(
            &mut *registry
                .active
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            descriptor,
        );

        tracing::info!(
            family = %family,
            from = %previous.key,
            to = key,
            "Active model changed"
        );
        Ok(())
    }

    pub fn active_key(&self, family: BackendFamily) -> Result<String, ModelNotFoundError> {
        Ok(self.registry(family)?.active().key.clone())
    }

    /// All registered models of a family, keyed by model key.
    pub fn list_all(&self, family: BackendFamily) -> BTreeMap<String, ModelDescriptor> {
        self.families
            .get(&family)
            .map(|registry| {
                registry
                    .models
                    .iter()
                    .map(|(key, descriptor)| (key.clone(), (**descriptor).clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn families(&self) -> Vec<BackendFamily> {
        let mut families: Vec<_> = self.families.keys().copied().collect();
        families.sort();
        families
    }

    fn registry(&self, family: BackendFamily) -> Result<&FamilyRegistry, ModelNotFoundError> {
        self.families
            .get(&family)
            .ok_or(ModelNotFoundError::UnknownFamily(family))
    }
}

#[derive(Default)]
pub struct ModelManagerBuilder {
    models: BTreeMap<BackendFamily, BTreeMap<String, ModelDescriptor>>,
    active: HashMap<BackendFamily, String>,
    duplicate: Option<ModelRegistryError>,
}

impl ModelManagerBuilder {
    pub fn register(mut self, descriptor: ModelDescriptor) -> Self {
        let family = descriptor.family;
        let key = descriptor.key.clone();
        let previous = self
            .models
            .entry(family)
            .or_default()
            .insert(key.clone(), descriptor);
        if previous.is_some() && self.duplicate.is_none() {
            self.duplicate = Some(ModelRegistryError::Duplicate { family, key });
        }
        self
    }

    pub fn active(mut self, family: BackendFamily, key: impl Into<String>) -> Self {
        self.active.insert(family, key.into());
        self
    }

    /// Families without an explicit active key start on their first key in
    /// lexical order.
    pub fn build(self) -> Result<ModelManager, ModelRegistryError> {
        if let Some(err) = self.duplicate {
            return Err(err);
        }

        for (family, key) in &self.active {
            let registered = self
                .models
                .get(family)
                .is_some_and(|models| models.contains_key(key));
            if !registered {
                return Err(ModelRegistryError::UnknownActive {
                    family: *family,
                    key: key.clone(),
                });
            }
        }

        let mut families = HashMap::new();
        for (family, models) in self.models {
            let models: BTreeMap<String, Arc<ModelDescriptor>> = models
                .into_iter()
                .map(|(key, descriptor)| (key, Arc::new(descriptor)))
                .collect();

            let active = match self.active.get(&family) {
                Some(key) => models.get(key).cloned(),
                None => models.values().next().cloned(),
            };

            if let Some(active) = active {
                families.insert(
                    family,
                    FamilyRegistry {
                        models,
                        active: RwLock::new(active),
                    },
                );
            }
        }

        Ok(ModelManager { families })
    }
}
