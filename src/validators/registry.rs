//! Thread-safe validator registry.
//!
//! Start-up code registers validators once; any thread may then resolve the
//! validators applicable to a target. Every operation takes the same lock.
//! Factories run outside it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::descriptor::{ResolveQuery, Validator, ValidatorDescriptor, ValidatorType};
use crate::error::{PolicyError, Result};

/// Produces a fresh validator instance.
pub type ValidatorFactory = Arc<dyn Fn() -> Box<dyn Validator> + Send + Sync>;

struct Entry {
    descriptor: ValidatorDescriptor,
    factory: ValidatorFactory,
}

/// Catalog of validators keyed by `validator_id`.
pub struct ValidatorRegistry {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    // The map has no multi-step invariants, so a poisoned lock is still usable.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a validator factory under `descriptor.validator_id`.
    ///
    /// The factory is invoked once to check that it produces a validator
    /// reporting the same id.
    ///
    /// # Errors
    ///
    /// - `ValidationError` for an empty id
    /// - `InvalidValidator` when the produced validator reports another id
    /// - `DuplicateValidator` when the id is taken; the existing entry is kept
    pub fn register<F>(&self, descriptor: ValidatorDescriptor, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Validator> + Send + Sync + 'static,
    {
        let validator_id = descriptor.validator_id.clone();
        if validator_id.trim().is_empty() {
            return Err(PolicyError::invalid("validator_id must not be empty"));
        }

        let sample = factory();
        let produced = &sample.descriptor().validator_id;
        if *produced != validator_id {
            return Err(PolicyError::InvalidValidator {
                validator_id,
                message: format!("factory produced a validator with id '{}'", produced),
            });
        }

        let mut entries = self.entries();
        if entries.contains_key(&validator_id) {
            return Err(PolicyError::DuplicateValidator { validator_id });
        }
        entries.insert(
            validator_id.clone(),
            Entry {
                descriptor,
                factory: Arc::new(factory),
            },
        );
        drop(entries);

        info!("Registered validator {}", validator_id);
        Ok(())
    }

    /// Register `V` using its own descriptor and `V::default` as the factory.
    pub fn register_type<V: ValidatorType>(&self) -> Result<()> {
        self.register(V::describe(), || Box::new(V::default()) as Box<dyn Validator>)
    }

    /// Instantiate every validator matching `query`, sorted by `validator_id`.
    pub fn resolve(&self, query: &ResolveQuery) -> Vec<Box<dyn Validator>> {
        let mut matched: Vec<(String, ValidatorFactory)> = self
            .entries()
            .values()
            .filter(|entry| entry.descriptor.matches(query))
            .map(|entry| {
                (
                    entry.descriptor.validator_id.clone(),
                    Arc::clone(&entry.factory),
                )
            })
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        debug!("Resolved {} validator(s)", matched.len());
        matched.into_iter().map(|(_, factory)| factory()).collect()
    }

    /// All descriptors, sorted by `validator_id`.
    pub fn list_all(&self) -> Vec<ValidatorDescriptor> {
        let mut descriptors: Vec<_> = self
            .entries()
            .values()
            .map(|entry| entry.descriptor.clone())
            .collect();
        descriptors.sort_by(|a, b| a.validator_id.cmp(&b.validator_id));
        descriptors
    }

    pub fn get(&self, validator_id: &str) -> Option<ValidatorDescriptor> {
        self.entries()
            .get(validator_id)
            .map(|entry| entry.descriptor.clone())
    }

    pub fn contains(&self, validator_id: &str) -> bool {
        self.entries().contains_key(validator_id)
    }

    /// Remove a validator. Returns whether it was registered.
    pub fn deregister(&self, validator_id: &str) -> bool {
        self.entries().remove(validator_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.list_all().into_iter().map(|d| d.validator_id).collect();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &ids)
            .finish()
    }
}
