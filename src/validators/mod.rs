//! Validator registry.
//!
//! Validators are pluggable checks described by a [`ValidatorDescriptor`]
//! (scopes, contract and tuple types, required capabilities) and created on
//! demand by a factory. The [`ValidatorRegistry`] is an explicit instance
//! owned by the application; there is no global registry.
//!
//! # Example
//!
//! ```
//! use xrepo_validate::rules::Issue;
//! use xrepo_validate::validators::{
//!     ResolveQuery, ValidationTarget, Validator, ValidatorDescriptor, ValidatorRegistry,
//!     ValidatorScope, ValidatorType,
//! };
//!
//! struct NoopValidator(ValidatorDescriptor);
//!
//! impl Default for NoopValidator {
//!     fn default() -> Self {
//!         Self(Self::describe())
//!     }
//! }
//!
//! impl Validator for NoopValidator {
//!     fn descriptor(&self) -> &ValidatorDescriptor {
//!         &self.0
//!     }
//!     fn validate(&self, _target: &ValidationTarget) -> Vec<Issue> {
//!         Vec::new()
//!     }
//! }
//!
//! impl ValidatorType for NoopValidator {
//!     fn describe() -> ValidatorDescriptor {
//!         ValidatorDescriptor::new("noop", "No-op").with_scope(ValidatorScope::File)
//!     }
//! }
//!
//! let registry = ValidatorRegistry::new();
//! registry.register_type::<NoopValidator>().unwrap();
//!
//! let found = registry.resolve(&ResolveQuery::new().scope(ValidatorScope::File));
//! assert_eq!(found.len(), 1);
//! assert!(registry.resolve(&ResolveQuery::new().scope(ValidatorScope::Artifact)).is_empty());
//! ```

pub mod descriptor;
pub mod registry;

pub use descriptor::{
    ResolveQuery, ValidationTarget, Validator, ValidatorDescriptor, ValidatorScope, ValidatorType,
};
pub use registry::{ValidatorFactory, ValidatorRegistry};
