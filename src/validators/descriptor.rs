//! Validator descriptors and the validator contract.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rules::Issue;

/// Granularity of target a validator can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorScope {
    File,
    Subtree,
    Workspace,
    Artifact,
}

impl ValidatorScope {
    pub const ALL: [ValidatorScope; 4] = [
        ValidatorScope::File,
        ValidatorScope::Subtree,
        ValidatorScope::Workspace,
        ValidatorScope::Artifact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorScope::File => "file",
            ValidatorScope::Subtree => "subtree",
            ValidatorScope::Workspace => "workspace",
            ValidatorScope::Artifact => "artifact",
        }
    }
}

impl std::fmt::Display for ValidatorScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown validator scope '{}' (expected file, subtree, workspace or artifact)",
                    s
                )
            })
    }
}

/// What a validator applies to and what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescriptor {
    /// Unique id within a registry.
    pub validator_id: String,
    pub display_name: String,
    #[serde(default)]
    pub applicable_scopes: BTreeSet<ValidatorScope>,
    /// Empty means any contract type.
    #[serde(default)]
    pub applicable_contract_types: BTreeSet<String>,
    /// Empty means any tuple type.
    #[serde(default)]
    pub applicable_tuple_types: BTreeSet<String>,
    #[serde(default)]
    pub required_capabilities: BTreeSet<String>,
}

impl ValidatorDescriptor {
    /// Create a descriptor with no scopes, filters or requirements.
    pub fn new(validator_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            validator_id: validator_id.into(),
            display_name: display_name.into(),
            applicable_scopes: BTreeSet::new(),
            applicable_contract_types: BTreeSet::new(),
            applicable_tuple_types: BTreeSet::new(),
            required_capabilities: BTreeSet::new(),
        }
    }

    pub fn with_scope(mut self, scope: ValidatorScope) -> Self {
        self.applicable_scopes.insert(scope);
        self
    }

    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.applicable_contract_types.insert(contract_type.into());
        self
    }

    pub fn with_tuple_type(mut self, tuple_type: impl Into<String>) -> Self {
        self.applicable_tuple_types.insert(tuple_type.into());
        self
    }

    pub fn requires_capability(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.insert(capability.into());
        self
    }

    /// Whether this descriptor survives every filter in `query`.
    pub fn matches(&self, query: &ResolveQuery) -> bool {
        if query.deny_list.contains(&self.validator_id) {
            return false;
        }
        if let Some(scope) = query.scope {
            if !self.applicable_scopes.contains(&scope) {
                return false;
            }
        }
        overlaps(&self.applicable_contract_types, &query.contract_types)
            && overlaps(&self.applicable_tuple_types, &query.tuple_types)
            && self
                .required_capabilities
                .is_subset(&query.available_capabilities)
    }
}

/// An empty side on either end means "no restriction".
fn overlaps(applicable: &BTreeSet<String>, requested: &BTreeSet<String>) -> bool {
    applicable.is_empty()
        || requested.is_empty()
        || !applicable.is_disjoint(requested)
}

/// Filters for [`ValidatorRegistry::resolve`](super::ValidatorRegistry::resolve).
///
/// All filters are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveQuery {
    pub scope: Option<ValidatorScope>,
    pub contract_types: BTreeSet<String>,
    pub tuple_types: BTreeSet<String>,
    pub available_capabilities: BTreeSet<String>,
    pub deny_list: BTreeSet<String>,
}

impl ResolveQuery {
    /// A query that matches every validator without required capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(mut self, scope: ValidatorScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.contract_types.insert(contract_type.into());
        self
    }

    pub fn tuple_type(mut self, tuple_type: impl Into<String>) -> Self {
        self.tuple_types.insert(tuple_type.into());
        self
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.available_capabilities.insert(capability.into());
        self
    }

    pub fn deny(mut self, validator_id: impl Into<String>) -> Self {
        self.deny_list.insert(validator_id.into());
        self
    }
}

/// The thing a validator is asked to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTarget {
    pub scope: ValidatorScope,
    pub path: PathBuf,
    pub contract_type: Option<String>,
    pub tuple_type: Option<String>,
}

impl ValidationTarget {
    pub fn new(scope: ValidatorScope, path: impl Into<PathBuf>) -> Self {
        Self {
            scope,
            path: path.into(),
            contract_type: None,
            tuple_type: None,
        }
    }

    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.contract_type = Some(contract_type.into());
        self
    }

    pub fn with_tuple_type(mut self, tuple_type: impl Into<String>) -> Self {
        self.tuple_type = Some(tuple_type.into());
        self
    }
}

/// A validator instance produced by a registry factory.
pub trait Validator: Send + Sync {
    /// Descriptor of this validator; its id must match the one it was registered under.
    fn descriptor(&self) -> &ValidatorDescriptor;

    /// Check `target` and return any issues.
    fn validate(&self, target: &ValidationTarget) -> Vec<Issue>;
}

/// A validator type that can be registered without an explicit factory.
pub trait ValidatorType: Validator + Default + 'static {
    /// Descriptor every instance of this type reports.
    fn describe() -> ValidatorDescriptor;
}
