//! Registry that resolves a requirement `type` string to a constructor.

use std::collections::HashMap;

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
};
use menukit_core::{host::HostServices, traits::Requirement};

use crate::kinds::{ConditionRequirement, CooldownRequirement, CostRequirement, PermissionRequirement};

/// Builds a requirement from its `value`.
pub type RequirementFactory =
    Box<dyn Fn(&ConfigValue, &HostServices) -> MenuResult<Box<dyn Requirement>> + Send + Sync>;

pub struct RequirementBuilder {
    factories: HashMap<String, RequirementFactory>,
}

impl RequirementBuilder {
    /// A builder with nothing registered.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A builder with the built-in kinds: `condition`, `permission`, `cost`
    /// (alias `money`) and `cooldown`.
    pub fn new() -> Self {
        let mut builder = Self::empty();
        builder.register("condition", Box::new(ConditionRequirement::build));
        builder.register("permission", Box::new(PermissionRequirement::build));
        builder.register("cost", Box::new(CostRequirement::build));
        builder.register("money", Box::new(CostRequirement::build));
        builder.register("cooldown", Box::new(CooldownRequirement::build));
        builder
    }

    /// Register `factory` under `name` (case-insensitive), replacing any
    /// previous registration.
    pub fn register(&mut self, name: impl Into<String>, factory: RequirementFactory) {
        self.factories.insert(name.into().to_ascii_lowercase(), factory);
    }

    /// Build a requirement of type `kind`.
    ///
    /// Returns `MenuError::UnknownComponent` if nothing is registered under
    /// `kind`, or the factory's own error if `value` is unusable.
    pub fn build(
        &self,
        kind: &str,
        value: &ConfigValue,
        services: &HostServices,
    ) -> MenuResult<Box<dyn Requirement>> {
        let factory = self
            .factories
            .get(&kind.trim().to_ascii_lowercase())
            .ok_or_else(|| MenuError::UnknownComponent {
                kind: "requirement",
                name: kind.to_string(),
            })?;
        factory(value, services)
    }
}

impl Default for RequirementBuilder {
    fn default() -> Self {
        Self::new()
    }
}
