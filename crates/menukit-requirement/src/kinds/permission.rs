//! `permission`: the player must hold every listed permission. A leading `-`
//! inverts an entry, so `-shop.banned` requires the player NOT to hold it.

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
    player::PlayerId,
};
use menukit_core::{host::HostServices, traits::Requirement};

pub struct PermissionRequirement {
    permissions: Vec<String>,
    services: HostServices,
}

impl PermissionRequirement {
    pub fn new(permissions: Vec<String>, services: HostServices) -> Self {
        Self { permissions, services }
    }

    pub fn build(value: &ConfigValue, services: &HostServices) -> MenuResult<Box<dyn Requirement>> {
        let permissions: Vec<String> = value
            .to_string_list()
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if permissions.is_empty() {
            return Err(MenuError::ConfigError {
                reason: "permission requirement needs at least one permission".to_string(),
            });
        }
        Ok(Box::new(Self::new(permissions, services.clone())))
    }
}

impl Requirement for PermissionRequirement {
    fn kind(&self) -> &'static str {
        "permission"
    }

    fn check(&self, player: &PlayerId) -> bool {
        self.permissions.iter().all(|permission| {
            let permission = self.services.apply_variables(permission, player);
            match permission.strip_prefix('-') {
                Some(denied) => !self.services.permissions.has_permission(player, denied),
                None => self.services.permissions.has_permission(player, &permission),
            }
        })
    }

    fn take(&self, _player: &PlayerId) {}
}
