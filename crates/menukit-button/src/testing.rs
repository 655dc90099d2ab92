//! Mock host for button tests.

use std::sync::Arc;

use menukit_contracts::{player::PlayerId, settings::PluginSettings};
use menukit_core::{
    host::{HostServices, StaticVariables},
    traits::{CommandRegistry, Economy, Messenger, PermissionService},
    BasicExpressionEngine,
};

pub struct NullHost;

impl Messenger for NullHost {
    fn send(&self, _player: &PlayerId, _message: &str) {}
}

impl PermissionService for NullHost {
    fn has_permission(&self, _player: &PlayerId, _permission: &str) -> bool {
        true
    }
}

impl CommandRegistry for NullHost {
    fn register_menu_command(&self, _alias: &str, _menu: &str) {}
}

impl Economy for NullHost {
    fn balance(&self, _player: &PlayerId) -> f64 {
        0.0
    }

    fn withdraw(&self, _player: &PlayerId, _amount: f64) -> bool {
        false
    }
}

/// Services with `{rank}` = "Gold". Must be called inside a tokio runtime.
pub fn services() -> HostServices {
    let host = Arc::new(NullHost);
    HostServices {
        settings: Arc::new(PluginSettings::default()),
        variables: Arc::new(StaticVariables::new().with("rank", "Gold")),
        expressions: Arc::new(BasicExpressionEngine),
        messenger: host.clone(),
        permissions: host.clone(),
        commands: host.clone(),
        economy: host,
        runtime: tokio::runtime::Handle::current(),
    }
}
