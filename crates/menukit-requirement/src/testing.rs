//! Mock host for requirement tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use menukit_contracts::{player::PlayerId, settings::PluginSettings};
use menukit_core::{
    host::{HostServices, StaticVariables},
    traits::{CommandRegistry, Economy, Messenger, PermissionService},
    BasicExpressionEngine,
};
use parking_lot::Mutex;

#[derive(Default)]
pub struct MockHost {
    pub messages: Mutex<Vec<(PlayerId, String)>>,
    pub granted: Mutex<HashSet<String>>,
    pub balances: Mutex<HashMap<PlayerId, f64>>,
}

impl MockHost {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn grant(&self, permission: &str) {
        self.granted.lock().insert(permission.to_string());
    }

    pub fn set_balance(&self, player: PlayerId, amount: f64) {
        self.balances.lock().insert(player, amount);
    }

    pub fn balance_of(&self, player: &PlayerId) -> f64 {
        self.balances.lock().get(player).copied().unwrap_or(0.0)
    }
}

impl Messenger for MockHost {
    fn send(&self, player: &PlayerId, message: &str) {
        self.messages.lock().push((*player, message.to_string()));
    }
}

impl PermissionService for MockHost {
    fn has_permission(&self, _player: &PlayerId, permission: &str) -> bool {
        self.granted.lock().contains(permission)
    }
}

impl CommandRegistry for MockHost {
    fn register_menu_command(&self, _alias: &str, _menu: &str) {}
}

impl Economy for MockHost {
    fn balance(&self, player: &PlayerId) -> f64 {
        self.balance_of(player)
    }

    fn withdraw(&self, player: &PlayerId, amount: f64) -> bool {
        let mut balances = self.balances.lock();
        let balance = balances.entry(*player).or_insert(0.0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }
}

/// Services backed by `host`, with `{level}` = 5. Must be called inside a
/// tokio runtime.
pub fn services(host: &Arc<MockHost>) -> HostServices {
    HostServices {
        settings: Arc::new(PluginSettings::default()),
        variables: Arc::new(StaticVariables::new().with("level", "5")),
        expressions: Arc::new(BasicExpressionEngine),
        messenger: host.clone(),
        permissions: host.clone(),
        commands: host.clone(),
        economy: host.clone(),
        runtime: tokio::runtime::Handle::current(),
    }
}
