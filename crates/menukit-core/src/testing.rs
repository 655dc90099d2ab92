//! Mock host collaborators for unit tests.

use std::sync::Arc;

use menukit_contracts::{player::PlayerId, settings::PluginSettings};
use parking_lot::Mutex;

use crate::{
    expression::BasicExpressionEngine,
    host::{HostServices, StaticVariables},
    traits::{CommandRegistry, Economy, Messenger, PermissionService},
};

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(PlayerId, String)>>,
}

impl RecordingMessenger {
    pub fn messages(&self) -> Vec<(PlayerId, String)> {
        self.sent.lock().clone()
    }
}

impl Messenger for RecordingMessenger {
    fn send(&self, player: &PlayerId, message: &str) {
        self.sent.lock().push((*player, message.to_string()));
    }
}

pub struct AllowAll;

impl PermissionService for AllowAll {
    fn has_permission(&self, _player: &PlayerId, _permission: &str) -> bool {
        true
    }
}

impl CommandRegistry for AllowAll {
    fn register_menu_command(&self, _alias: &str, _menu: &str) {}
}

impl Economy for AllowAll {
    fn balance(&self, _player: &PlayerId) -> f64 {
        0.0
    }

    fn withdraw(&self, _player: &PlayerId, _amount: f64) -> bool {
        false
    }
}

/// Services wired to `messenger`, with `{coins}` = 10. Must be called inside
/// a tokio runtime.
pub fn services(messenger: Arc<RecordingMessenger>) -> HostServices {
    HostServices {
        settings: Arc::new(PluginSettings::default()),
        variables: Arc::new(StaticVariables::new().with("coins", "10")),
        expressions: Arc::new(BasicExpressionEngine),
        messenger,
        permissions: Arc::new(AllowAll),
        commands: Arc::new(AllowAll),
        economy: Arc::new(AllowAll),
        runtime: tokio::runtime::Handle::current(),
    }
}
