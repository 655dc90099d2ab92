//! Mock host and display backend for controller tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;

use menukit_contracts::{
    display::Frame,
    error::{MenuError, MenuResult},
    player::{PlayerId, Viewer},
    settings::PluginSettings,
};
use menukit_core::{
    host::{HostServices, StaticVariables},
    traits::{
        CommandRegistry, DisplayBackend, DisplayHandle, Economy, FrameSource, Messenger,
        PermissionService,
    },
    BasicExpressionEngine,
};

// ── Host ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockHost {
    messages: Mutex<Vec<String>>,
    granted: Mutex<HashSet<String>>,
    balances: Mutex<HashMap<PlayerId, f64>>,
    commands: Mutex<Vec<(String, String)>>,
}

impl MockHost {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
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

    pub fn commands(&self) -> Vec<(String, String)> {
        self.commands.lock().clone()
    }
}

impl Messenger for MockHost {
    fn send(&self, _player: &PlayerId, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

impl PermissionService for MockHost {
    fn has_permission(&self, _player: &PlayerId, permission: &str) -> bool {
        self.granted.lock().contains(permission)
    }
}

impl CommandRegistry for MockHost {
    fn register_menu_command(&self, alias: &str, menu: &str) {
        self.commands.lock().push((alias.to_string(), menu.to_string()));
    }
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

/// Services backed by `host`, with `{shop}` = "Bazaar". Must be called
/// inside a tokio runtime.
pub fn services(host: &Arc<MockHost>) -> HostServices {
    HostServices {
        settings: Arc::new(PluginSettings::default()),
        variables: Arc::new(StaticVariables::new().with("shop", "Bazaar")),
        expressions: Arc::new(BasicExpressionEngine),
        messenger: host.clone(),
        permissions: host.clone(),
        commands: host.clone(),
        economy: host.clone(),
        runtime: tokio::runtime::Handle::current(),
    }
}

// ── Display backend ──────────────────────────────────────────────────────────

pub struct MockDisplay {
    pub viewer: Viewer,
    source: Arc<dyn FrameSource>,
    pub inits: AtomicUsize,
    pub updates: AtomicUsize,
    pub force_update: AtomicBool,
    frame: Mutex<Option<Frame>>,
}

impl MockDisplay {
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// The last frame drawn by `init` or `update`.
    pub fn frame(&self) -> Option<Frame> {
        self.frame.lock().clone()
    }

    fn draw(&self) {
        *self.frame.lock() = Some(self.source.render_frame(&self.viewer));
    }
}

impl DisplayHandle for MockDisplay {
    fn init(&self) -> MenuResult<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.draw();
        Ok(())
    }

    fn update(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.draw();
    }

    fn set_force_update(&self, force: bool) {
        self.force_update.store(force, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockBackend {
    displays: Mutex<HashMap<PlayerId, Arc<MockDisplay>>>,
    closed: Mutex<Vec<PlayerId>>,
    pub stops: AtomicUsize,
    pub fail_create: AtomicBool,
}

impl MockBackend {
    pub fn display(&self, player: &PlayerId) -> Option<Arc<MockDisplay>> {
        self.displays.lock().get(player).cloned()
    }

    /// Players whose display the controller asked to close.
    pub fn closed(&self) -> Vec<PlayerId> {
        self.closed.lock().clone()
    }
}

impl DisplayBackend for MockBackend {
    fn create_display(
        &self,
        viewer: Viewer,
        source: Arc<dyn FrameSource>,
    ) -> MenuResult<Arc<dyn DisplayHandle>> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(MenuError::DisplayFailed {
                reason: "player is offline".to_string(),
            });
        }
        let display = Arc::new(MockDisplay {
            viewer,
            source,
            inits: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            force_update: AtomicBool::new(false),
            frame: Mutex::new(None),
        });
        self.displays.lock().insert(viewer.player, display.clone());
        Ok(display)
    }

    fn get_display(&self, player: &PlayerId) -> Option<Arc<dyn DisplayHandle>> {
        self.displays
            .lock()
            .get(player)
            .map(|d| d.clone() as Arc<dyn DisplayHandle>)
    }

    fn remove_display(&self, player: &PlayerId) {
        self.displays.lock().remove(player);
    }

    fn close_display(&self, player: &PlayerId) {
        self.closed.lock().push(*player);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.displays.lock().clear();
    }
}
