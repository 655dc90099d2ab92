//! A host that lives in the terminal.
//!
//! `ConsoleHost` plays every host collaborator: chat goes to stdout,
//! permissions and balances live in memory, and variables resolve against
//! that state. `ConsoleBackend` prints each frame it draws and, like a real
//! server, raises a close event on the bus when asked to close a display.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Weak},
};

use parking_lot::Mutex;
use tracing::debug;

use menukit_contracts::{
    display::Frame,
    error::MenuResult,
    player::{PlayerId, Viewer},
};
use menukit_core::{
    events::{EventBus, HostEvent},
    host::format_number,
    traits::{
        CommandRegistry, DisplayBackend, DisplayHandle, Economy, FrameSource, Messenger,
        PermissionService, VariableResolver,
    },
};

// ── Host ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ConsoleHost {
    names: Mutex<HashMap<PlayerId, String>>,
    granted: Mutex<HashMap<PlayerId, HashSet<String>>>,
    balances: Mutex<HashMap<PlayerId, f64>>,
    hour: Mutex<u32>,
}

impl ConsoleHost {
    pub fn join(&self, name: &str) -> PlayerId {
        let player = PlayerId::new();
        self.names.lock().insert(player, name.to_string());
        player
    }

    pub fn name(&self, player: &PlayerId) -> String {
        self.names
            .lock()
            .get(player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }

    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.granted
            .lock()
            .entry(player)
            .or_default()
            .insert(permission.to_string());
    }

    pub fn deposit(&self, player: PlayerId, amount: f64) {
        *self.balances.lock().entry(player).or_insert(0.0) += amount;
    }

    pub fn set_hour(&self, hour: u32) {
        *self.hour.lock() = hour % 24;
    }
}

impl Messenger for ConsoleHost {
    fn send(&self, player: &PlayerId, message: &str) {
        println!("  [chat -> {}] {}", self.name(player), strip_colors(message));
    }
}

impl PermissionService for ConsoleHost {
    fn has_permission(&self, player: &PlayerId, permission: &str) -> bool {
        self.granted
            .lock()
            .get(player)
            .is_some_and(|set| set.contains(permission))
    }
}

impl CommandRegistry for ConsoleHost {
    fn register_menu_command(&self, alias: &str, menu: &str) {
        println!("  [server] /{} now opens '{}'", alias, menu);
    }
}

impl Economy for ConsoleHost {
    fn balance(&self, player: &PlayerId) -> f64 {
        self.balances.lock().get(player).copied().unwrap_or(0.0)
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

impl VariableResolver for ConsoleHost {
    fn substitute(&self, text: &str, player: &PlayerId) -> String {
        text.replace("{player}", &self.name(player))
            .replace("{coins}", &format_number(self.balance(player)))
            .replace("{hour}", &self.hour.lock().to_string())
    }
}

/// Drop section-sign color codes so terminal output stays readable.
pub fn strip_colors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{00A7}' {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

// ── Display backend ──────────────────────────────────────────────────────────

/// How frames are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Text,
    Json,
}

pub struct ConsoleDisplay {
    viewer: Viewer,
    label: String,
    source: Arc<dyn FrameSource>,
    format: FrameFormat,
    force_update: Mutex<bool>,
    last: Mutex<Option<Frame>>,
}

impl ConsoleDisplay {
    fn draw(&self, reason: &str) {
        let frame = self.source.render_frame(&self.viewer);
        let mut last = self.last.lock();
        if !*self.force_update.lock() && last.as_ref() == Some(&frame) {
            debug!(player = %self.viewer.player, "frame unchanged; not redrawn");
            return;
        }
        print_frame(&self.label, reason, &frame, self.format);
        *last = Some(frame);
    }
}

impl DisplayHandle for ConsoleDisplay {
    fn init(&self) -> MenuResult<()> {
        self.draw("open");
        Ok(())
    }

    fn update(&self) {
        self.draw("update");
    }

    fn set_force_update(&self, force: bool) {
        *self.force_update.lock() = force;
    }
}

pub struct ConsoleBackend {
    menu: String,
    host: Arc<ConsoleHost>,
    bus: Weak<EventBus>,
    format: FrameFormat,
    displays: Mutex<HashMap<PlayerId, Arc<ConsoleDisplay>>>,
}

impl ConsoleBackend {
    pub fn new(menu: &str, host: Arc<ConsoleHost>, bus: &Arc<EventBus>, format: FrameFormat) -> Self {
        Self {
            menu: menu.to_string(),
            host,
            bus: Arc::downgrade(bus),
            format,
            displays: Mutex::new(HashMap::new()),
        }
    }

    /// Simulate the player pressing escape. Returns whether the display
    /// actually closed.
    pub fn player_closes(&self, player: PlayerId) -> bool {
        let Some(bus) = self.bus.upgrade() else {
            return true;
        };
        let event = HostEvent::DisplayClosing { menu: self.menu.clone(), player };
        let vetoed = bus.publish(&event) == menukit_core::events::EventResponse::Veto;
        if vetoed {
            println!("  [server] {} tried to close '{}' but stays in it", self.host.name(&player), self.menu);
        }
        !vetoed
    }
}

impl DisplayBackend for ConsoleBackend {
    fn create_display(
        &self,
        viewer: Viewer,
        source: Arc<dyn FrameSource>,
    ) -> MenuResult<Arc<dyn DisplayHandle>> {
        let display = Arc::new(ConsoleDisplay {
            viewer,
            label: format!("{} @ {}", self.menu, self.host.name(&viewer.player)),
            source,
            format: self.format,
            force_update: Mutex::new(false),
            last: Mutex::new(None),
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
        println!("  [server] closing '{}' for {}", self.menu, self.host.name(player));
        self.player_closes(*player);
    }

    fn stop(&self) {
        let closed = self.displays.lock().drain().count();
        println!("  [server] '{}' stopped, {} display(s) closed", self.menu, closed);
    }
}

pub fn print_frame(label: &str, reason: &str, frame: &Frame, format: FrameFormat) {
    match format {
        FrameFormat::Json => match serde_json::to_string_pretty(frame) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode frame: {}", e),
        },
        FrameFormat::Text => {
            println!(
                "  ┌ {} ({}) \"{}\" [{} slots]",
                label,
                reason,
                strip_colors(&frame.title),
                frame.size
            );
            for (slot, icon) in &frame.slots {
                let name = icon.display_name.as_deref().map(strip_colors).unwrap_or_default();
                if name.trim().is_empty() {
                    continue;
                }
                println!("  │ {:>2}: {} x{} {}", slot, icon.material, icon.amount, name);
                for line in &icon.lore {
                    println!("  │       {}", strip_colors(line));
                }
            }
            println!("  └");
        }
    }
}
