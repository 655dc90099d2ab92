//! Plugin-wide settings and menu shape constants.
//!
//! `PluginSettings` is deserialized from TOML. Every field has a default so an
//! empty document is a valid configuration.
//!
//! Example:
//! ```toml
//! plugin_name = "menukit"
//! forced_update_inventory = false
//! tick_millis = 50
//!
//! [messages]
//! no_permission = "&cYou don't have permission to do this"
//! invalid_condition = "&cInvalid condition: {input}"
//! ```

use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, MenuResult};

/// Number of slots in one inventory row.
pub const SLOTS_PER_ROW: usize = 9;

/// The inventory kind a menu is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryShape {
    #[default]
    Chest,
    EnderChest,
    Barrel,
    ShulkerBox,
    Dispenser,
    Dropper,
    Hopper,
}

impl InventoryShape {
    /// Slot count of the shape when no `rows` override is given.
    pub fn default_size(&self) -> usize {
        match self {
            InventoryShape::Chest
            | InventoryShape::EnderChest
            | InventoryShape::Barrel
            | InventoryShape::ShulkerBox => 3 * SLOTS_PER_ROW,
            InventoryShape::Dispenser | InventoryShape::Dropper => 9,
            InventoryShape::Hopper => 5,
        }
    }

    /// Only chest-like shapes can be resized by row count.
    pub fn is_resizable(&self) -> bool {
        matches!(self, InventoryShape::Chest)
    }
}

impl FromStr for InventoryShape {
    type Err = MenuError;

    fn from_str(s: &str) -> MenuResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHEST" => Ok(InventoryShape::Chest),
            "ENDER_CHEST" => Ok(InventoryShape::EnderChest),
            "BARREL" => Ok(InventoryShape::Barrel),
            "SHULKER_BOX" => Ok(InventoryShape::ShulkerBox),
            "DISPENSER" => Ok(InventoryShape::Dispenser),
            "DROPPER" => Ok(InventoryShape::Dropper),
            "HOPPER" => Ok(InventoryShape::Hopper),
            other => Err(MenuError::ConfigError {
                reason: format!("illegal inventory type '{}'", other),
            }),
        }
    }
}

/// Player-facing message templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Sent when a player lacks a menu's permission.
    pub no_permission: String,
    /// Sent when a condition does not evaluate. `{input}` is replaced with
    /// the offending expression.
    pub invalid_condition: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_permission: "&cYou don't have permission to do this".to_string(),
            invalid_condition: "&cInvalid condition: {input}".to_string(),
        }
    }
}

/// Settings shared by every menu in one runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Prefix of the default menu permission: `<plugin_name>.<menu>`.
    pub plugin_name: String,
    /// Passed to `DisplayHandle::set_force_update` for every new display.
    pub forced_update_inventory: bool,
    /// Length of one server tick in milliseconds.
    pub tick_millis: u64,
    pub messages: Messages,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            plugin_name: "menukit".to_string(),
            forced_update_inventory: false,
            tick_millis: 50,
            messages: Messages::default(),
        }
    }
}

impl PluginSettings {
    /// Parse settings from TOML.
    ///
    /// Returns `MenuError::ConfigError` if the text is malformed.
    pub fn from_toml_str(s: &str) -> MenuResult<Self> {
        toml::from_str(s).map_err(|e| MenuError::ConfigError {
            reason: format!("failed to parse settings TOML: {}", e),
        })
    }

    /// Wall-clock length of `ticks` server ticks. Non-positive counts map to
    /// zero.
    pub fn ticks_to_duration(&self, ticks: i64) -> Duration {
        let ticks = u64::try_from(ticks).unwrap_or(0);
        Duration::from_millis(ticks.saturating_mul(self.tick_millis))
    }
}
