//! The `simple` button: one static icon with per-player text.

use std::sync::Arc;

use menukit_contracts::{
    config::{ConfigValue, Section},
    display::RenderedIcon,
    error::MenuResult,
    player::Viewer,
};
use menukit_core::{colorize, host::HostServices, traits::Button};

use crate::builder::ButtonBuilder;

const DEFAULT_MATERIAL: &str = "STONE";
const MAX_STACK: u32 = 64;

/// An icon whose name and lore are variable-substituted and colorized for
/// each viewer at render time.
///
/// ```toml
/// [info]
/// slot = 4
/// id = "PAPER"
/// name = "&eHello {player}"
/// lore = ["&7Line one", "&7Line two"]
/// amount = 1
/// ```
pub struct IconButton {
    material: String,
    name: Option<String>,
    lore: Vec<String>,
    amount: u32,
    services: HostServices,
}

impl IconButton {
    pub fn new(material: impl Into<String>, services: HostServices) -> Self {
        Self {
            material: material.into(),
            name: None,
            lore: Vec::new(),
            amount: 1,
            services,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, lore: Vec<String>) -> Self {
        self.lore = lore;
        self
    }

    pub fn build(
        section: &Section,
        _builder: &ButtonBuilder,
        services: &HostServices,
    ) -> MenuResult<Arc<dyn Button>> {
        let material = section
            .get("id")
            .or_else(|| section.get("material"))
            .and_then(ConfigValue::to_text)
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MATERIAL.to_string());
        let mut button = IconButton::new(material, services.clone());
        button.name = section.get("name").and_then(ConfigValue::to_text);
        button.lore = section
            .get("lore")
            .map(ConfigValue::to_string_list)
            .unwrap_or_default();
        button.amount = section
            .get("amount")
            .and_then(ConfigValue::as_number)
            .map(|n| (n as u32).clamp(1, MAX_STACK))
            .unwrap_or(1);
        Ok(Arc::new(button))
    }

    fn format(&self, text: &str, viewer: &Viewer) -> String {
        colorize(&self.services.apply_variables(text, &viewer.player))
    }
}

impl Button for IconButton {
    fn render(&self, viewer: &Viewer) -> Option<RenderedIcon> {
        Some(RenderedIcon {
            material: self.material.clone(),
            display_name: self.name.as_deref().map(|n| self.format(n, viewer)),
            lore: self.lore.iter().map(|l| self.format(l, viewer)).collect(),
            amount: self.amount,
        })
    }
}
