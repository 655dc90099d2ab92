//! Menu definitions and how they are loaded from a configuration document.
//!
//! A document has three kinds of top-level sections:
//!
//! ```toml
//! [menu-settings]
//! name = "&6Shop of {player}"     # `title` overrides `name`
//! rows = 3
//! inventory-type = "CHEST"        # `inventory` overrides `inventory-type`
//! auto-refresh = 20               # `ticks` overrides `auto-refresh`
//! permission = "shop.open"        # default: <plugin_name>.<menu>
//! command = ["shop", "store"]
//! open-action = ["tell: &aWelcome"]
//! close-action = ["tell: &7Bye"]
//! [menu-settings.view-requirement.level]
//! type = "condition"
//! value = "{level} >= 5"
//!
//! [default-icon]                  # or `default-button`
//! id = "GRAY_STAINED_GLASS_PANE"
//!
//! [info]                          # any other section is a slot group
//! slot = 4
//! id = "PAPER"
//! ```
//!
//! Problems inside the document are logged and the offending value is
//! ignored, keeping whatever was set before it. Loading never fails.

use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, warn};

use menukit_button::{resolve_slots, ButtonBuilder};
use menukit_contracts::{
    config::{ConfigValue, Section},
    display::Frame,
    player::{PlayerId, Viewer},
    settings::{InventoryShape, SLOTS_PER_ROW},
};
use menukit_core::{
    host::HostServices,
    traits::{Button, FrameSource},
    ActionBuilder, ActionPipeline,
};
use menukit_requirement::{RequirementBuilder, RequirementSet};

/// Largest chest, in rows.
const MAX_ROWS: i64 = 6;

/// The registries a menu builds its components with.
#[derive(Clone)]
pub struct Builders {
    pub actions: Arc<ActionBuilder>,
    pub requirements: Arc<RequirementBuilder>,
    pub buttons: Arc<ButtonBuilder>,
}

impl Default for Builders {
    fn default() -> Self {
        Self {
            actions: Arc::new(ActionBuilder::new()),
            requirements: Arc::new(RequirementBuilder::new()),
            buttons: Arc::new(ButtonBuilder::new()),
        }
    }
}

/// What a menu displays: title, shape, and which button sits in which slot.
///
/// Shared by every session of the menu and handed to the display backend as
/// the session's `FrameSource`.
pub struct MenuLayout {
    title: String,
    shape: InventoryShape,
    size: usize,
    slots: BTreeMap<usize, Arc<dyn Button>>,
    /// Distinct slot-group buttons in declaration order.
    groups: Vec<Arc<dyn Button>>,
    default_button: Option<Arc<dyn Button>>,
    services: HostServices,
}

impl MenuLayout {
    pub fn title_template(&self) -> &str {
        &self.title
    }

    pub fn shape(&self) -> InventoryShape {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn button(&self, slot: usize) -> Option<&Arc<dyn Button>> {
        self.slots.get(&slot)
    }

    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.keys().copied()
    }

    pub fn default_button(&self) -> Option<&Arc<dyn Button>> {
        self.default_button.as_ref()
    }

    /// Refresh every slot-group button for `player`.
    pub fn refresh(&self, player: &PlayerId) {
        for button in &self.groups {
            button.refresh(player);
        }
    }

    /// Tell every button the viewer's session ended.
    pub fn close(&self, viewer: &Viewer) {
        for button in self.groups.iter().chain(self.default_button.iter()) {
            button.close(viewer);
        }
    }
}

impl FrameSource for MenuLayout {
    fn render_frame(&self, viewer: &Viewer) -> Frame {
        let mut frame = Frame {
            title: self.services.format_title(&self.title, &viewer.player),
            size: self.size,
            slots: BTreeMap::new(),
        };
        for slot in 0..self.size {
            let icon = self
                .slots
                .get(&slot)
                .and_then(|button| button.render(viewer))
                .or_else(|| self.default_button.as_ref()?.render(viewer));
            if let Some(icon) = icon {
                frame.slots.insert(slot, icon);
            }
        }
        frame
    }
}

/// Everything the controller needs to know about one menu. Immutable once
/// built; a reload builds a new one and swaps it in whole.
#[derive(Clone)]
pub struct MenuDefinition {
    pub name: String,
    pub permission: String,
    pub commands: Vec<String>,
    /// Refresh period in ticks; `<= 0` disables periodic refresh.
    pub ticks: i64,
    pub view_requirement: Arc<RequirementSet>,
    pub close_requirement: Arc<RequirementSet>,
    pub open_actions: ActionPipeline,
    pub close_actions: ActionPipeline,
    pub layout: Arc<MenuLayout>,
}

impl MenuDefinition {
    /// A menu with nothing in it: default permission, chest shape, no
    /// requirements, no refresh.
    pub fn empty(name: &str, services: &HostServices, builders: &Builders) -> Self {
        let shape = InventoryShape::default();
        Self {
            name: name.to_string(),
            permission: default_permission(name, services),
            commands: Vec::new(),
            ticks: 0,
            view_requirement: Arc::new(requirement_set(name, "view", services, builders)),
            close_requirement: Arc::new(requirement_set(name, "close", services, builders)),
            open_actions: ActionPipeline::default(),
            close_actions: ActionPipeline::default(),
            layout: Arc::new(MenuLayout {
                title: name.to_string(),
                shape,
                size: shape.default_size(),
                slots: BTreeMap::new(),
                groups: Vec::new(),
                default_button: None,
                services: services.clone(),
            }),
        }
    }

    /// Build a definition from a parsed document.
    pub fn from_section(
        name: &str,
        document: &Section,
        services: &HostServices,
        builders: &Builders,
    ) -> Self {
        let mut loader = Loader {
            menu: name,
            services,
            builders,
            definition: Self::empty(name, services, builders),
            shape: InventoryShape::default(),
            rows: None,
            title: None,
            slot_groups: Vec::new(),
            default_button: None,
        };
        for (key, value) in document.iter() {
            let Some(section) = value.as_section() else {
                debug!(menu = %name, key = %key, "top-level value is not a section; skipped");
                continue;
            };
            if key.eq_ignore_ascii_case("menu-settings") {
                loader.settings(section);
            } else if key.eq_ignore_ascii_case("default-icon") || key.eq_ignore_ascii_case("default-button") {
                loader.default_button(key, section);
            } else {
                loader.slot_group(key, section);
            }
        }
        loader.finish()
    }

    /// A copy with new requirement sets and everything else shared.
    pub fn with_requirements(
        &self,
        view: Option<&Section>,
        close: Option<&Section>,
        services: &HostServices,
        builders: &Builders,
    ) -> Self {
        let mut next = self.clone();
        if let Some(view) = view {
            let mut set = requirement_set(&self.name, "view", services, builders);
            set.load_from_section(view);
            next.view_requirement = Arc::new(set);
        }
        if let Some(close) = close {
            let mut set = requirement_set(&self.name, "close", services, builders);
            set.load_from_section(close);
            next.close_requirement = Arc::new(set);
        }
        next
    }
}

fn default_permission(menu: &str, services: &HostServices) -> String {
    format!("{}.{}", services.settings.plugin_name.to_ascii_lowercase(), menu)
}

fn requirement_set(menu: &str, which: &str, services: &HostServices, builders: &Builders) -> RequirementSet {
    RequirementSet::with_builders(
        format!("{}_{}", menu, which),
        services.clone(),
        builders.requirements.clone(),
        builders.actions.clone(),
    )
}

/// Accumulates one document before the layout is assembled.
struct Loader<'a> {
    menu: &'a str,
    services: &'a HostServices,
    builders: &'a Builders,
    definition: MenuDefinition,
    shape: InventoryShape,
    rows: Option<i64>,
    title: Option<String>,
    slot_groups: Vec<(String, Vec<usize>, Arc<dyn Button>)>,
    default_button: Option<Arc<dyn Button>>,
}

impl Loader<'_> {
    fn settings(&mut self, settings: &Section) {
        let menu = self.menu;

        if let Some(value) = settings.get("open-action") {
            self.definition.open_actions = self.builders.actions.build(value, self.services);
        }
        if let Some(value) = settings.get("close-action") {
            self.definition.close_actions = self.builders.actions.build(value, self.services);
        }

        for key in ["inventory-type", "inventory"] {
            let Some(value) = settings.get(key) else { continue };
            match value.to_text().unwrap_or_default().parse::<InventoryShape>() {
                Ok(shape) => self.shape = shape,
                Err(e) => warn!(menu = %menu, key = key, value = ?value, error = %e, "illegal inventory type; ignored"),
            }
        }

        if let Some(value) = settings.get("rows") {
            match whole_number(value) {
                Some(rows) if (1..=MAX_ROWS).contains(&rows) => self.rows = Some(rows),
                _ => warn!(menu = %menu, key = "rows", value = ?value, "rows must be between 1 and 6; ignored"),
            }
        }

        for key in ["auto-refresh", "ticks"] {
            let Some(value) = settings.get(key) else { continue };
            match whole_number(value) {
                Some(ticks) => self.definition.ticks = ticks,
                None => warn!(menu = %menu, key = key, value = ?value, "refresh ticks must be a number; ignored"),
            }
        }

        if let Some(section) = settings.section("view-requirement") {
            let mut set = requirement_set(menu, "view", self.services, self.builders);
            set.load_from_section(section);
            self.definition.view_requirement = Arc::new(set);
        }
        if let Some(section) = settings.section("close-requirement") {
            let mut set = requirement_set(menu, "close", self.services, self.builders);
            set.load_from_section(section);
            self.definition.close_requirement = Arc::new(set);
        }

        if let Some(permission) = settings.get("permission").and_then(ConfigValue::to_text) {
            self.definition.permission = permission.trim().to_string();
        }

        if let Some(value) = settings.get("command") {
            for alias in value.to_string_list() {
                if alias.is_empty() || alias.contains(char::is_whitespace) {
                    warn!(menu = %menu, key = "command", value = %alias, "illegal characters in command; ignored");
                } else {
                    self.definition.commands.push(alias);
                }
            }
        }

        for key in ["name", "title"] {
            if let Some(title) = settings.get(key).and_then(ConfigValue::to_text) {
                self.title = Some(title);
            }
        }
    }

    fn default_button(&mut self, key: &str, section: &Section) {
        match self.builders.buttons.build(section, self.services) {
            Ok(button) => self.default_button = Some(button),
            Err(e) => warn!(menu = %self.menu, key = %key, error = %e, "invalid default button; ignored"),
        }
    }

    fn slot_group(&mut self, key: &str, section: &Section) {
        let slots = match resolve_slots(section) {
            Ok(slots) => slots,
            Err(e) => {
                warn!(menu = %self.menu, key = %key, error = %e, "invalid slots; button ignored");
                return;
            }
        };
        if slots.is_empty() {
            warn!(menu = %self.menu, key = %key, "button has no slot; ignored");
            return;
        }
        match self.builders.buttons.build(section, self.services) {
            Ok(button) => self.slot_groups.push((key.to_string(), slots, button)),
            Err(e) => warn!(menu = %self.menu, key = %key, error = %e, "invalid button; ignored"),
        }
    }

    fn finish(self) -> MenuDefinition {
        let menu = self.menu;
        let size = match self.rows {
            Some(rows) if self.shape.is_resizable() => rows as usize * SLOTS_PER_ROW,
            Some(rows) => {
                warn!(menu = %menu, key = "rows", value = rows, shape = ?self.shape, "inventory type has a fixed size; rows ignored");
                self.shape.default_size()
            }
            None => self.shape.default_size(),
        };

        let mut slots = BTreeMap::new();
        let mut groups = Vec::with_capacity(self.slot_groups.len());
        for (key, group_slots, button) in self.slot_groups {
            for slot in group_slots {
                if slot >= size {
                    warn!(menu = %menu, key = %key, value = slot, size, "slot outside the inventory; ignored");
                    continue;
                }
                slots.insert(slot, button.clone());
            }
            groups.push(button);
        }

        let mut definition = self.definition;
        definition.layout = Arc::new(MenuLayout {
            title: self.title.unwrap_or_else(|| menu.to_string()),
            shape: self.shape,
            size,
            slots,
            groups,
            default_button: self.default_button,
            services: self.services.clone(),
        });
        debug!(
            menu = %menu,
            size,
            ticks = definition.ticks,
            permission = %definition.permission,
            "menu definition loaded"
        );
        definition
    }
}

fn whole_number(value: &ConfigValue) -> Option<i64> {
    value.as_number().filter(|n| n.is_finite()).map(|n| n as i64)
}
