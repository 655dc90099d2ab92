//! Registry that resolves a button `type` string to a constructor.

use std::{collections::HashMap, sync::Arc};

use tracing::warn;

use menukit_contracts::{
    config::{ConfigValue, Section},
    error::{MenuError, MenuResult},
};
use menukit_core::{host::HostServices, traits::Button};

use crate::{icon::IconButton, list::ListButton};

/// Builds a button from its section. Receives the builder so composite
/// buttons can build their children.
pub type ButtonFactory = Box<
    dyn Fn(&Section, &ButtonBuilder, &HostServices) -> MenuResult<Arc<dyn Button>> + Send + Sync,
>;

pub struct ButtonBuilder {
    factories: HashMap<String, ButtonFactory>,
    default_type: String,
}

impl ButtonBuilder {
    /// A builder with nothing registered. Sections without a `type` resolve
    /// to `default_type`.
    pub fn empty(default_type: impl Into<String>) -> Self {
        Self {
            factories: HashMap::new(),
            default_type: default_type.into().to_ascii_lowercase(),
        }
    }

    /// A builder with the built-in `simple` (default) and `list` types.
    pub fn new() -> Self {
        let mut builder = Self::empty("simple");
        builder.register("simple", Box::new(IconButton::build));
        builder.register("list", Box::new(ListButton::build));
        builder
    }

    pub fn register(&mut self, name: impl Into<String>, factory: ButtonFactory) {
        self.factories.insert(name.into().to_ascii_lowercase(), factory);
    }

    /// Build the button described by `section`.
    ///
    /// Returns `MenuError::UnknownComponent` for an unregistered `type`.
    pub fn build(&self, section: &Section, services: &HostServices) -> MenuResult<Arc<dyn Button>> {
        let kind = section
            .get("type")
            .and_then(ConfigValue::to_text)
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| self.default_type.clone());
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| MenuError::UnknownComponent {
                kind: "button",
                name: kind.clone(),
            })?;
        factory(section, self, services)
    }

    /// Build every sub-section of `section` in declaration order. Entries
    /// that are not sections or fail to build are logged and skipped.
    pub fn build_children(&self, section: &Section, services: &HostServices) -> Vec<Arc<dyn Button>> {
        let mut children = Vec::new();
        for (key, value) in section.iter() {
            let Some(child) = value.as_section() else {
                warn!(child = %key, "list child is not a section; ignored");
                continue;
            };
            match self.build(child, services) {
                Ok(button) => children.push(button),
                Err(e) => warn!(child = %key, error = %e, "invalid list child; ignored"),
            }
        }
        children
    }
}

impl Default for ButtonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
