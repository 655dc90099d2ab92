//! Building actions from configuration strings.
//!
//! Actions are written as `"<type>: <value>"`. A string without a registered
//! type prefix is handed whole to the default type (`tell`), so messages
//! containing a colon still work.
//!
//! ```toml
//! open-action = ["tell: &aWelcome, {player}", "delay: 20", "Thanks for visiting"]
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::warn;

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
    player::PlayerId,
};

use crate::{host::HostServices, pipeline::ActionPipeline, traits::Action};

/// Constructs an action from the text after its type prefix.
pub type ActionFactory =
    Box<dyn Fn(&str, &HostServices) -> MenuResult<Arc<dyn Action>> + Send + Sync>;

/// Registry of action types.
pub struct ActionBuilder {
    factories: HashMap<String, ActionFactory>,
    default_type: String,
}

impl ActionBuilder {
    /// A builder with no types registered. Strings resolve to `default_type`.
    pub fn empty(default_type: impl Into<String>) -> Self {
        Self {
            factories: HashMap::new(),
            default_type: default_type.into().to_ascii_lowercase(),
        }
    }

    /// A builder with the built-in `tell` and `delay` types.
    pub fn new() -> Self {
        let mut builder = Self::empty("tell");
        builder.register(
            "tell",
            Box::new(|value: &str, services: &HostServices| -> MenuResult<Arc<dyn Action>> {
                Ok(Arc::new(TellAction {
                    message: value.to_string(),
                    services: services.clone(),
                }) as Arc<dyn Action>)
            }),
        );
        builder.register(
            "delay",
            Box::new(|value: &str, services: &HostServices| -> MenuResult<Arc<dyn Action>> {
                let ticks = value.trim().parse::<i64>().map_err(|_| MenuError::ConfigError {
                    reason: format!("delay expects a tick count, got '{}'", value),
                })?;
                Ok(Arc::new(DelayAction {
                    duration: services.settings.ticks_to_duration(ticks),
                }) as Arc<dyn Action>)
            }),
        );
        builder
    }

    /// Register `factory` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, factory: ActionFactory) {
        self.factories.insert(name.into().to_ascii_lowercase(), factory);
    }

    /// Build one action from a `"<type>: <value>"` string.
    pub fn build_one(&self, raw: &str, services: &HostServices) -> MenuResult<Arc<dyn Action>> {
        let (kind, value) = match raw.split_once(':') {
            Some((prefix, rest)) if self.factories.contains_key(&prefix.trim().to_ascii_lowercase()) => {
                (prefix.trim().to_ascii_lowercase(), rest.trim())
            }
            _ => (self.default_type.clone(), raw.trim()),
        };
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| MenuError::UnknownComponent {
                kind: "action",
                name: kind.clone(),
            })?;
        factory(value, services)
    }

    /// Build a pipeline from a scalar or list value. Entries that fail to
    /// build are logged and skipped.
    pub fn build(&self, value: &ConfigValue, services: &HostServices) -> ActionPipeline {
        let mut pipeline = ActionPipeline::default();
        for raw in value.to_string_list() {
            match self.build_one(&raw, services) {
                Ok(action) => pipeline.push(action),
                Err(e) => warn!(action = %raw, error = %e, "skipping invalid action"),
            }
        }
        pipeline
    }
}

impl Default for ActionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Send a message to the player.
pub struct TellAction {
    message: String,
    services: HostServices,
}

#[async_trait]
impl Action for TellAction {
    fn name(&self) -> &str {
        "tell"
    }

    async fn run(&self, player: PlayerId) -> MenuResult<()> {
        self.services.send_message(&player, &self.message);
        Ok(())
    }
}

/// Suspend the pipeline for a number of ticks.
pub struct DelayAction {
    duration: Duration,
}

#[async_trait]
impl Action for DelayAction {
    fn name(&self) -> &str {
        "delay"
    }

    async fn run(&self, _player: PlayerId) -> MenuResult<()> {
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}
