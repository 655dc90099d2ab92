//! The bundle of host collaborators every builder and controller receives.
//!
//! `HostServices` is cheap to clone: every field is an `Arc` or a runtime
//! handle. Builders capture a clone in the components they construct so that
//! an action or requirement can reach the messenger or economy later without
//! any process-wide globals.

use std::{collections::HashMap, sync::Arc};

use menukit_contracts::{
    error::{MenuError, MenuResult},
    player::PlayerId,
    settings::PluginSettings,
};
use tokio::runtime::Handle;

use crate::traits::{
    CommandRegistry, Economy, ExpressionEngine, Messenger, PermissionService, VariableResolver,
};

/// Host collaborators plus the runtime that background work is spawned on.
#[derive(Clone)]
pub struct HostServices {
    pub settings: Arc<PluginSettings>,
    pub variables: Arc<dyn VariableResolver>,
    pub expressions: Arc<dyn ExpressionEngine>,
    pub messenger: Arc<dyn Messenger>,
    pub permissions: Arc<dyn PermissionService>,
    pub commands: Arc<dyn CommandRegistry>,
    pub economy: Arc<dyn Economy>,
    /// Refresh tasks and action pipelines are spawned here.
    pub runtime: Handle,
}

impl HostServices {
    /// The runtime the caller is running on, for filling in `runtime`.
    ///
    /// Returns `MenuError::RuntimeUnavailable` outside a tokio runtime.
    pub fn current_runtime() -> MenuResult<Handle> {
        Handle::try_current().map_err(|e| MenuError::RuntimeUnavailable {
            reason: e.to_string(),
        })
    }

    /// Substitute variables for `player` in `text`.
    pub fn apply_variables(&self, text: &str, player: &PlayerId) -> String {
        self.variables.substitute(text, player)
    }

    /// Substitute variables, colorize, then deliver `template` to `player`.
    pub fn send_message(&self, player: &PlayerId, template: &str) {
        let message = colorize(&self.apply_variables(template, player));
        self.messenger.send(player, &message);
    }

    /// Produce a display title: variables, then expression, then colorize.
    pub fn format_title(&self, template: &str, player: &PlayerId) -> String {
        let substituted = self.apply_variables(template, player);
        let evaluated = match self.expressions.evaluate(&substituted) {
            Some(value) => format_number(value),
            None => substituted,
        };
        colorize(&evaluated)
    }
}

/// Translate `&` color codes into section-sign codes.
///
/// Only `&` followed by a valid code character is translated, so a literal
/// "Fish & Chips" survives.
pub fn colorize(text: &str) -> String {
    const CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '&' && CODES.contains(*next) => {
                out.push('\u{00A7}');
                out.push(next.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Render a number the way a player expects: no trailing `.0` on integers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A `VariableResolver` backed by a fixed table plus the `{player}` id.
///
/// Hosts with a real placeholder system implement `VariableResolver`
/// themselves; this one covers demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticVariables {
    values: HashMap<String, String>,
}

impl StaticVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `{name}` → `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl VariableResolver for StaticVariables {
    fn substitute(&self, text: &str, player: &PlayerId) -> String {
        let mut out = text.replace("{player}", &player.to_string());
        for (name, value) in &self.values {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }
}
