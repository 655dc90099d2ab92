//! `condition`: every expression must evaluate to something other than zero.

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
    player::PlayerId,
};
use menukit_core::{host::HostServices, traits::Requirement};
use tracing::debug;

/// A list of expressions, each variable-substituted then evaluated.
///
/// An expression that does not evaluate is reported to the player and
/// skipped; it never fails the requirement on its own. The requirement fails
/// iff some evaluated expression is exactly zero.
pub struct ConditionRequirement {
    expressions: Vec<String>,
    services: HostServices,
}

impl ConditionRequirement {
    pub fn new(expressions: Vec<String>, services: HostServices) -> Self {
        Self { expressions, services }
    }

    pub fn build(value: &ConfigValue, services: &HostServices) -> MenuResult<Box<dyn Requirement>> {
        let expressions = value.to_string_list();
        if expressions.is_empty() {
            return Err(MenuError::ConfigError {
                reason: "condition requirement needs at least one expression".to_string(),
            });
        }
        Ok(Box::new(Self::new(expressions, services.clone())))
    }
}

impl Requirement for ConditionRequirement {
    fn kind(&self) -> &'static str {
        "condition"
    }

    fn check(&self, player: &PlayerId) -> bool {
        for raw in &self.expressions {
            let expression = self.services.apply_variables(raw, player);
            match self.services.expressions.evaluate(&expression) {
                None => {
                    debug!(player = %player, expression = %expression, "invalid condition skipped");
                    let report = self
                        .services
                        .settings
                        .messages
                        .invalid_condition
                        .replace("{input}", &expression);
                    self.services.send_message(player, &report);
                }
                Some(value) if value == 0.0 => return false,
                Some(_) => {}
            }
        }
        true
    }

    fn take(&self, _player: &PlayerId) {}
}
