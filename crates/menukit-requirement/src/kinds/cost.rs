//! `cost` / `money`: the player must be able to pay `value`; taking the
//! requirement withdraws it.

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
    player::PlayerId,
};
use menukit_core::{host::HostServices, traits::Requirement};
use tracing::warn;

pub struct CostRequirement {
    amount: f64,
    services: HostServices,
}

impl CostRequirement {
    pub fn new(amount: f64, services: HostServices) -> Self {
        Self { amount, services }
    }

    pub fn build(value: &ConfigValue, services: &HostServices) -> MenuResult<Box<dyn Requirement>> {
        let amount = value
            .as_number()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .ok_or_else(|| MenuError::ConfigError {
                reason: format!("cost must be a non-negative number, got {:?}", value),
            })?;
        Ok(Box::new(Self::new(amount, services.clone())))
    }
}

impl Requirement for CostRequirement {
    fn kind(&self) -> &'static str {
        "cost"
    }

    fn check(&self, player: &PlayerId) -> bool {
        self.services.economy.balance(player) >= self.amount
    }

    fn take(&self, player: &PlayerId) {
        if self.amount > 0.0 && !self.services.economy.withdraw(player, self.amount) {
            warn!(player = %player, amount = self.amount, "withdraw failed after a passing check");
        }
    }
}
