//! `cooldown`: passes unless the player took this requirement less than
//! `value` seconds ago. Taking the requirement starts the cooldown.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use menukit_contracts::{
    config::ConfigValue,
    error::{MenuError, MenuResult},
    player::PlayerId,
};
use menukit_core::{host::HostServices, traits::Requirement};

pub struct CooldownRequirement {
    duration: TimeDelta,
    started: Mutex<HashMap<PlayerId, DateTime<Utc>>>,
}

impl CooldownRequirement {
    pub fn new(duration: TimeDelta) -> Self {
        Self {
            duration,
            started: Mutex::new(HashMap::new()),
        }
    }

    pub fn build(value: &ConfigValue, _services: &HostServices) -> MenuResult<Box<dyn Requirement>> {
        let seconds = value
            .as_number()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| MenuError::ConfigError {
                reason: format!("cooldown must be a non-negative number of seconds, got {:?}", value),
            })?;
        let duration = TimeDelta::try_milliseconds((seconds * 1000.0) as i64).ok_or_else(|| {
            MenuError::ConfigError {
                reason: format!("cooldown of {} seconds is out of range", seconds),
            }
        })?;
        Ok(Box::new(Self::new(duration)))
    }

    /// Time left before the player passes again, if any.
    pub fn remaining(&self, player: &PlayerId) -> Option<TimeDelta> {
        let started = *self.started.lock().get(player)?;
        let left = started + self.duration - Utc::now();
        (left > TimeDelta::zero()).then_some(left)
    }
}

impl Requirement for CooldownRequirement {
    fn kind(&self) -> &'static str {
        "cooldown"
    }

    fn check(&self, player: &PlayerId) -> bool {
        self.remaining(player).is_none()
    }

    fn take(&self, player: &PlayerId) {
        self.started.lock().insert(*player, Utc::now());
    }
}
