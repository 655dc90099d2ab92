//! Built-in requirement kinds.

mod condition;
mod cooldown;
mod cost;
mod permission;

pub use condition::ConditionRequirement;
pub use cooldown::CooldownRequirement;
pub use cost::CostRequirement;
pub use permission::PermissionRequirement;
