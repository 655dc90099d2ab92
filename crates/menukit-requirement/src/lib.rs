//! # menukit-requirement
//!
//! Requirement sets gate opening and closing a menu. A set is an ordered
//! list of requirements, each with its own success and fail actions, checked
//! fail-fast. A passing evaluation yields a single-use grant that consumes
//! cost exactly once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use menukit_requirement::{RequirementOutcome, RequirementSet};
//!
//! let mut view = RequirementSet::new("view-requirement", services.clone());
//! view.load_from_section(&section);
//! match view.evaluate(&player) {
//!     RequirementOutcome::Passed(mut grant) => {
//!         grant.take();
//!         grant.send_success_actions();
//!     }
//!     RequirementOutcome::Failed(entry) => entry.send_fail_actions(&player),
//! }
//! ```

pub mod builder;
pub mod kinds;
pub mod set;

pub use builder::{RequirementBuilder, RequirementFactory};
pub use kinds::{ConditionRequirement, CooldownRequirement, CostRequirement, PermissionRequirement};
pub use set::{BoundRequirement, CheckedRequirement, RequirementOutcome, RequirementSet};

#[cfg(test)]
pub(crate) mod testing;
