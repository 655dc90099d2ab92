//! Ordered requirement sets.
//!
//! A `RequirementSet` is loaded from a section mapping requirement ids to
//! requirement entries. Evaluation is fail-fast:
//!
//! 1. Check entries in declaration order.
//! 2. The first entry whose `check` is false fails the whole set; later
//!    entries are never evaluated, and only that entry's fail actions run.
//! 3. If every entry passes, the caller receives a `CheckedRequirement`
//!    grant. Taking the grant consumes each entry's cost exactly once, then
//!    the success actions run.
//!
//! `check` never consumes anything. Cost is only ever consumed through a
//! grant, and a grant can only be taken once.

use std::{fmt, sync::Arc};

use tokio::runtime::Handle;
use tracing::{debug, warn};

use menukit_contracts::{
    config::{ConfigValue, Section},
    player::PlayerId,
};
use menukit_core::{
    action::ActionBuilder, host::HostServices, pipeline::ActionPipeline, traits::Requirement,
};

use crate::builder::RequirementBuilder;

/// One requirement plus the actions that report its outcome.
pub struct BoundRequirement {
    id: String,
    requirement: Box<dyn Requirement>,
    success_actions: ActionPipeline,
    fail_actions: ActionPipeline,
    runtime: Handle,
}

impl BoundRequirement {
    pub fn new(
        id: impl Into<String>,
        requirement: Box<dyn Requirement>,
        success_actions: ActionPipeline,
        fail_actions: ActionPipeline,
        runtime: Handle,
    ) -> Self {
        Self {
            id: id.into(),
            requirement,
            success_actions,
            fail_actions,
            runtime,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &'static str {
        self.requirement.kind()
    }

    pub fn check(&self, player: &PlayerId) -> bool {
        self.requirement.check(player)
    }

    pub fn take(&self, player: &PlayerId) {
        self.requirement.take(player);
    }

    pub fn send_success_actions(&self, player: &PlayerId) {
        if !self.success_actions.is_empty() {
            self.success_actions.run(&self.runtime, *player);
        }
    }

    pub fn send_fail_actions(&self, player: &PlayerId) {
        if !self.fail_actions.is_empty() {
            self.fail_actions.run(&self.runtime, *player);
        }
    }
}

impl fmt::Debug for BoundRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRequirement")
            .field("id", &self.id)
            .field("kind", &self.requirement.kind())
            .field("success_actions", &self.success_actions)
            .field("fail_actions", &self.fail_actions)
            .finish()
    }
}

/// The grant produced by a passing evaluation.
///
/// Holds the entries that authorised passage for one player. `take` is
/// guarded so a grant can never consume cost twice.
#[derive(Debug)]
pub struct CheckedRequirement {
    player: PlayerId,
    entries: Vec<Arc<BoundRequirement>>,
    taken: bool,
}

impl CheckedRequirement {
    /// Ids of the requirements this grant covers, in declaration order.
    pub fn requirement_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }

    /// Consume the cost of every covered requirement. A second call is a no-op.
    pub fn take(&mut self) {
        if self.taken {
            debug!(player = %self.player, "requirement grant already taken");
            return;
        }
        self.taken = true;
        for entry in &self.entries {
            entry.take(&self.player);
        }
    }

    pub fn send_success_actions(&self) {
        for entry in &self.entries {
            entry.send_success_actions(&self.player);
        }
    }
}

/// The result of evaluating a set once.
#[derive(Debug)]
pub enum RequirementOutcome {
    Passed(CheckedRequirement),
    /// The first entry that failed, in declaration order.
    Failed(Arc<BoundRequirement>),
}

impl RequirementOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, RequirementOutcome::Passed(_))
    }
}

/// A named, ordered collection of requirements.
pub struct RequirementSet {
    name: String,
    entries: Vec<Arc<BoundRequirement>>,
    requirements: Arc<RequirementBuilder>,
    actions: Arc<ActionBuilder>,
    services: HostServices,
}

impl RequirementSet {
    /// An empty set using the built-in requirement and action types.
    pub fn new(name: impl Into<String>, services: HostServices) -> Self {
        Self::with_builders(
            name,
            services,
            Arc::new(RequirementBuilder::new()),
            Arc::new(ActionBuilder::new()),
        )
    }

    pub fn with_builders(
        name: impl Into<String>,
        services: HostServices,
        requirements: Arc<RequirementBuilder>,
        actions: Arc<ActionBuilder>,
    ) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            requirements,
            actions,
            services,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an already built entry.
    pub fn push(&mut self, entry: BoundRequirement) {
        self.entries.push(Arc::new(entry));
    }

    /// Rebuild every entry from `section`, replacing the previous ones.
    ///
    /// Each key is a requirement id. Its value is either a section
    ///
    /// ```toml
    /// [view-requirement.vip]
    /// type = "permission"          # defaults to the id
    /// value = "shop.vip"
    /// success-action = ["tell: &aWelcome"]
    /// fail-action = ["tell: &cVIP only"]
    /// ```
    ///
    /// or a bare value, in which case the id doubles as the type
    /// (`permission = "shop.vip"`). Entries that fail to build are logged
    /// and skipped.
    pub fn load_from_section(&mut self, section: &Section) {
        self.entries.clear();
        for (id, value) in section.iter() {
            if let Some(entry) = self.build_entry(id, value) {
                self.entries.push(Arc::new(entry));
            }
        }
        debug!(set = %self.name, entries = self.entries.len(), "requirement set loaded");
    }

    fn build_entry(&self, id: &str, value: &ConfigValue) -> Option<BoundRequirement> {
        let (kind, raw, success, fail) = match value.as_section() {
            Some(sub) => {
                let kind = sub
                    .get("type")
                    .and_then(ConfigValue::to_text)
                    .unwrap_or_else(|| id.to_string());
                let Some(raw) = sub.get("value") else {
                    warn!(set = %self.name, requirement = %id, "requirement has no value; ignored");
                    return None;
                };
                let success = sub.get("success-action").or_else(|| sub.get("success-command"));
                let fail = sub.get("fail-action").or_else(|| sub.get("fail-command"));
                (kind, raw, success, fail)
            }
            None => (id.to_string(), value, None, None),
        };

        let requirement = match self.requirements.build(&kind, raw, &self.services) {
            Ok(requirement) => requirement,
            Err(e) => {
                warn!(set = %self.name, requirement = %id, error = %e, "invalid requirement; ignored");
                return None;
            }
        };
        let success_actions = success
            .map(|v| self.actions.build(v, &self.services))
            .unwrap_or_default();
        let fail_actions = fail
            .map(|v| self.actions.build(v, &self.services))
            .unwrap_or_default();

        Some(BoundRequirement::new(
            id,
            requirement,
            success_actions,
            fail_actions,
            self.services.runtime.clone(),
        ))
    }

    /// Evaluate the set once for `player`, stopping at the first failure.
    pub fn evaluate(&self, player: &PlayerId) -> RequirementOutcome {
        for entry in &self.entries {
            if !entry.check(player) {
                debug!(set = %self.name, requirement = entry.id(), player = %player, "requirement failed");
                return RequirementOutcome::Failed(entry.clone());
            }
        }
        RequirementOutcome::Passed(CheckedRequirement {
            player: *player,
            entries: self.entries.clone(),
            taken: false,
        })
    }

    /// True iff every requirement passes. Pure.
    pub fn check(&self, player: &PlayerId) -> bool {
        self.evaluate(player).is_passed()
    }

    /// The grant to finalise after a passing check, or `None` when the set
    /// is empty or does not pass.
    pub fn checked_requirement(&self, player: &PlayerId) -> Option<CheckedRequirement> {
        match self.evaluate(player) {
            RequirementOutcome::Passed(grant) if !grant.is_empty() => Some(grant),
            _ => None,
        }
    }

    /// Run the fail actions of the first failing requirement, if any.
    pub fn send_fail_actions(&self, player: &PlayerId) {
        if let RequirementOutcome::Failed(entry) = self.evaluate(player) {
            entry.send_fail_actions(player);
        }
    }
}

impl fmt::Debug for RequirementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementSet")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .finish()
    }
}
