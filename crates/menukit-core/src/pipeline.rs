//! Ordered, asynchronous action execution.
//!
//! An `ActionPipeline` is an immutable list of actions built once from
//! configuration. Each call to `run` spawns a fresh chain on the host runtime:
//!
//!   action[0].run() → await → action[1].run() → await → … → done
//!
//! Chains never share state, so concurrent runs for different players (or the
//! same player) cannot reorder each other. A failing action is logged; the
//! chain continues unless that action opts out via `continue_on_error`.

use std::{fmt, sync::Arc};

use menukit_contracts::player::PlayerId;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

use crate::traits::Action;

#[derive(Clone, Default)]
pub struct ActionPipeline {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionPipeline {
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Self {
        Self { actions }
    }

    pub fn push(&mut self, action: Arc<dyn Action>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Start a new chain for `player` on `runtime` and return immediately.
    ///
    /// The returned handle may be dropped; the chain keeps running.
    pub fn run(&self, runtime: &Handle, player: PlayerId) -> JoinHandle<usize> {
        let chain = self.clone();
        runtime.spawn(async move { chain.execute(player).await })
    }

    /// Run every action in order for `player`, awaiting each one.
    ///
    /// Returns how many actions completed successfully.
    pub async fn execute(&self, player: PlayerId) -> usize {
        let mut completed = 0;
        for (index, action) in self.actions.iter().enumerate() {
            debug!(player = %player, step = index, action = action.name(), "running action");
            match action.run(player).await {
                Ok(()) => completed += 1,
                Err(e) => {
                    warn!(
                        player = %player,
                        step = index,
                        action = action.name(),
                        error = %e,
                        "action failed"
                    );
                    if !action.continue_on_error() {
                        debug!(player = %player, step = index, "pipeline stopped after failure");
                        break;
                    }
                }
            }
        }
        completed
    }
}

impl fmt::Debug for ActionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.actions.iter().map(|a| a.name()))
            .finish()
    }
}
