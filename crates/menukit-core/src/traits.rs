//! Core trait definitions for the menukit session engine.
//!
//! The traits fall on two sides of one boundary:
//!
//! - Engine components built from configuration: `Requirement`, `Action`,
//!   `Button`. These are shared read-only by every session once built.
//! - Host collaborators the engine consumes but never implements itself:
//!   `DisplayBackend`/`DisplayHandle`, `VariableResolver`, `ExpressionEngine`,
//!   `Messenger`, `PermissionService`, `CommandRegistry`, `Economy`.
//!
//! Every trait is `Send + Sync` because refresh ticks and pipeline steps run
//! on worker tasks concurrently with the host event loop.

use std::sync::Arc;

use async_trait::async_trait;

use menukit_contracts::{
    display::{Frame, RenderedIcon},
    error::MenuResult,
    player::{PlayerId, Viewer},
};

// ── Engine components ────────────────────────────────────────────────────────

/// A single access check with an optional cost.
pub trait Requirement: Send + Sync {
    /// The registered type name, used in logs.
    fn kind(&self) -> &'static str;

    /// Evaluate the requirement for `player`.
    ///
    /// Must not have side effects beyond reporting to the player; the
    /// controller may call it any number of times.
    fn check(&self, player: &PlayerId) -> bool;

    /// Consume whatever the requirement costs.
    ///
    /// Not idempotent: callers take at most once per passing check.
    fn take(&self, player: &PlayerId);
}

/// One effectful step of an `ActionPipeline`.
#[async_trait]
pub trait Action: Send + Sync {
    /// Short description for logs, e.g. `"tell"`.
    fn name(&self) -> &str;

    /// Run the action for `player`. The pipeline waits for the returned
    /// future before starting the next action.
    async fn run(&self, player: PlayerId) -> MenuResult<()>;

    /// Whether the pipeline keeps going after this action fails.
    fn continue_on_error(&self) -> bool {
        true
    }
}

/// Something that occupies a slot.
pub trait Button: Send + Sync {
    /// Produce the icon for `viewer`, or `None` for an empty slot.
    fn render(&self, viewer: &Viewer) -> Option<RenderedIcon>;

    /// Bring any per-player cached state up to date. Called before every open
    /// attempt.
    fn refresh(&self, _player: &PlayerId) {}

    /// Move a cursor by `delta`. Returns true if anything changed.
    fn advance(&self, _viewer: &Viewer, _delta: i64) -> bool {
        false
    }

    /// The viewer's session ended; drop session-scoped state.
    fn close(&self, _viewer: &Viewer) {}
}

// ── Display backend ──────────────────────────────────────────────────────────

/// Produces the frame a display shows. Implemented by the menu layout and
/// handed to the backend when a display is created.
pub trait FrameSource: Send + Sync {
    fn render_frame(&self, viewer: &Viewer) -> Frame;
}

/// One live display on one player's screen.
pub trait DisplayHandle: Send + Sync {
    /// Show the display for the first time.
    fn init(&self) -> MenuResult<()>;

    /// Re-render the frame and push it to the screen.
    fn update(&self);

    /// Whether updates must resend every slot even if unchanged.
    fn set_force_update(&self, force: bool);
}

/// The host service that owns displays for one menu.
pub trait DisplayBackend: Send + Sync {
    /// Create (but do not init) a display for `viewer`, replacing any
    /// existing one for the same player.
    fn create_display(
        &self,
        viewer: Viewer,
        source: Arc<dyn FrameSource>,
    ) -> MenuResult<Arc<dyn DisplayHandle>>;

    fn get_display(&self, player: &PlayerId) -> Option<Arc<dyn DisplayHandle>>;

    /// Forget the player's display without asking the host to close it.
    fn remove_display(&self, player: &PlayerId);

    /// Ask the host to close the player's display now. The host raises its
    /// close event afterwards.
    fn close_display(&self, player: &PlayerId);

    /// Close every display this backend owns.
    fn stop(&self);
}

// ── Host services ────────────────────────────────────────────────────────────

/// Placeholder substitution, e.g. `{player}` → a player name.
pub trait VariableResolver: Send + Sync {
    fn substitute(&self, text: &str, player: &PlayerId) -> String;
}

/// Pure string → value evaluation.
pub trait ExpressionEngine: Send + Sync {
    /// Evaluate `expression`. Booleans evaluate to 1 or 0. Returns `None`
    /// when the text is not an expression.
    fn evaluate(&self, expression: &str) -> Option<f64>;
}

/// Delivers chat messages to players.
pub trait Messenger: Send + Sync {
    fn send(&self, player: &PlayerId, message: &str);
}

pub trait PermissionService: Send + Sync {
    fn has_permission(&self, player: &PlayerId, permission: &str) -> bool;
}

/// Binds command aliases to menus.
pub trait CommandRegistry: Send + Sync {
    fn register_menu_command(&self, alias: &str, menu: &str);
}

/// Player balances for cost requirements.
pub trait Economy: Send + Sync {
    fn balance(&self, player: &PlayerId) -> f64;

    /// Withdraw `amount`. Returns false if the balance was insufficient.
    fn withdraw(&self, player: &PlayerId, amount: f64) -> bool;
}
