//! The per-menu session controller.
//!
//! A `SimpleMenu` owns one menu's definition and every player's session with
//! it. Opening runs the gates in a fixed order:
//!
//!   refresh buttons → permission → view requirements → display → refresh task → open actions
//!
//! Closing is either forced (the controller itself asked the host to close
//! the display, so nothing is checked) or requested by the player, in which
//! case the close requirements may veto it.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Weak},
};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use menukit_contracts::{
    config::Section,
    error::MenuResult,
    lifecycle::{CloseDecision, OpenOutcome, SessionState},
    player::{PlayerId, SessionId, Viewer},
};
use menukit_core::{
    events::{EventBus, EventResponse, HostEvent},
    host::HostServices,
    traits::{DisplayBackend, DisplayHandle, FrameSource},
};
use menukit_requirement::RequirementOutcome;

use crate::{
    definition::{Builders, MenuDefinition, MenuLayout},
    refresh::RefreshTask,
};

/// One player's live display.
struct Session {
    viewer: Viewer,
    display: Arc<dyn DisplayHandle>,
    /// The layout the display was opened with; survives a reload.
    layout: Arc<MenuLayout>,
    refresh: Option<RefreshTask>,
}

pub struct SimpleMenu {
    name: String,
    definition: RwLock<Arc<MenuDefinition>>,
    backend: Arc<dyn DisplayBackend>,
    services: HostServices,
    builders: Builders,
    sessions: Mutex<HashMap<PlayerId, Session>>,
    pending: Mutex<HashSet<PlayerId>>,
    forced_close: Mutex<HashSet<PlayerId>>,
}

impl SimpleMenu {
    /// An empty menu using the built-in component types.
    pub fn new(name: impl Into<String>, backend: Arc<dyn DisplayBackend>, services: HostServices) -> Self {
        Self::with_builders(name, backend, services, Builders::default())
    }

    pub fn with_builders(
        name: impl Into<String>,
        backend: Arc<dyn DisplayBackend>,
        services: HostServices,
        builders: Builders,
    ) -> Self {
        let name = name.into();
        let definition = MenuDefinition::empty(&name, &services, &builders);
        Self {
            name,
            definition: RwLock::new(Arc::new(definition)),
            backend,
            services,
            builders,
            sessions: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashSet::new()),
            forced_close: Mutex::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current definition. Holders keep a consistent snapshot across a
    /// concurrent reload.
    pub fn definition(&self) -> Arc<MenuDefinition> {
        self.definition.read().clone()
    }

    pub fn layout(&self) -> Arc<MenuLayout> {
        self.definition().layout.clone()
    }

    // ── Loading ──────────────────────────────────────────────────────────────

    /// Replace the whole definition with one built from `document` and
    /// register its command aliases. Open sessions keep the layout they were
    /// opened with.
    pub fn load(&self, document: &Section) {
        let definition = MenuDefinition::from_section(&self.name, document, &self.services, &self.builders);
        for alias in &definition.commands {
            self.services.commands.register_menu_command(alias, &self.name);
        }
        *self.definition.write() = Arc::new(definition);
        info!(menu = %self.name, "menu loaded");
    }

    /// Parse `text` as TOML and `load` it.
    ///
    /// Returns `MenuError::ConfigError` if the text is not a TOML document;
    /// the current definition is kept.
    pub fn load_toml(&self, text: &str) -> MenuResult<()> {
        let document = Section::from_toml_str(text)?;
        self.load(&document);
        Ok(())
    }

    /// Rebuild only the requirement sets that are given; the layout,
    /// actions and settings stay as they are.
    pub fn reload_requirements(&self, view: Option<&Section>, close: Option<&Section>) {
        let mut definition = self.definition.write();
        let next = definition.with_requirements(view, close, &self.services, &self.builders);
        *definition = Arc::new(next);
        debug!(menu = %self.name, view = view.is_some(), close = close.is_some(), "requirements reloaded");
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn state(&self, player: &PlayerId) -> SessionState {
        if self.pending.lock().contains(player) {
            SessionState::OpenPending
        } else if self.sessions.lock().contains_key(player) {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn viewer(&self, player: &PlayerId) -> Option<Viewer> {
        self.sessions.lock().get(player).map(|s| s.viewer)
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn has_refresh_task(&self, player: &PlayerId) -> bool {
        self.sessions
            .lock()
            .get(player)
            .is_some_and(|s| s.refresh.is_some())
    }

    // ── Opening ──────────────────────────────────────────────────────────────

    /// Try to open the menu for `player`.
    ///
    /// With `bypass` the permission and view requirements are skipped.
    /// A refusal is an `Ok` outcome; by the time it is returned the player
    /// has been sent the no-permission message or the failing requirement's
    /// fail actions.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the display cannot be created or
    /// initialised. No session is left behind.
    pub fn attempt_open(&self, player: PlayerId, bypass: bool) -> MenuResult<OpenOutcome> {
        let definition = self.definition();

        // ── Step 1: Let buttons catch up with the player ─────────────────────
        definition.layout.refresh(&player);

        // ── Step 2: Permission ───────────────────────────────────────────────
        if !bypass && !self.services.permissions.has_permission(&player, &definition.permission) {
            warn!(menu = %self.name, player = %player, permission = %definition.permission, "open denied: no permission");
            self.services
                .send_message(&player, &self.services.settings.messages.no_permission);
            return Ok(OpenOutcome::NoPermission {
                permission: definition.permission.clone(),
            });
        }

        // ── Step 3: View requirements ────────────────────────────────────────
        if !bypass {
            match definition.view_requirement.evaluate(&player) {
                RequirementOutcome::Failed(entry) => {
                    debug!(menu = %self.name, player = %player, requirement = entry.id(), "open denied by requirement");
                    entry.send_fail_actions(&player);
                    return Ok(OpenOutcome::RequirementFailed);
                }
                RequirementOutcome::Passed(mut grant) => {
                    grant.take();
                    grant.send_success_actions();
                }
            }
        }

        // ── Step 4: Replace any previous session ─────────────────────────────
        self.forced_close.lock().remove(&player);
        self.teardown(&player);

        // ── Step 5: Create and show the display ──────────────────────────────
        let viewer = Viewer::new(player, SessionId::new());
        self.pending.lock().insert(player);
        let created = self.create_display(viewer, &definition.layout);
        self.pending.lock().remove(&player);
        let display = match created {
            Ok(display) => display,
            Err(e) => {
                warn!(menu = %self.name, player = %player, error = %e, "display failed to open");
                self.backend.remove_display(&player);
                definition.layout.close(&viewer);
                return Err(e);
            }
        };

        // ── Step 6: Periodic refresh ─────────────────────────────────────────
        let period = self.services.settings.ticks_to_duration(definition.ticks);
        let refresh = (definition.ticks > 0 && !period.is_zero()).then(|| {
            RefreshTask::spawn(&self.services.runtime, period, display.clone(), player)
        });

        let session = Session {
            viewer,
            display,
            layout: definition.layout.clone(),
            refresh,
        };
        if let Some(previous) = self.sessions.lock().insert(player, session) {
            // Dropping the previous session cancels its refresh task.
            debug!(menu = %self.name, player = %player, session = %previous.viewer.session, "replaced concurrent session");
        }

        // ── Step 7: Open actions ─────────────────────────────────────────────
        if !definition.open_actions.is_empty() {
            definition.open_actions.run(&self.services.runtime, player);
        }

        info!(menu = %self.name, player = %player, session = %viewer.session, "menu opened");
        Ok(OpenOutcome::Opened)
    }

    fn create_display(&self, viewer: Viewer, layout: &Arc<MenuLayout>) -> MenuResult<Arc<dyn DisplayHandle>> {
        let source: Arc<dyn FrameSource> = layout.clone();
        let display = self.backend.create_display(viewer, source)?;
        display.set_force_update(self.services.settings.forced_update_inventory);
        display.init()?;
        Ok(display)
    }

    /// Re-render the player's display now, if one is open.
    pub fn update(&self, player: &PlayerId) {
        let display = self.sessions.lock().get(player).map(|s| s.display.clone());
        if let Some(display) = display {
            display.update();
        }
    }

    /// Move the cursor of the button in `slot` for the player's session and
    /// update the display if it changed.
    pub fn advance_slot(&self, player: &PlayerId, slot: usize, delta: i64) -> bool {
        let Some((viewer, layout)) = self
            .sessions
            .lock()
            .get(player)
            .map(|s| (s.viewer, s.layout.clone()))
        else {
            return false;
        };
        let changed = layout
            .button(slot)
            .is_some_and(|button| button.advance(&viewer, delta));
        if changed {
            self.update(player);
        }
        changed
    }

    // ── Closing ──────────────────────────────────────────────────────────────

    /// Decide whether the player may close the display.
    ///
    /// A pending forced close is consumed and allowed without checking
    /// anything. Otherwise the close requirements decide: a failure sends
    /// the fail actions and vetoes; a pass takes the requirements, sends the
    /// success actions, tears the session down and runs the close actions.
    pub fn attempt_close(&self, player: PlayerId) -> CloseDecision {
        if self.forced_close.lock().remove(&player) {
            debug!(menu = %self.name, player = %player, "forced close allowed");
            self.teardown(&player);
            return CloseDecision::Allow;
        }
        if !self.sessions.lock().contains_key(&player) {
            debug!(menu = %self.name, player = %player, "close without a session; allowed");
            return CloseDecision::Allow;
        }

        let definition = self.definition();
        match definition.close_requirement.evaluate(&player) {
            RequirementOutcome::Failed(entry) => {
                debug!(menu = %self.name, player = %player, requirement = entry.id(), "close vetoed by requirement");
                entry.send_fail_actions(&player);
                return CloseDecision::Veto;
            }
            RequirementOutcome::Passed(mut grant) => {
                grant.take();
                grant.send_success_actions();
            }
        }

        self.teardown(&player);
        if !definition.close_actions.is_empty() {
            definition.close_actions.run(&self.services.runtime, player);
        }
        CloseDecision::Allow
    }

    /// Close the player's display regardless of close requirements.
    ///
    /// Does nothing if the player has no session. Otherwise the close event
    /// the host raises in response is allowed exactly once.
    pub fn force_close(&self, player: PlayerId) {
        if !self.sessions.lock().contains_key(&player) {
            debug!(menu = %self.name, player = %player, "force close without a session; ignored");
            return;
        }
        self.forced_close.lock().insert(player);
        self.backend.close_display(&player);
    }

    /// Drop the player's session without checking or running anything.
    pub fn release(&self, player: &PlayerId) {
        self.forced_close.lock().remove(player);
        self.teardown(player);
    }

    /// Close every display of this menu. No requirements are checked and no
    /// actions run.
    pub fn close_all(&self) {
        self.backend.stop();
        let sessions: Vec<Session> = {
            let mut sessions = self.sessions.lock();
            for session in sessions.values_mut() {
                if let Some(task) = session.refresh.take() {
                    task.cancel();
                }
            }
            sessions.drain().map(|(_, s)| s).collect()
        };
        for session in &sessions {
            session.layout.close(&session.viewer);
        }
        self.forced_close.lock().clear();
        info!(menu = %self.name, closed = sessions.len(), "all sessions closed");
    }

    /// Cancel the refresh task, then remove the session and its display.
    fn teardown(&self, player: &PlayerId) -> bool {
        let removed = {
            let mut sessions = self.sessions.lock();
            if let Some(task) = sessions.get_mut(player).and_then(|s| s.refresh.take()) {
                task.cancel();
            }
            sessions.remove(player)
        };
        let Some(session) = removed else {
            return false;
        };
        self.backend.remove_display(player);
        session.layout.close(&session.viewer);
        info!(menu = %self.name, player = %player, session = %session.viewer.session, "menu closed");
        true
    }

    // ── Host events ──────────────────────────────────────────────────────────

    fn close_handler_name(&self) -> String {
        format!("menu:{}:close", self.name)
    }

    fn quit_handler_name(&self) -> String {
        format!("menu:{}:quit", self.name)
    }

    /// Subscribe this menu to the host's display and player events.
    ///
    /// The handlers hold a weak reference, so subscribing does not keep the
    /// menu alive.
    pub fn register_handlers(self: &Arc<Self>, bus: &EventBus) {
        let menu: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(self.close_handler_name(), move |event| {
            let HostEvent::DisplayClosing { menu: name, player } = event else {
                return EventResponse::Continue;
            };
            match menu.upgrade() {
                Some(menu) if menu.name == *name => match menu.attempt_close(*player) {
                    CloseDecision::Allow => EventResponse::Continue,
                    CloseDecision::Veto => EventResponse::Veto,
                },
                _ => EventResponse::Continue,
            }
        });

        let menu: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(self.quit_handler_name(), move |event| {
            if let (HostEvent::PlayerQuit { player }, Some(menu)) = (event, menu.upgrade()) {
                menu.release(player);
            }
            EventResponse::Continue
        });
    }

    pub fn unregister_handlers(&self, bus: &EventBus) {
        bus.unsubscribe(&self.close_handler_name());
        bus.unsubscribe(&self.quit_handler_name());
    }
}
