//! The `list` button: an ordered set of child buttons with a cursor.
//!
//! The button renders whichever child the viewer's cursor points at. With
//! `keep-current-index` the cursor is keyed by player and survives
//! re-opening the menu; otherwise it is keyed by session and dropped when
//! that session closes.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use menukit_contracts::{
    config::{ConfigValue, Section},
    display::RenderedIcon,
    error::{MenuError, MenuResult},
    player::{PlayerId, SessionId, Viewer},
};
use menukit_core::{host::HostServices, traits::Button};

use crate::builder::ButtonBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CursorKey {
    Player(PlayerId),
    Session(SessionId),
}

pub struct ListButton {
    children: Vec<Arc<dyn Button>>,
    keep_current_index: bool,
    cursors: Mutex<HashMap<CursorKey, usize>>,
}

impl ListButton {
    pub fn new(children: Vec<Arc<dyn Button>>, keep_current_index: bool) -> Self {
        Self {
            children,
            keep_current_index,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    /// Build from a section with a `child` sub-section whose entries are
    /// themselves button sections, in display order.
    pub fn build(
        section: &Section,
        builder: &ButtonBuilder,
        services: &HostServices,
    ) -> MenuResult<Arc<dyn Button>> {
        let child = section.section("child").ok_or_else(|| MenuError::ConfigError {
            reason: "list button needs a 'child' section".to_string(),
        })?;
        let keep_current_index = section
            .get("keep-current-index")
            .and_then(ConfigValue::as_bool)
            .unwrap_or(false);
        let children = builder.build_children(child, services);
        Ok(Arc::new(ListButton::new(children, keep_current_index)))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn keep_current_index(&self) -> bool {
        self.keep_current_index
    }

    fn key(&self, viewer: &Viewer) -> CursorKey {
        if self.keep_current_index {
            CursorKey::Player(viewer.player)
        } else {
            CursorKey::Session(viewer.session)
        }
    }

    /// The viewer's cursor. Defaults to 0.
    pub fn current_index(&self, viewer: &Viewer) -> usize {
        self.cursors
            .lock()
            .get(&self.key(viewer))
            .copied()
            .unwrap_or(0)
    }
}

impl Button for ListButton {
    fn render(&self, viewer: &Viewer) -> Option<RenderedIcon> {
        self.children.get(self.current_index(viewer))?.render(viewer)
    }

    fn refresh(&self, player: &PlayerId) {
        for child in &self.children {
            child.refresh(player);
        }
    }

    fn advance(&self, viewer: &Viewer, delta: i64) -> bool {
        if self.children.is_empty() {
            return false;
        }
        let last = self.children.len() as i64 - 1;
        let key = self.key(viewer);
        let mut cursors = self.cursors.lock();
        let current = cursors.get(&key).copied().unwrap_or(0);
        let next = (current as i64).saturating_add(delta).clamp(0, last) as usize;
        if next == current {
            return false;
        }
        cursors.insert(key, next);
        debug!(player = %viewer.player, from = current, to = next, "list cursor moved");
        true
    }

    fn close(&self, viewer: &Viewer) {
        if !self.keep_current_index {
            self.cursors.lock().remove(&CursorKey::Session(viewer.session));
        }
        for child in &self.children {
            child.close(viewer);
        }
    }
}
