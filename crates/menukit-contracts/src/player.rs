//! Player and session identity types.
//!
//! A `PlayerId` is stable for the lifetime of a player account; a `SessionId`
//! is minted every time a player successfully opens a menu and dies with that
//! display. State that must survive re-opens is keyed by `PlayerId`, state
//! scoped to one open display is keyed by `SessionId`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub uuid::Uuid);

impl PlayerId {
    /// Create a new, random player ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for one live display of one menu for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The identity pair a button sees when it renders.
///
/// Buttons that keep per-viewer state pick whichever half of the pair matches
/// the lifetime they need; nothing is ever keyed by ambient context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewer {
    pub player: PlayerId,
    pub session: SessionId,
}

impl Viewer {
    pub fn new(player: PlayerId, session: SessionId) -> Self {
        Self { player, session }
    }
}
