//! Render output handed to the display backend.
//!
//! The runtime never draws anything itself. Buttons produce `RenderedIcon`s,
//! the layout assembles them into a `Frame`, and the backend decides how a
//! frame reaches the player's screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single rendered slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedIcon {
    /// Item/material identifier, e.g. "PAPER".
    pub material: String,
    /// Display name after variable substitution and colorizing.
    pub display_name: Option<String>,
    /// Lore lines after variable substitution and colorizing.
    pub lore: Vec<String>,
    pub amount: u32,
}

impl RenderedIcon {
    /// An icon with just a material and amount 1.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            display_name: None,
            lore: Vec::new(),
            amount: 1,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Everything one player sees in one display at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub title: String,
    pub size: usize,
    /// Occupied slots only; empty slots are absent.
    pub slots: BTreeMap<usize, RenderedIcon>,
}
