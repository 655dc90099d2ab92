//! # menukit-menu
//!
//! Menu definitions and the session controller that drives them.
//!
//! - [`MenuDefinition`] is built from a configuration document and swapped
//!   in whole on reload.
//! - [`SimpleMenu`] tracks each player's session: requirement-gated open
//!   and close, the open and close action pipelines, the periodic refresh
//!   task, and forced closes that skip the close requirements.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use menukit_menu::SimpleMenu;
//!
//! let menu = Arc::new(SimpleMenu::new("shop", backend, services));
//! menu.load_toml(&std::fs::read_to_string("menus/shop.toml")?)?;
//! menu.register_handlers(&bus);
//! menu.attempt_open(player, false)?;
//! ```

pub mod definition;
pub mod menu;
pub mod refresh;

pub use definition::{Builders, MenuDefinition, MenuLayout};
pub use menu::SimpleMenu;
pub use refresh::RefreshTask;

#[cfg(test)]
pub(crate) mod testing;
