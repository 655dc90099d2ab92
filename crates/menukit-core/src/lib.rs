//! # menukit-core
//!
//! The trait boundary and shared machinery of the menukit session engine.
//!
//! This crate provides:
//! - The component traits (`Requirement`, `Action`, `Button`) and the host
//!   collaborator traits (`DisplayBackend`, `ExpressionEngine`, …)
//! - `HostServices`, the bundle of collaborators handed to every builder
//! - `ActionPipeline` and `ActionBuilder`
//! - `BasicExpressionEngine` and the host `EventBus`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use menukit_core::{ActionBuilder, HostServices, traits::Action};
//!
//! let pipeline = ActionBuilder::new().build(&value, &services);
//! pipeline.run(&services.runtime, player);
//! ```

pub mod action;
pub mod events;
pub mod expression;
pub mod host;
pub mod pipeline;
pub mod traits;

pub use action::ActionBuilder;
pub use events::{EventBus, EventResponse, HostEvent};
pub use expression::BasicExpressionEngine;
pub use host::{colorize, HostServices, StaticVariables};
pub use pipeline::ActionPipeline;

#[cfg(test)]
pub(crate) mod testing;
