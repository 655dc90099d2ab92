//! Runtime error types for the menukit session engine.
//!
//! Access denials are not errors: they are reported through `OpenOutcome`
//! and `CloseDecision`. `MenuError` covers the failures a caller has to act
//! on, such as a document that cannot be parsed or a display backend that
//! refuses to create a display.

use thiserror::Error;

/// The unified error type for the menukit crates.
#[derive(Debug, Error)]
pub enum MenuError {
    /// A configuration document or value could not be used.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A builder was asked for a type name nothing is registered under.
    #[error("unknown {kind} type '{name}'")]
    UnknownComponent { kind: &'static str, name: String },

    /// An action in a pipeline failed while running.
    #[error("action '{action}' failed: {reason}")]
    ActionFailed { action: String, reason: String },

    /// The display backend could not create, initialise or update a display.
    #[error("display backend failure: {reason}")]
    DisplayFailed { reason: String },

    /// No async runtime was available to run refresh tasks or pipelines.
    #[error("async runtime unavailable: {reason}")]
    RuntimeUnavailable { reason: String },
}

/// Convenience alias used throughout the menukit crates.
pub type MenuResult<T> = Result<T, MenuError>;
