//! Navigation and configuration shared by every screen

mod config;
mod router;

pub use config::{AppConfig, ConfigError};
pub use router::{Route, Router};

/// Screen transition requested by a flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Return to the previous screen
    Back,
    /// Replace the current screen without keeping it in history
    Replace(Route),
    /// Open a screen on top of the current one
    Push(Route),
}
