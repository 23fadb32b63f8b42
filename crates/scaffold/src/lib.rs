//! Scaffolding of L2 dapp projects
//!
//! Renders the embedded project templates for a target network, keeps the user defaults in a
//! TOML settings file and checks the local development environment.

pub mod doctor;
mod error;
mod settings;
mod template;

pub use error::ScaffoldError;
pub use settings::{Defaults, Settings, SETTINGS_KEYS};
pub use template::{scaffold, ScaffoldOptions, ScaffoldReport, Template};
