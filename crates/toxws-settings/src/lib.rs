//! # toxws-settings
//!
//! Configuration for the toxws client, loaded from three layers (in priority
//! order):
//! 1. **Compiled defaults** — [`ToxwsSettings::default()`]
//! 2. **User file** — `~/.toxws/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `TOXWS_*` overrides (highest priority)
//!
//! The binary applies its command-line flags on top of the result. Settings
//! are loaded once at startup and passed down explicitly.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings_from_path, settings_path};
pub use types::*;
