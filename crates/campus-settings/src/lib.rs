//! # campus-settings
//!
//! Configuration for the campus records service, loaded from three layers
//! (in priority order):
//! 1. **Compiled defaults** — [`CampusSettings::default()`]
//! 2. **Settings file** — `~/.campus/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `CAMPUS_*` overrides (highest priority)
//!
//! Command-line flags of the `campusd` binary are applied on top of the
//! loaded value by the caller.
//!
//! # Usage
//!
//! ```no_run
//! let settings = campus_settings::load_settings().unwrap_or_default();
//! println!("listening on port {}", settings.server.port);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
