//! # beyond-settings
//!
//! Layered configuration for the Beyond launcher.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`LauncherSettings::default()`]
//! 2. **User file**: `~/.beyond/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `BEYOND_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_under_beyond_dir() {
        let path = settings_path();
        assert!(path.ends_with(".beyond/settings.json"));
    }
}
