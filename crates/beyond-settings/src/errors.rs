//! Settings error types.

use thiserror::Error;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A settings value was invalid (e.g., not a WebSocket URL).
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let io = SettingsError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(io.to_string(), "failed to read settings file: denied");

        let invalid = SettingsError::InvalidValue("server.wsEndpoint must be ws:// or wss://".into());
        assert!(invalid.to_string().starts_with("invalid settings value: server.wsEndpoint"));
    }

    #[test]
    fn from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        assert!(matches!(SettingsError::from(json_err), SettingsError::Json(_)));
        let io_err = std::io::Error::other("boom");
        assert!(matches!(SettingsError::from(io_err), SettingsError::Io(_)));
    }
}
