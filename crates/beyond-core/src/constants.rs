//! Package-level and protocol constants.

/// Current version of the launcher core (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "beyond";

/// Close code for a normal, caller-requested close.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close code reported when the socket went away without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Close code the server uses to reject the connection's credentials.
pub const CLOSE_AUTH_REJECTED: u16 = 1008;

/// Reason attached to the local `disconnected` event on `disconnect()`.
pub const INTENTIONAL_DISCONNECT_REASON: &str = "Intentional disconnect";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn name_is_lowercase() {
        assert_eq!(NAME, NAME.to_lowercase());
    }

    #[test]
    fn close_codes_match_rfc6455() {
        assert_eq!(CLOSE_NORMAL, 1000);
        assert_eq!(CLOSE_ABNORMAL, 1006);
        assert_eq!(CLOSE_AUTH_REJECTED, 1008);
    }
}
