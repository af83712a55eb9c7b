//! Decide whether a realtime session should exist.

/// Route prefixes on which the socket stays down.
pub const DISABLED_ROUTES: [&str; 2] = ["/updater", "/login"];

/// Whether `route` is a screen without a realtime session.
pub fn is_socket_disabled_route(route: &str) -> bool {
    DISABLED_ROUTES.iter().any(|prefix| route.starts_with(prefix))
}

/// Application state the session depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionInputs {
    /// Session token, if logged in.
    pub token: Option<String>,
    /// Whether the auth store considers the user logged in.
    pub is_authenticated: bool,
    /// Current screen path.
    pub route: String,
}

impl SessionInputs {
    /// The token to connect with, or `None` when no session should run.
    pub fn session_token(&self) -> Option<&str> {
        if !self.is_authenticated || is_socket_disabled_route(&self.route) {
            return None;
        }
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(token: Option<&str>, is_authenticated: bool, route: &str) -> SessionInputs {
        SessionInputs {
            token: token.map(str::to_string),
            is_authenticated,
            route: route.to_string(),
        }
    }

    #[test]
    fn disabled_routes_match_by_prefix() {
        assert!(is_socket_disabled_route("/updater"));
        assert!(is_socket_disabled_route("/updater/progress"));
        assert!(is_socket_disabled_route("/login"));
        assert!(!is_socket_disabled_route("/home"));
        assert!(!is_socket_disabled_route("/"));
    }

    #[test]
    fn session_token_requires_everything() {
        assert_eq!(inputs(Some("t"), true, "/home").session_token(), Some("t"));
        assert_eq!(inputs(Some("t"), false, "/home").session_token(), None);
        assert_eq!(inputs(None, true, "/home").session_token(), None);
        assert_eq!(inputs(Some(""), true, "/home").session_token(), None);
        assert_eq!(inputs(Some("t"), true, "/login").session_token(), None);
    }
}
