//! Keeps the realtime session in step with application state.

use std::sync::Arc;
use std::time::Duration;

use beyond_settings::LauncherSettings;
use beyond_socket::{SessionClient, SocketConfig};
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use crate::errors::RuntimeError;
use crate::gating::SessionInputs;
use crate::hooks::AppHooks;
use crate::profile_sync::ProfileSync;
use crate::session::Session;
use crate::status::ConnectionStatus;

/// Owns at most one [`SessionClient`] and rebuilds it when inputs change.
pub struct LauncherRuntime {
    settings: LauncherSettings,
    version: String,
    hooks: Arc<dyn AppHooks>,
    status: Arc<Mutex<ConnectionStatus>>,
    session: Mutex<Option<Arc<Session>>>,
}

impl std::fmt::Debug for LauncherRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherRuntime")
            .field("version", &self.version)
            .field("active", &self.session.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl LauncherRuntime {
    /// Create an idle runtime.
    pub fn new(settings: LauncherSettings, version: impl Into<String>, hooks: Arc<dyn AppHooks>) -> Self {
        Self {
            settings,
            version: version.into(),
            hooks,
            status: Arc::default(),
            session: Mutex::new(None),
        }
    }

    /// The socket configuration for `token` under the current settings.
    pub fn socket_config(&self, token: &str) -> Result<SocketConfig, RuntimeError> {
        let socket = &self.settings.socket;
        let config = SocketConfig::for_endpoint(&self.settings.server.ws_endpoint, token, &self.version)?
            .with_reconnect(socket.reconnect_policy())
            .with_heartbeat_interval(socket.heartbeat_interval())
            .with_connect_timeout(socket.connect_timeout());
        Ok(config)
    }

    /// Reconcile the session with `inputs`.
    ///
    /// Tears the session down when it should not exist. Otherwise keeps the
    /// live session if its configuration is unchanged, or replaces it and
    /// starts connecting in the background. Must be called inside a Tokio
    /// runtime.
    #[instrument(skip_all, fields(route = %inputs.route, authenticated = inputs.is_authenticated))]
    pub fn sync(&self, inputs: &SessionInputs) -> Result<(), RuntimeError> {
        let Some(token) = inputs.session_token() else {
            self.teardown();
            return Ok(());
        };
        let config = self.socket_config(token)?;

        let mut slot = self.session.lock();
        if slot.as_ref().is_some_and(|s| *s.client.config() == config) {
            debug!("session configuration unchanged");
            return Ok(());
        }
        if let Some(old) = slot.take() {
            old.teardown();
        }

        info!(url = %config.redacted_url(), "starting realtime session");
        let client = SessionClient::new(config);
        let sync = ProfileSync::new(
            client.clone(),
            Duration::from_millis(self.settings.profile_sync.interval_ms),
        );
        let session = Session::new(
            client,
            Arc::clone(&self.hooks),
            Arc::clone(&self.status),
            sync,
            self.settings.is_dev(),
        );
        session.start();
        *slot = Some(session);
        Ok(())
    }

    /// Disconnect, stop profile sync and drop handlers. Idempotent.
    pub fn teardown(&self) {
        let session = self.session.lock().take();
        if let Some(session) = session {
            info!("stopping realtime session");
            session.teardown();
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status.lock().clone()
    }

    /// The live client, if a session exists.
    pub fn client(&self) -> Option<SessionClient> {
        self.session.lock().as_ref().map(|s| s.client.clone())
    }
}

impl Drop for LauncherRuntime {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::Recorder;

    fn runtime() -> LauncherRuntime {
        let mut settings = LauncherSettings::default();
        settings.server.ws_endpoint = "ws://127.0.0.1:1/ws".into();
        settings.socket.max_reconnect_attempts = 0;
        LauncherRuntime::new(settings, "1.0", Arc::new(Recorder::default()))
    }

    fn inputs(route: &str) -> SessionInputs {
        SessionInputs {
            token: Some("abc".into()),
            is_authenticated: true,
            route: route.into(),
        }
    }

    #[test]
    fn socket_config_uses_settings() {
        let runtime = runtime();
        let config = runtime.socket_config("abc").unwrap();
        assert_eq!(config.url.as_str(), "ws://127.0.0.1:1/ws?token=abc");
        assert_eq!(config.version, "1.0");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.reconnect.max_attempts, 0);
        assert_eq!(config.reconnect.base_delay_ms, 2000);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
    }

    #[test]
    fn bad_endpoint_is_an_error() {
        let mut settings = LauncherSettings::default();
        settings.server.ws_endpoint = "http://example.com".into();
        let runtime = LauncherRuntime::new(settings, "1.0", Arc::new(Recorder::default()));
        assert!(matches!(runtime.sync(&inputs("/home")), Err(RuntimeError::Config(_))));
        assert!(runtime.client().is_none());
    }

    #[tokio::test]
    async fn unchanged_inputs_keep_the_session() {
        let runtime = runtime();
        runtime.sync(&inputs("/home")).unwrap();
        let first = runtime.client().unwrap();
        runtime.sync(&inputs("/profile")).unwrap();
        let second = runtime.client().unwrap();
        assert!(first.manager().ptr_eq(second.manager()));
    }

    #[tokio::test]
    async fn token_change_replaces_the_session() {
        let runtime = runtime();
        runtime.sync(&inputs("/home")).unwrap();
        let first = runtime.client().unwrap();
        let mut next = inputs("/home");
        next.token = Some("def".into());
        runtime.sync(&next).unwrap();
        let second = runtime.client().unwrap();
        assert!(!first.manager().ptr_eq(second.manager()));
        assert_eq!(first.manager().dispatcher().listener_count(beyond_core::EventKind::User), 0);
    }

    #[tokio::test]
    async fn disabled_route_tears_down() {
        let runtime = runtime();
        runtime.sync(&inputs("/home")).unwrap();
        assert!(runtime.client().is_some());
        runtime.sync(&inputs("/updater")).unwrap();
        assert!(runtime.client().is_none());
        assert!(!runtime.status().is_connected);
        runtime.teardown();
    }

    #[tokio::test]
    async fn logged_out_inputs_never_connect() {
        let runtime = runtime();
        runtime.sync(&SessionInputs::default()).unwrap();
        assert!(runtime.client().is_none());
        assert_eq!(runtime.status(), ConnectionStatus::default());
    }
}
