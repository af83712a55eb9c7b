//! # beyond-launcher
//!
//! Headless launcher session: loads settings, opens the realtime session for
//! a token and keeps it alive until Ctrl-C.

#![deny(unsafe_code)]

mod hooks;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use beyond_core::constants::VERSION;
use beyond_core::logging::init_subscriber;
use beyond_runtime::{LauncherRuntime, SessionInputs};
use beyond_settings::{LauncherSettings, load_settings, load_settings_from_path, settings_path};
use clap::Parser;
use tracing::{info, warn};

use crate::hooks::LoggingHooks;

/// Beyond launcher realtime session.
#[derive(Parser, Debug)]
#[command(name = "beyond-launcher", about = "Beyond launcher realtime session", version)]
struct Cli {
    /// WebSocket endpoint (overrides settings).
    #[arg(long)]
    endpoint: Option<String>,

    /// Session token.
    #[arg(long, env = "BEYOND_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Screen the launcher is on; `/login` and `/updater` keep the socket down.
    #[arg(long, default_value = "/home")]
    route: String,

    /// Protocol version stamped on outgoing frames.
    #[arg(long, default_value = VERSION)]
    app_version: String,

    /// Log filter (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Path to the settings file.
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl Cli {
    fn session_inputs(&self) -> SessionInputs {
        SessionInputs {
            token: self.token.clone(),
            is_authenticated: self.token.as_deref().is_some_and(|t| !t.is_empty()),
            route: self.route.clone(),
        }
    }

    fn apply_overrides(&self, settings: &mut LauncherSettings) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            settings.server.ws_endpoint.clone_from(endpoint);
            settings.validate().context("Invalid --endpoint")?;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut settings = match &args.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_settings()
            .with_context(|| format!("Failed to load settings from {}", settings_path().display()))?,
    };
    args.apply_overrides(&mut settings)?;

    init_subscriber(&settings.logging.level);
    info!(
        version = VERSION,
        environment = ?settings.environment,
        endpoint = %settings.server.ws_endpoint,
        "beyond-launcher starting"
    );

    let inputs = args.session_inputs();
    if inputs.session_token().is_none() {
        warn!(route = %inputs.route, "no session token or socket-disabled route; staying offline");
    }

    let runtime = LauncherRuntime::new(settings, args.app_version.clone(), Arc::new(LoggingHooks));
    runtime.sync(&inputs).context("Failed to start realtime session")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    info!("Shutting down...");
    runtime.teardown();
    info!(status = ?runtime.status(), "Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["beyond-launcher"]);
        assert_eq!(cli.route, "/home");
        assert_eq!(cli.app_version, VERSION);
        assert!(cli.endpoint.is_none());
        assert!(cli.settings.is_none());
    }

    #[test]
    fn token_flag_authenticates() {
        let cli = Cli::parse_from(["beyond-launcher", "--token", "abc"]);
        let inputs = cli.session_inputs();
        assert!(inputs.is_authenticated);
        assert_eq!(inputs.session_token(), Some("abc"));
    }

    #[test]
    fn login_route_stays_offline() {
        let cli = Cli::parse_from(["beyond-launcher", "--token", "abc", "--route", "/login"]);
        assert_eq!(cli.session_inputs().session_token(), None);
    }

    #[test]
    fn endpoint_override_is_validated() {
        let cli = Cli::parse_from(["beyond-launcher", "--endpoint", "http://nope"]);
        let mut settings = LauncherSettings::default();
        assert_matches!(cli.apply_overrides(&mut settings), Err(_));

        let cli = Cli::parse_from([
            "beyond-launcher",
            "--endpoint",
            "wss://play.example.com/ws",
            "--log-level",
            "debug",
        ]);
        let mut settings = LauncherSettings::default();
        cli.apply_overrides(&mut settings).unwrap();
        assert_eq!(settings.server.ws_endpoint, "wss://play.example.com/ws");
        assert_eq!(settings.logging.level, "debug");
    }
}
