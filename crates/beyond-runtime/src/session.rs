//! One live realtime session and its event handlers.

use std::sync::{Arc, Weak};

use beyond_core::constants::{CLOSE_AUTH_REJECTED, CLOSE_NORMAL};
use beyond_core::{BeyondUser, CloseInfo, ErrorPayload, EventKind, SocketEvent};
use beyond_socket::{SessionClient, SocketError, Subscription};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::classify::classify;
use crate::hooks::AppHooks;
use crate::profile_sync::{ProfileSync, UserCache};
use crate::status::ConnectionStatus;

/// Availability error shown for a taken username.
pub const USERNAME_TAKEN_MESSAGE: &str = "Username is already taken";

/// Kinds the session subscribes to.
const HANDLED_KINDS: [EventKind; 9] = [
    EventKind::User,
    EventKind::Connected,
    EventKind::Authenticated,
    EventKind::Disconnected,
    EventKind::NewUsername,
    EventKind::UsernameAvailable,
    EventKind::UsernameTaken,
    EventKind::ProfileUpdate,
    EventKind::Error,
];

pub(crate) struct Session {
    pub(crate) client: SessionClient,
    hooks: Arc<dyn AppHooks>,
    status: Arc<Mutex<ConnectionStatus>>,
    sync: ProfileSync,
    users: UserCache,
    is_dev: bool,
    subscriptions: Mutex<Vec<Subscription>>,
    cancel: CancellationToken,
}

impl Session {
    pub(crate) fn new(
        client: SessionClient,
        hooks: Arc<dyn AppHooks>,
        status: Arc<Mutex<ConnectionStatus>>,
        sync: ProfileSync,
        is_dev: bool,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            client,
            hooks,
            status,
            sync,
            users: UserCache::default(),
            is_dev,
            subscriptions: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
        });
        session.register();
        session
    }

    fn register(self: &Arc<Self>) {
        let subscriptions: Vec<Subscription> = HANDLED_KINDS
            .iter()
            .map(|&kind| {
                let weak: Weak<Self> = Arc::downgrade(self);
                self.client.on(kind, move |event: &SocketEvent| {
                    if let Some(session) = weak.upgrade() {
                        session.handle(event);
                    }
                })
            })
            .collect();
        *self.subscriptions.lock() = subscriptions;
    }

    /// Connect in the background; a failure is reported through the error path.
    pub(crate) fn start(self: &Arc<Self>) {
        self.status.lock().connecting();
        let weak = Arc::downgrade(self);
        let client = self.client.clone();
        let cancel = self.cancel.clone();
        let _ = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                result = client.connect() => result,
            };
            let Some(session) = weak.upgrade() else {
                return;
            };
            match result {
                Ok(()) => {}
                Err(SocketError::Disconnected) => {
                    session.status.lock().disconnected();
                }
                Err(e) => {
                    session.sync.stop();
                    let message = e.to_string();
                    session.status.lock().failed(message.clone());
                    session.report_error(&ErrorPayload::critical(message));
                }
            }
        });
    }

    /// Stop polling, drop handlers, close the socket.
    pub(crate) fn teardown(&self) {
        self.cancel.cancel();
        self.sync.stop();
        for subscription in self.subscriptions.lock().drain(..) {
            subscription.unsubscribe();
        }
        self.client.shutdown();
        self.users.reset();
        self.status.lock().disconnected();
    }

    fn handle(&self, event: &SocketEvent) {
        match event {
            SocketEvent::User(user) => self.apply_user(user),
            SocketEvent::Connected => {
                info!("socket connected");
                self.status.lock().connected();
            }
            SocketEvent::Authenticated => self.sync.start(),
            SocketEvent::Disconnected(info) => self.on_disconnected(info),
            SocketEvent::NewUsername(payload) => {
                if !payload.username.is_empty() {
                    info!(username = %payload.username, "display name updated");
                    self.hooks.set_display_name(&payload.username);
                }
            }
            SocketEvent::UsernameAvailable(check) => {
                let error = if check.available {
                    ""
                } else {
                    USERNAME_TAKEN_MESSAGE
                };
                self.hooks.set_username_availability(check.available, error);
            }
            SocketEvent::UsernameTaken(_) => {
                self.hooks
                    .set_username_availability(false, USERNAME_TAKEN_MESSAGE);
            }
            SocketEvent::ProfileUpdate(update) => self.apply_user(&update.user),
            SocketEvent::Error(payload) => {
                self.status.lock().connection_error = Some(payload.message.clone());
                self.report_error(payload);
            }
            _ => {}
        }
    }

    fn on_disconnected(&self, info: &CloseInfo) {
        self.sync.stop();
        self.status.lock().disconnected();
        if info.code == CLOSE_AUTH_REJECTED && info.reason.contains("token") {
            self.report_error(&ErrorPayload::critical("Authentication failed"));
        } else if info.code == CLOSE_NORMAL && info.reason.contains("timeout") {
            self.report_error(&ErrorPayload::warning("Connection timeout"));
        }
    }

    fn apply_user(&self, user: &BeyondUser) {
        if self.users.accept(user) {
            self.hooks.update_user(user);
        }
    }

    fn report_error(&self, payload: &ErrorPayload) {
        let notice = classify(payload);
        if notice.should_logout {
            // The next login must see its user record even if unchanged.
            self.users.reset();
            self.hooks.logout();
        }
        self.hooks.notify(notice);
        if payload.critical {
            error!(message = %payload.message, "critical socket error");
        } else if self.is_dev {
            warn!(message = %payload.message, "socket warning");
        }
    }
}
