//! Session store
//!
//! Single authority on who is signed in, to which school, with which roles,
//! and whether that is settled yet. Every change publishes a whole new
//! [`Session`] snapshot through a watch channel; fields are never mutated
//! in place.

use crate::routes::PortalRoute;
use crate::session::types::{Identity, Session};
use kwoon_auth::{CredentialTransport, TokenVault};
use kwoon_core::{validation_error, ErrorContext, KwoonError, KwoonResult, SchoolDirectory};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How `initialize` resolved the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A persisted credential was found and a placeholder identity installed
    RestoredCredential,
    /// No persisted credential; the session resolved anonymous
    NoCredential,
    /// `initialize` had already run; the session was left untouched
    AlreadyInitialized,
}

/// The result of a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// The identity now installed in the session
    pub identity: Identity,
    /// Where the portal should navigate next
    pub navigation: PortalRoute,
}

/// Owner of the portal session
///
/// Created in the loading state. `initialize` resolves it exactly once;
/// after that every login and logout replaces the snapshot wholesale.
pub struct SessionStore {
    session_tx: watch::Sender<Session>,
    transport: Arc<dyn CredentialTransport>,
    vault: TokenVault,
    directory: SchoolDirectory,
    default_school_id: String,
    initialized: AtomicBool,
}

impl SessionStore {
    pub fn new(
        transport: Arc<dyn CredentialTransport>,
        vault: TokenVault,
        directory: SchoolDirectory,
        default_school_id: String,
    ) -> Self {
        let (session_tx, _) = watch::channel(Session::loading());

        Self {
            session_tx,
            transport,
            vault,
            directory,
            default_school_id,
            initialized: AtomicBool::new(false),
        }
    }

    /// The current session snapshot
    pub fn snapshot(&self) -> Session {
        self.session_tx.borrow().clone()
    }

    /// Subscribe to session changes
    ///
    /// The receiver immediately sees the current snapshot and is notified
    /// on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session_tx.subscribe()
    }

    /// Whether someone is signed in right now
    pub fn is_authenticated(&self) -> bool {
        self.session_tx.borrow().is_authenticated()
    }

    /// Resolve the session at process start
    ///
    /// Runs once. When a persisted credential exists it is installed on the
    /// transport and a placeholder identity is trusted optimistically; the
    /// degradation is logged, never fatal. The session always leaves the
    /// loading state, and only this first call publishes that transition.
    pub async fn initialize(&self) -> InitOutcome {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Session store initialized twice; ignoring the second call");
            return InitOutcome::AlreadyInitialized;
        }

        let stored = match self.vault.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read the persisted credential; continuing without it");
                None
            }
        };

        match stored {
            Some(token) => {
                self.transport.install_credential(&token);

                KwoonError::InitializationDegraded {
                    message: "Restored a persisted credential without backend confirmation"
                        .to_string(),
                    context: ErrorContext::new("session_store")
                        .with_operation("initialize")
                        .with_suggestion(
                            "Treat the restored roles as provisional until a backend call succeeds",
                        ),
                }
                .log();

                let identity = Identity::restored(&self.default_school_id);
                self.session_tx.send_replace(Session::authenticated(identity));

                info!("Session restored from persisted credential");
                InitOutcome::RestoredCredential
            }
            None => {
                self.session_tx.send_replace(Session::anonymous());

                debug!("No persisted credential; session resolved anonymous");
                InitOutcome::NoCredential
            }
        }
    }

    /// Exchange credentials for an authenticated session
    ///
    /// Validation failures surface before the transport is consulted. On
    /// success the credential is persisted and the session replaced with the
    /// new identity; on rejection both the in-memory and persisted
    /// credentials are discarded and the session settles anonymous. Either
    /// way the session leaves the loading state.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        school_id: &str,
    ) -> KwoonResult<LoginOutcome> {
        if username.trim().is_empty() {
            return Err(validation_error!(
                "Username must not be empty",
                "username",
                "session_store"
            ));
        }
        if password.is_empty() {
            return Err(validation_error!(
                "Password must not be empty",
                "password",
                "session_store"
            ));
        }
        if !self.directory.contains(school_id) {
            return Err(validation_error!(
                format!("Unknown school id: {}", school_id),
                "school_id",
                "session_store"
            ));
        }

        // Keep any previous identity visible while the exchange is in
        // flight; guards treat the loading snapshot as pending.
        let previous = self.session_tx.borrow().identity.clone();
        self.session_tx.send_replace(Session {
            identity: previous,
            is_loading: true,
        });

        debug!(username, school_id, "Login started");

        match self.transport.authenticate(username, password).await {
            Ok(grant) => {
                if let Err(e) = self.vault.store(&grant.token) {
                    warn!(error = %e, "Authenticated, but the credential could not be persisted");
                }

                let identity = Identity::from_grant(&grant, school_id);
                let navigation = PortalRoute::dashboard(school_id);
                self.session_tx
                    .send_replace(Session::authenticated(identity.clone()));

                info!(
                    user_id = identity.user_id,
                    username = %identity.username,
                    school_id,
                    "Login succeeded"
                );

                Ok(LoginOutcome {
                    identity,
                    navigation,
                })
            }
            Err(e) => {
                self.discard_credentials();
                self.session_tx.send_replace(Session::anonymous());

                warn!(username, error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// End the session
    ///
    /// Clears the installed and persisted credentials and settles the
    /// session anonymous. Safe to call when nobody is signed in. Returns
    /// where the portal should navigate next.
    pub fn logout(&self) -> PortalRoute {
        self.discard_credentials();
        self.session_tx.send_replace(Session::anonymous());

        info!("Session ended");
        PortalRoute::Landing
    }

    fn discard_credentials(&self) {
        self.transport.clear_credential();
        if let Err(e) = self.vault.clear() {
            warn!(error = %e, "Could not remove the persisted credential");
        }
    }
}
