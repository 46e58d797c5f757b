//! Route guard
//!
//! Decides whether a requested route renders, waits, or redirects. The
//! guard owns no state; it reads session snapshots from the store's watch
//! channel and consults the capability registry for role checks.

use crate::capabilities::CapabilityRegistry;
use crate::routes::PortalRoute;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// The guard's verdict for one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session has not settled; render nothing yet
    Pending,
    /// Render the requested route
    Granted,
    /// Do not render; navigate to `redirect` instead
    Denied { redirect: PortalRoute },
}

/// Gatekeeper for protected routes
pub struct RouteGuard {
    session_rx: watch::Receiver<Session>,
    registry: Arc<CapabilityRegistry>,
}

impl RouteGuard {
    pub fn new(session_rx: watch::Receiver<Session>, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            session_rx,
            registry,
        }
    }

    /// Decide against the current snapshot without waiting
    ///
    /// Returns [`GuardDecision::Pending`] while the session is loading; a
    /// loading session is never mistaken for an unauthenticated one.
    pub fn check(&self, route: &PortalRoute) -> GuardDecision {
        let session = self.session_rx.borrow().clone();
        self.decide(&session, route)
    }

    /// Wait for the session to settle, then decide
    ///
    /// Never yields [`GuardDecision::Pending`]. Public routes resolve
    /// immediately without touching the session.
    pub async fn resolve(&self, route: &PortalRoute) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Granted;
        }

        let mut session_rx = self.session_rx.clone();

        let session = match session_rx.wait_for(|session| !session.is_loading).await {
            Ok(session) => session.clone(),
            Err(_) => {
                warn!("Session store dropped while a guard was waiting; denying access");
                return GuardDecision::Denied {
                    redirect: PortalRoute::Landing,
                };
            }
        };

        self.decide(&session, route)
    }

    fn decide(&self, session: &Session, route: &PortalRoute) -> GuardDecision {
        // Public routes render regardless of session state
        let capability_id = match route {
            PortalRoute::Landing | PortalRoute::Login { .. } => return GuardDecision::Granted,
            PortalRoute::Portal { capability_id, .. } => capability_id,
        };

        if session.is_loading {
            return GuardDecision::Pending;
        }

        let Some(identity) = &session.identity else {
            debug!(route = %route, "Unauthenticated access to a protected route");
            return GuardDecision::Denied {
                redirect: PortalRoute::Landing,
            };
        };

        let Some(capability) = self.registry.find(capability_id) else {
            debug!(
                capability_id = %capability_id,
                "Unknown capability; treating the path as unmatched"
            );
            return GuardDecision::Denied {
                redirect: PortalRoute::Landing,
            };
        };

        if capability.allows(&identity.roles) {
            GuardDecision::Granted
        } else {
            debug!(
                capability_id = %capability_id,
                username = %identity.username,
                "Role set does not unlock the capability"
            );
            GuardDecision::Denied {
                redirect: PortalRoute::dashboard(&identity.school_id),
            }
        }
    }
}
