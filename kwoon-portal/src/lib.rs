//! Kwoon Portal - Session and access-control core
//!
//! This crate is the authority on who is signed in to the association
//! portal and what they may see. It wires the credential transport and
//! token vault from `kwoon-auth` into a session store, a role-gated
//! capability registry, and a route guard.
//!
//! The intended shape for a host application:
//!
//! ```no_run
//! use kwoon_core::KwoonConfig;
//! use kwoon_portal::{GuardDecision, Portal};
//!
//! # async fn run() -> kwoon_core::KwoonResult<()> {
//! let portal = Portal::new(KwoonConfig::default())?;
//! portal.session().initialize().await;
//!
//! let outcome = portal.session().login("ana", "secret123", "7").await?;
//! let decision = portal.guard().resolve(&outcome.navigation).await;
//! assert_eq!(decision, GuardDecision::Granted);
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod guard;
pub mod routes;
pub mod session;

pub use capabilities::{Capability, CapabilityRegistry};
pub use guard::{GuardDecision, RouteGuard};
pub use routes::PortalRoute;
pub use session::{Identity, IdentitySource, InitOutcome, LoginOutcome, Session, SessionStore};

use kwoon_auth::{CredentialTransport, HttpCredentialTransport, TokenVault};
use kwoon_core::{KwoonConfig, KwoonResult, SchoolDirectory};
use std::sync::Arc;
use tracing::info;

/// The assembled session and access-control core
///
/// Owns the session store and the capability registry; hands out guards
/// that observe the store. Cheap to share behind an `Arc` in a host
/// application.
pub struct Portal {
    store: Arc<SessionStore>,
    registry: Arc<CapabilityRegistry>,
    directory: SchoolDirectory,
    config: KwoonConfig,
}

/// Builder for [`Portal`]
///
/// Defaults to the HTTP credential transport, the standard capability
/// registry, and the association school directory. Tests swap the
/// transport for a scripted one.
pub struct PortalBuilder {
    config: KwoonConfig,
    transport: Option<Arc<dyn CredentialTransport>>,
    registry: Option<CapabilityRegistry>,
    directory: Option<SchoolDirectory>,
}

impl PortalBuilder {
    pub fn new(config: KwoonConfig) -> Self {
        Self {
            config,
            transport: None,
            registry: None,
            directory: None,
        }
    }

    /// Use a custom credential transport
    pub fn with_transport(mut self, transport: Arc<dyn CredentialTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom capability registry
    pub fn with_registry(mut self, registry: CapabilityRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a custom school directory
    pub fn with_directory(mut self, directory: SchoolDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Validate the configuration and assemble the portal
    pub fn build(self) -> KwoonResult<Portal> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpCredentialTransport::new(self.config.api.clone())?),
        };

        let vault = TokenVault::new(&self.config.storage.data_dir)?;
        let registry = Arc::new(self.registry.unwrap_or_default());
        let directory = self.directory.unwrap_or_default();

        let store = Arc::new(SessionStore::new(
            transport,
            vault,
            directory.clone(),
            self.config.portal.default_school_id.clone(),
        ));

        info!(
            schools = directory.len(),
            capabilities = registry.len(),
            "Portal assembled"
        );

        Ok(Portal {
            store,
            registry,
            directory,
            config: self.config,
        })
    }
}

impl Portal {
    /// Assemble a portal with the default collaborators
    pub fn new(config: KwoonConfig) -> KwoonResult<Self> {
        Self::builder(config).build()
    }

    /// Start building a portal
    pub fn builder(config: KwoonConfig) -> PortalBuilder {
        PortalBuilder::new(config)
    }

    /// The session store
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// A guard observing this portal's session
    ///
    /// Each guard carries its own subscription; creating one per
    /// navigation surface is expected.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.store.subscribe(), Arc::clone(&self.registry))
    }

    /// The capabilities visible to the current session, in registry order
    ///
    /// An unresolved or anonymous session sees nothing.
    pub fn visible_capabilities(&self) -> Vec<&Capability> {
        let session = self.store.snapshot();

        match session.identity {
            Some(identity) => self.registry.visible_for(&identity.roles),
            None => Vec::new(),
        }
    }

    /// The full capability registry
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// The association's school directory
    pub fn schools(&self) -> &SchoolDirectory {
        &self.directory
    }

    /// The configuration the portal was built with
    pub fn config(&self) -> &KwoonConfig {
        &self.config
    }
}
