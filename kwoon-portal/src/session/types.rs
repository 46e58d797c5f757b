//! Session data structures

use chrono::{DateTime, Utc};
use kwoon_auth::CredentialGrant;
use kwoon_core::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How an identity entered the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentitySource {
    /// Established through a credential exchange
    Login,
    /// Rebuilt from a persisted credential without backend confirmation
    RestoredCredential,
}

/// An authenticated portal user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user id; 0 for restored placeholder identities
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Granted roles; never empty
    pub roles: HashSet<Role>,
    /// School the identity is scoped to
    pub school_id: String,
    pub source: IdentitySource,
    pub established_at: DateTime<Utc>,
}

impl Identity {
    /// Build an identity from a credential grant
    ///
    /// A grant naming no roles falls back to the student role so the
    /// identity always carries at least one.
    pub fn from_grant(grant: &CredentialGrant, school_id: &str) -> Self {
        let mut roles = grant.roles.clone();
        if roles.is_empty() {
            roles.insert(Role::Student);
        }

        Self {
            user_id: grant.user_id,
            username: grant.username.clone(),
            email: grant.email.clone(),
            roles,
            school_id: school_id.to_string(),
            source: IdentitySource::Login,
            established_at: Utc::now(),
        }
    }

    /// Build the placeholder identity for a restored credential
    ///
    /// The widest role is assumed until the first backend call says
    /// otherwise; the real identity arrives with the next login.
    pub fn restored(school_id: &str) -> Self {
        let mut roles = HashSet::new();
        roles.insert(Role::Directorate);

        Self {
            user_id: 0,
            username: "session".to_string(),
            email: None,
            roles,
            school_id: school_id.to_string(),
            source: IdentitySource::RestoredCredential,
            established_at: Utc::now(),
        }
    }

    /// Whether the identity carries the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The portal session snapshot
///
/// Authentication is derived from the identity and never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Option<Identity>,
    /// Whether session establishment is still in flight
    pub is_loading: bool,
}

impl Session {
    /// The state before initialization or while a login is in flight
    pub fn loading() -> Self {
        Self {
            identity: None,
            is_loading: true,
        }
    }

    /// A settled session with nobody signed in
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            is_loading: false,
        }
    }

    /// A settled session for the given identity
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            is_loading: false,
        }
    }

    /// Whether someone is signed in
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(roles: &[Role]) -> CredentialGrant {
        CredentialGrant {
            token: "t".to_string(),
            user_id: 9,
            username: "ana".to_string(),
            email: None,
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn identity_from_grant_keeps_granted_roles() {
        let identity = Identity::from_grant(&grant(&[Role::Instructor]), "7");

        assert_eq!(identity.user_id, 9);
        assert_eq!(identity.school_id, "7");
        assert_eq!(identity.source, IdentitySource::Login);
        assert!(identity.has_role(Role::Instructor));
        assert!(!identity.has_role(Role::Directorate));
    }

    #[test]
    fn identity_from_empty_grant_defaults_to_student() {
        let identity = Identity::from_grant(&grant(&[]), "7");

        assert_eq!(identity.roles.len(), 1);
        assert!(identity.has_role(Role::Student));
    }

    #[test]
    fn restored_identity_is_a_placeholder_with_the_widest_role() {
        let identity = Identity::restored("1");

        assert_eq!(identity.user_id, 0);
        assert_eq!(identity.username, "session");
        assert_eq!(identity.source, IdentitySource::RestoredCredential);
        assert!(identity.has_role(Role::Directorate));
    }

    #[test]
    fn authentication_is_derived_from_the_identity() {
        assert!(!Session::loading().is_authenticated());
        assert!(!Session::anonymous().is_authenticated());
        assert!(Session::authenticated(Identity::restored("1")).is_authenticated());
    }
}
