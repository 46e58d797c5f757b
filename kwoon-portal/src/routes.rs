//! Portal route model
//!
//! The portal exposes three kinds of paths: the public landing page, a
//! per-school login page, and protected capability pages under `/portal`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location within the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalRoute {
    /// The public landing page at `/`
    Landing,
    /// The login page for one school, `/{school_id}/login`
    Login { school_id: String },
    /// A protected capability page, `/portal/{school_id}/{capability_id}`
    Portal {
        school_id: String,
        capability_id: String,
    },
}

impl PortalRoute {
    /// The login route for a school
    pub fn login(school_id: &str) -> Self {
        PortalRoute::Login {
            school_id: school_id.to_string(),
        }
    }

    /// A capability route within a school's portal
    pub fn portal(school_id: &str, capability_id: &str) -> Self {
        PortalRoute::Portal {
            school_id: school_id.to_string(),
            capability_id: capability_id.to_string(),
        }
    }

    /// The dashboard route, where a fresh session lands
    pub fn dashboard(school_id: &str) -> Self {
        Self::portal(school_id, "dashboard")
    }

    /// Parse a path into a route
    ///
    /// Leading and trailing slashes are ignored. Paths outside the portal
    /// grammar return `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Some(PortalRoute::Landing);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            [school_id, "login"] if !school_id.is_empty() => Some(PortalRoute::Login {
                school_id: school_id.to_string(),
            }),
            ["portal", school_id, capability_id]
                if !school_id.is_empty() && !capability_id.is_empty() =>
            {
                Some(PortalRoute::Portal {
                    school_id: school_id.to_string(),
                    capability_id: capability_id.to_string(),
                })
            }
            _ => None,
        }
    }

    /// The school the route is scoped to, if any
    pub fn school_id(&self) -> Option<&str> {
        match self {
            PortalRoute::Landing => None,
            PortalRoute::Login { school_id } => Some(school_id),
            PortalRoute::Portal { school_id, .. } => Some(school_id),
        }
    }

    /// Whether the route requires an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(self, PortalRoute::Portal { .. })
    }
}

impl fmt::Display for PortalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalRoute::Landing => write!(f, "/"),
            PortalRoute::Login { school_id } => write!(f, "/{}/login", school_id),
            PortalRoute::Portal {
                school_id,
                capability_id,
            } => write!(f, "/portal/{}/{}", school_id, capability_id),
        }
    }
}
