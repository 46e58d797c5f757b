//! Capability registry and role-based visibility
//!
//! Each portal feature is a capability with an id, a display name, and the
//! set of roles allowed to use it. The registry drives both menu visibility
//! and route protection, so the two can never disagree.

use kwoon_core::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A portal feature gated by roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    /// Stable id, used in portal paths
    pub id: String,
    /// Human-readable name for menus
    pub name: String,
    /// Roles allowed to use the capability
    pub allowed_roles: HashSet<Role>,
}

impl Capability {
    pub fn new(id: &str, name: &str, allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            allowed_roles: allowed_roles.into_iter().collect(),
        }
    }

    /// Whether any of the given roles unlocks this capability
    pub fn allows(&self, roles: &HashSet<Role>) -> bool {
        roles.iter().any(|role| self.allowed_roles.contains(role))
    }
}

/// Ordered collection of the portal's capabilities
///
/// Order is preserved; menus list capabilities in registry order.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
}

impl CapabilityRegistry {
    pub fn new(capabilities: Vec<Capability>) -> Self {
        Self { capabilities }
    }

    /// The standard registry of the association portal
    pub fn standard() -> Self {
        use Role::{Directorate, Instructor, Student};

        Self::new(vec![
            Capability::new("dashboard", "Dashboard", [Student, Instructor, Directorate]),
            Capability::new("historico-aulas", "Class History", [Student]),
            Capability::new("programacao-aulas", "Monthly Class Scheduling", [Student]),
            Capability::new(
                "gestao-diaria",
                "Daily Class Management",
                [Instructor, Directorate],
            ),
            Capability::new(
                "confirmacao-aulas",
                "Class Confirmation",
                [Instructor, Directorate],
            ),
            Capability::new(
                "ficha-aluno",
                "Student Progress Record",
                [Instructor, Directorate],
            ),
            Capability::new("cadastros", "Registrations", [Directorate]),
            Capability::new("financeiro", "Financial Management", [Directorate]),
            Capability::new("config-escola", "School Settings", [Directorate]),
            Capability::new("relatorios", "Management Reports", [Directorate]),
            Capability::new("permissoes", "Permission Control", [Directorate]),
        ])
    }

    /// Look up a capability by id
    pub fn find(&self, id: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.id == id)
    }

    /// The capabilities visible to a set of roles, in registry order
    ///
    /// Recomputed per call; visibility never survives an identity change.
    pub fn visible_for(&self, roles: &HashSet<Role>) -> Vec<&Capability> {
        if roles.is_empty() {
            return Vec::new();
        }

        self.capabilities
            .iter()
            .filter(|c| c.allows(roles))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
