//! Core domain types shared across the portal crates

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Role a portal user can hold within a school.
///
/// The set is closed: the backend only ever grants these three. Unknown
/// role strings are coerced away at the wire boundary, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Enrolled student
    Student,
    /// Teaching staff of a school
    Instructor,
    /// School or association directorate
    Directorate,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Instructor => write!(f, "instructor"),
            Role::Directorate => write!(f, "directorate"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    /// Accepts the canonical names and the legacy group names the backend
    /// still sends (`Aluno`, `Instrutor`, `Diretoria`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" | "aluno" => Ok(Role::Student),
            "instructor" | "instrutor" => Ok(Role::Instructor),
            "directorate" | "diretoria" => Ok(Role::Directorate),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Coerce wire role strings into the closed role set.
///
/// Unknown values are dropped with a warning rather than surfaced as
/// errors; a grant listing no recognizable role yields an empty set and
/// the caller decides the fallback.
pub fn normalize_roles(values: &[String]) -> HashSet<Role> {
    let mut roles = HashSet::new();
    for value in values {
        match value.parse::<Role>() {
            Ok(role) => {
                roles.insert(role);
            }
            Err(e) => {
                warn!("Dropping unrecognized role from credential grant: {}", e);
            }
        }
    }
    roles
}

/// A member school of the association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// Stable identifier, used in routes and stored on the identity
    pub id: String,
    /// Display name
    pub name: String,
    /// Logo asset path, relative to the shell's asset root
    pub logo_url: String,
}

impl School {
    pub fn new(id: &str, name: &str, logo_url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            logo_url: logo_url.to_string(),
        }
    }
}

/// The association's school table, in landing-page display order.
///
/// Static per deployment; login validates the chosen school against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolDirectory {
    pub association_name: String,
    pub association_logo_url: String,
    schools: Vec<School>,
}

impl SchoolDirectory {
    pub fn new(association_name: &str, association_logo_url: &str, schools: Vec<School>) -> Self {
        Self {
            association_name: association_name.to_string(),
            association_logo_url: association_logo_url.to_string(),
            schools,
        }
    }

    /// The association's current member schools.
    pub fn association_default() -> Self {
        Self::new(
            "International Traditional Kung Fu Association",
            "images/association-logo.svg",
            vec![
                School::new("1", "Tomizaki's Champions", "images/tomizakis-champions-logo.svg"),
                School::new(
                    "2",
                    "Instituto de Kung Fu e Taichi",
                    "images/instituto-de-kung-fu-e-taichi-logo.svg",
                ),
                School::new(
                    "3",
                    "Instituto de Kung Fu Shaolin",
                    "images/instituto-de-kung-fu-shaolin-logo.svg",
                ),
                School::new(
                    "4",
                    "Impact Kung Fu Academy",
                    "images/impact-kung-fu-academy-logo.svg",
                ),
                School::new("5", "Academia Choy Lay Fut", "images/academia-choy-lay-fut-logo.svg"),
                School::new("6", "Instituto Wu Xing", "images/instituto-wu-xing-logo.svg"),
                School::new(
                    "7",
                    "Centro de Treinamento Kung Fu Shaolin",
                    "images/centro-de-treinamento-kung-fu-shaolin-logo.svg",
                ),
                School::new(
                    "8",
                    "Academia Wushu De Kung Fu",
                    "images/academia-wushu-de-kung-fu-logo.svg",
                ),
                School::new(
                    "9",
                    "Kwan Kun Escola de Kung Fu",
                    "images/kwan-kun-escola-de-kung-fu-logo.svg",
                ),
                School::new(
                    "10",
                    "Instituto de Kung Fu Shaolin (Variant)",
                    "images/instituto-de-kung-fu-shaolin-variant-logo.svg",
                ),
                School::new(
                    "11",
                    "Escola Choy Lay Fut de Kung Fu",
                    "images/escola-choy-lay-fut-de-kung-fu-logo.svg",
                ),
                School::new(
                    "12",
                    "Mui Fa Escola de Kung Fu Shaolin",
                    "images/mui-fa-escola-de-kung-fu-shaolin-logo.svg",
                ),
                School::new(
                    "13",
                    "Núcleo de Kung Fu Shaolin",
                    "images/nucleo-de-kung-fu-shaolin-logo.svg",
                ),
                School::new(
                    "14",
                    "Escola de Kung Fu Leão Chinês",
                    "images/escola-de-kung-fu-leao-chines-logo.svg",
                ),
                School::new(
                    "15",
                    "Instituto Santista de Kung Fu",
                    "images/instituto-santista-de-kung-fu-logo.svg",
                ),
                School::new(
                    "16",
                    "Taichi Tan Lan Escola de Kung Fu",
                    "images/taichi-tan-lan-escola-de-kung-fu-logo.svg",
                ),
                School::new(
                    "17",
                    "Instituto de Kung Fu Shaolin (Another Variant)",
                    "images/instituto-de-kung-fu-shaolin-another-variant-logo.svg",
                ),
                School::new(
                    "18",
                    "Sino-Brasileira de Kung Fu",
                    "images/sino-brasileira-de-kung-fu-logo.svg",
                ),
                School::new(
                    "19",
                    "Academia de Kung Fu Garra de Águia",
                    "images/academia-de-kung-fu-garra-de-aguia-logo.svg",
                ),
                School::new(
                    "20",
                    "Templo Lohan de Kung Fu",
                    "images/templo-lohan-de-kung-fu-logo.svg",
                ),
                School::new(
                    "21",
                    "Núcleo de Kung Fu Shaolin (Side)",
                    "images/nucleo-de-kung-fu-shaolin-side-logo.svg",
                ),
                School::new(
                    "22",
                    "Sino-Brasileira de Kung Fu",
                    "images/sino-brasileira-de-kung-fu-logo.svg",
                ),
                School::new(
                    "23",
                    "Academia de Kung Fu Garra de Águia",
                    "images/academia-de-kung-fu-garra-de-aguia-logo.svg",
                ),
                School::new(
                    "24",
                    "Templo Lohan de Kung Fu",
                    "images/templo-lohan-de-kung-fu-logo.svg",
                ),
            ],
        )
    }

    /// Look up a school by id.
    pub fn get(&self, id: &str) -> Option<&School> {
        self.schools.iter().find(|school| school.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Schools in display order.
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}

impl Default for SchoolDirectory {
    fn default() -> Self {
        Self::association_default()
    }
}
