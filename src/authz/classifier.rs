//! Role classification.
//!
//! Maps raw role labels onto the coarse role classes the gate and the
//! projector reason about. Both consume this module so enforcement and the
//! UI flag are always derived from the same rules.

use super::principal::Principal;
use super::roles;

/// Substrings marking a read-only (regional oversight) role once the label
/// is lowercased and stripped of whitespace.
///
/// `zamakim` contains `akim`; both are kept so the two can diverge later.
pub const READ_ONLY_MARKERS: [&str; 2] = [roles::ZAMAKIM, roles::AKIM];

/// Russian spelling of the marker, as used in display names
/// ("Заместитель акима").
pub const CYRILLIC_MARKER: &str = "аким";

/// `акимат` is the akim's office. Staff labelled after the office
/// ("Исполнитель акимата") do not hold the position.
const CYRILLIC_OFFICE: &str = "акимат";

/// Machine names of the limited (execution) roles. Compared exactly.
pub const LIMITED_ROLES: [&str; 2] = [roles::ISPOLNITEL, roles::BASKARMA];

/// Lowercase and drop every whitespace character.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn is_read_only(label: Option<&str>) -> bool {
    let Some(label) = label else {
        return false;
    };
    let normalized = normalize(label);
    if normalized.is_empty() {
        return false;
    }
    READ_ONLY_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
        || names_cyrillic_akim(&normalized)
}

fn names_cyrillic_akim(normalized: &str) -> bool {
    normalized
        .match_indices(CYRILLIC_MARKER)
        .any(|(at, _)| !normalized[at..].starts_with(CYRILLIC_OFFICE))
}

pub fn is_limited(label: Option<&str>) -> bool {
    match label {
        Some(label) => LIMITED_ROLES.contains(&label),
        None => false,
    }
}

/// Class membership for one principal. The flags are computed independently;
/// a principal in neither class is unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleClasses {
    pub read_only: bool,
    pub limited: bool,
}

impl RoleClasses {
    /// Read-only membership looks at every role field the principal carries;
    /// limited membership only at the normalized role's machine name.
    pub fn of(principal: &Principal) -> Self {
        Self {
            read_only: principal
                .role_candidates()
                .any(|label| is_read_only(Some(label))),
            limited: is_limited(principal.role_name()),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        !self.read_only && !self.limited
    }

    pub fn label(&self) -> &'static str {
        match (self.read_only, self.limited) {
            (true, _) => "read_only",
            (false, true) => "limited",
            (false, false) => "unrestricted",
        }
    }
}
