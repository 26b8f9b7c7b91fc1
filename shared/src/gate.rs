//! Role resolution and the page-load access gate.
//!
//! The gate is deliberately pure: it takes an already-resolved role and a
//! required set and returns a decision. Navigation (redirects) is the
//! caller's job, which keeps every allow/deny path unit-testable without
//! a network in sight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RoleRecord;

/// The three site roles. Stored as lowercase strings in the profile table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Reader,
    Editor,
    Admin,
}

impl Role {
    /// Resolves a profile lookup result to an effective role.
    ///
    /// A missing record is a valid, silent case and maps to `Reader`; the
    /// gate still denies readers on protected pages, so defaulting here
    /// never widens access.
    pub fn resolve(record: Option<&RoleRecord>) -> Role {
        record.map(|r| r.role).unwrap_or(Role::Reader)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    pub const ALL: [Role; 3] = [Role::Reader, Role::Editor, Role::Admin];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reader" => Ok(Role::Reader),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// A required-role set for a page or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);
    /// Editors and admins: may author and moderate content.
    pub const EDITORIAL: RoleSet = RoleSet::of(&[Role::Editor, Role::Admin]);
    /// Admins only: role management and destructive operations.
    pub const ADMIN_ONLY: RoleSet = RoleSet::of(&[Role::Admin]);
    /// Any signed-in visitor, whatever their role.
    pub const ANY: RoleSet = RoleSet::of(&Role::ALL);

    pub const fn of(roles: &[Role]) -> RoleSet {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= 1 << roles[i] as u8;
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & (1 << role as u8) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write!(f, "{{")?;
        for role in Role::ALL {
            if self.contains(role) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{role}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

/// Why a gate denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity at all, or the session/role lookup failed or timed out.
    NotAuthenticated,
    /// Identity present, but its role is not in the required set.
    InsufficientRole,
}

/// Outcome of the access gate for one page load or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Allows iff `role` is a member of `required`.
///
/// `authenticated` distinguishes the two deny reasons: an anonymous
/// visitor is `NotAuthenticated` even when readers happen to be excluded,
/// while a signed-in visitor outside the set is `InsufficientRole`.
pub fn authorize(role: Role, authenticated: bool, required: RoleSet) -> Decision {
    if !authenticated {
        return if required.contains(role) && matches!(role, Role::Reader) {
            // Anonymous visitors act as readers; a set that admits
            // readers admits them too.
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::NotAuthenticated)
        };
    }
    if required.contains(role) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_subsets() -> Vec<RoleSet> {
        let mut sets = Vec::new();
        for bits in 0u8..8 {
            let mut members = Vec::new();
            for role in Role::ALL {
                if bits & (1 << role as u8) != 0 {
                    members.push(role);
                }
            }
            sets.push(RoleSet::of(&members));
        }
        sets
    }

    #[test]
    fn authorize_allows_iff_role_in_set() {
        // Exhaustive over the 3-role x 2^3-subset space.
        for set in all_subsets() {
            for role in Role::ALL {
                let decision = authorize(role, true, set);
                if set.contains(role) {
                    assert_eq!(decision, Decision::Allow, "{role} vs {set}");
                } else {
                    assert_eq!(
                        decision,
                        Decision::Deny(DenyReason::InsufficientRole),
                        "{role} vs {set}"
                    );
                }
            }
        }
    }

    #[test]
    fn anonymous_is_not_authenticated_on_protected_sets() {
        assert_eq!(
            authorize(Role::Reader, false, RoleSet::EDITORIAL),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
        assert_eq!(
            authorize(Role::Reader, false, RoleSet::ADMIN_ONLY),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
    }

    #[test]
    fn anonymous_passes_reader_friendly_sets() {
        let public = RoleSet::of(&[Role::Reader, Role::Editor, Role::Admin]);
        assert_eq!(authorize(Role::Reader, false, public), Decision::Allow);
    }

    #[test]
    fn reader_denied_on_editorial_admin_allowed() {
        assert_eq!(
            authorize(Role::Reader, true, RoleSet::EDITORIAL),
            Decision::Deny(DenyReason::InsufficientRole)
        );
        assert_eq!(
            authorize(Role::Admin, true, RoleSet::EDITORIAL),
            Decision::Allow
        );
    }

    #[test]
    fn missing_role_record_defaults_to_reader() {
        assert_eq!(Role::resolve(None), Role::Reader);
        let record = RoleRecord {
            id: "u1".into(),
            email: "ed@example.com".into(),
            role: Role::Editor,
        };
        assert_eq!(Role::resolve(Some(&record)), Role::Editor);
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_uses_lowercase_wire_values() {
        let json = serde_json::to_string(&Role::Editor).expect("serialize role");
        assert_eq!(json, "\"editor\"");
        let role: Role = serde_json::from_str("\"admin\"").expect("deserialize role");
        assert_eq!(role, Role::Admin);
    }
}
