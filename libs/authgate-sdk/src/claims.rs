//! Normalized caller identity produced by claim mapping.

use std::collections::HashMap;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Access roles as a small bitmask.
///
/// Roles are independent bits, not an ordered ladder; combining them with `|`
/// yields a role set. How a given role satisfies a given check is the
/// authorizer's business; this type only stores and combines bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(u32);

impl Role {
    /// No role granted.
    pub const UNSPECIFIED: Role = Role(0);
    /// Read-only access.
    pub const READER: Role = Role(1);
    /// Read/write access.
    pub const WRITER: Role = Role(1 << 1);
    /// Task-processing access (background workers).
    pub const WORKER: Role = Role(1 << 2);
    /// Full access.
    pub const ADMIN: Role = Role(1 << 3);

    /// Whether every bit of `role` is present in `self`.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.0 == role.0
    }

    /// Combine two role sets.
    #[must_use]
    pub const fn union(self, role: Role) -> Role {
        Role(self.0 | role.0)
    }

    /// Whether no role bit is set.
    #[must_use]
    pub const fn is_unspecified(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Role {
    type Output = Role;

    fn bitor(self, rhs: Role) -> Role {
        self.union(rhs)
    }
}

impl BitOrAssign for Role {
    fn bitor_assign(&mut self, rhs: Role) {
        *self = self.union(rhs);
    }
}

/// Normalized identity/authorization attributes of a caller.
///
/// Produced by a [`ClaimMapper`](crate::ClaimMapper) from raw evidence and
/// attached to the call for the downstream handler. The interceptor itself
/// never inspects the contents; only authorizers and handlers do. Created per
/// call, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Who the caller is (certificate CN, token subject, service name).
    /// Empty for anonymous claims.
    #[serde(default)]
    pub subject: String,

    /// Roles granted across the whole server, independent of namespace.
    #[serde(default)]
    pub system: Role,

    /// Per-namespace role grants.
    #[serde(default)]
    pub namespaces: HashMap<String, Role>,

    /// Mapper-specific extra attributes for custom authorizers.
    #[serde(default)]
    pub extensions: serde_json::Value,
}

impl Claims {
    /// Role granted for `namespace`, or [`Role::UNSPECIFIED`] when the
    /// namespace has no entry.
    #[must_use]
    pub fn namespace_role(&self, namespace: &str) -> Role {
        self.namespaces.get(namespace).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn role_union_and_contains() {
        let role = Role::READER | Role::WORKER;
        assert!(role.contains(Role::READER));
        assert!(role.contains(Role::WORKER));
        assert!(!role.contains(Role::WRITER));
        assert!(role.contains(Role::UNSPECIFIED));
    }

    #[test]
    fn role_default_is_unspecified() {
        assert!(Role::default().is_unspecified());
        assert_eq!(Role::default(), Role::UNSPECIFIED);
    }

    #[test]
    fn bitor_assign_accumulates() {
        let mut role = Role::UNSPECIFIED;
        role |= Role::WRITER;
        role |= Role::ADMIN;
        assert_eq!(role, Role::WRITER | Role::ADMIN);
    }

    #[test]
    fn namespace_role_falls_back_to_unspecified() {
        let mut claims = Claims {
            subject: "svc-a".to_owned(),
            ..Claims::default()
        };
        claims.namespaces.insert("ns1".to_owned(), Role::WRITER);

        assert_eq!(claims.namespace_role("ns1"), Role::WRITER);
        assert_eq!(claims.namespace_role("other"), Role::UNSPECIFIED);
    }

    #[test]
    fn claims_serde_round_trip() {
        let mut claims = Claims {
            subject: "svc-a".to_owned(),
            system: Role::READER,
            ..Claims::default()
        };
        claims.namespaces.insert("ns1".to_owned(), Role::ADMIN);

        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
