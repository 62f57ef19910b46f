//! Role and ownership checks.
//!
//! Callers first establish that the target resource exists (a missing resource is a
//! not-found for everyone), then ask [`authorize`] whether the subject may act on it.
//! The predicate checks authentication, then role, then ownership, in that order.

use crate::database::app_user::{User, UserRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Any authenticated subject, whatever their role.
pub const ANY_ROLE: &[UserRole] = &[];
pub const TRIP_OWNER_ONLY: &[UserRole] = &[UserRole::TripOwner];
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// The authenticated party behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for Subject {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Who, besides the role check, may touch the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// No ownership requirement.
    Any,
    /// Only the user with this id.
    OwnedBy(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    AuthRequired,
    RoleDenied,
    OwnerDenied,
}

/// Why a subject was turned away with a 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    RoleMismatch,
    NotOwner,
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoleMismatch => f.write_str("role not allowed"),
            Self::NotOwner => f.write_str("not the owner"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("authentication required")]
    AuthRequired,
    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),
}

/// Decides whether `subject` may act under the given role set and ownership rule.
///
/// An empty `allowed_roles` accepts every role.
#[must_use]
pub fn authorize(
    subject: Option<&Subject>,
    allowed_roles: &[UserRole],
    ownership: Ownership,
) -> AccessDecision {
    let Some(subject) = subject else {
        return AccessDecision::AuthRequired;
    };
    if !allowed_roles.is_empty() && !allowed_roles.contains(&subject.role) {
        return AccessDecision::RoleDenied;
    }
    match ownership {
        Ownership::OwnedBy(owner_id) if owner_id != subject.id => AccessDecision::OwnerDenied,
        _ => AccessDecision::Allow,
    }
}

impl AccessDecision {
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Self::Allow => Ok(()),
            Self::AuthRequired => Err(AccessDenied::AuthRequired),
            Self::RoleDenied => Err(AccessDenied::Forbidden(ForbiddenReason::RoleMismatch)),
            Self::OwnerDenied => Err(AccessDenied::Forbidden(ForbiddenReason::NotOwner)),
        }
    }
}

/// Shorthand for `authorize(..).into_result()`.
pub fn ensure(
    subject: Option<&Subject>,
    allowed_roles: &[UserRole],
    ownership: Ownership,
) -> Result<(), AccessDenied> {
    authorize(subject, allowed_roles, ownership).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: i32, role: UserRole) -> Subject {
        Subject {
            id,
            email: format!("user{id}@example.com"),
            role,
        }
    }

    #[test]
    fn anonymous_subject_needs_authentication() {
        assert_eq!(
            authorize(None, ANY_ROLE, Ownership::Any),
            AccessDecision::AuthRequired
        );
        assert_eq!(
            authorize(None, TRIP_OWNER_ONLY, Ownership::OwnedBy(1)),
            AccessDecision::AuthRequired
        );
    }

    #[test]
    fn role_is_checked_before_ownership() {
        let visitor = subject(7, UserRole::Visitor);
        assert_eq!(
            authorize(Some(&visitor), TRIP_OWNER_ONLY, Ownership::OwnedBy(99)),
            AccessDecision::RoleDenied
        );
    }

    #[test]
    fn matching_role_is_not_enough_without_ownership() {
        let owner = subject(7, UserRole::TripOwner);
        assert_eq!(
            authorize(Some(&owner), TRIP_OWNER_ONLY, Ownership::OwnedBy(8)),
            AccessDecision::OwnerDenied
        );
        assert_eq!(
            authorize(Some(&owner), TRIP_OWNER_ONLY, Ownership::OwnedBy(7)),
            AccessDecision::Allow
        );
    }

    #[test]
    fn admin_role_does_not_bypass_trip_owner_requirement() {
        let admin = subject(1, UserRole::Admin);
        assert_eq!(
            authorize(Some(&admin), TRIP_OWNER_ONLY, Ownership::OwnedBy(1)),
            AccessDecision::RoleDenied
        );
    }

    #[test]
    fn empty_role_set_accepts_every_role() {
        for role in [UserRole::Visitor, UserRole::TripOwner, UserRole::Admin] {
            assert_eq!(
                authorize(Some(&subject(3, role)), ANY_ROLE, Ownership::Any),
                AccessDecision::Allow
            );
        }
    }

    #[test]
    fn decisions_map_to_distinct_denials() {
        assert_eq!(AccessDecision::Allow.into_result(), Ok(()));
        assert_eq!(
            AccessDecision::AuthRequired.into_result(),
            Err(AccessDenied::AuthRequired)
        );
        assert_eq!(
            AccessDecision::RoleDenied.into_result(),
            Err(AccessDenied::Forbidden(ForbiddenReason::RoleMismatch))
        );
        assert_eq!(
            AccessDecision::OwnerDenied.into_result(),
            Err(AccessDenied::Forbidden(ForbiddenReason::NotOwner))
        );
    }
}
