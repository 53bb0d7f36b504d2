//! Ownership guard
//!
//! The one authorization rule in EventHub: a resource may only be mutated by
//! its owner, and an account may only be changed by itself. Every create,
//! update and delete in the services goes through here before touching the
//! store. The guard never fetches anything; callers pass both ids in.

use eventhub_core::AccountId;
use thiserror::Error;
use tracing::warn;

/// Outcome of an authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }
}

/// Why a guarded operation was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// No usable identity on the request (unauthenticated)
    #[error("Authentication required")]
    IdentityAbsent,
    /// Authenticated, but not the owner (forbidden)
    #[error("Not permitted to modify this resource")]
    OwnershipDenied,
}

/// Stateless ownership decisions
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// `Allow` iff the caller is known and owns the resource
    pub fn authorize_mutation(caller: Option<AccountId>, resource_owner: AccountId) -> Verdict {
        match caller {
            Some(caller) if caller == resource_owner => Verdict::Allow,
            _ => Verdict::Deny,
        }
    }

    /// `Allow` iff the caller is known and is the target account
    pub fn authorize_self_service(caller: Option<AccountId>, target: AccountId) -> Verdict {
        Self::authorize_mutation(caller, target)
    }

    /// Require any verified identity (creation)
    pub fn require_identity(caller: Option<AccountId>) -> Result<AccountId, AccessError> {
        caller.ok_or(AccessError::IdentityAbsent)
    }

    /// Like [`authorize_mutation`](Self::authorize_mutation), but tells an
    /// absent identity apart from a wrong owner
    pub fn require_owner(
        caller: Option<AccountId>,
        resource_owner: AccountId,
    ) -> Result<AccountId, AccessError> {
        let caller_id = Self::require_identity(caller)?;

        match Self::authorize_mutation(caller, resource_owner) {
            Verdict::Allow => Ok(caller_id),
            Verdict::Deny => {
                warn!(
                    caller = %caller_id,
                    owner = %resource_owner,
                    "Ownership check denied"
                );
                Err(AccessError::OwnershipDenied)
            }
        }
    }

    /// Self-service variant of [`require_owner`](Self::require_owner)
    pub fn require_self(
        caller: Option<AccountId>,
        target: AccountId,
    ) -> Result<AccountId, AccessError> {
        let caller_id = Self::require_identity(caller)?;

        match Self::authorize_self_service(caller, target) {
            Verdict::Allow => Ok(caller_id),
            Verdict::Deny => {
                warn!(caller = %caller_id, target = %target, "Self-service check denied");
                Err(AccessError::OwnershipDenied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_mutation() {
        assert_eq!(
            OwnershipGuard::authorize_mutation(Some(AccountId(5)), AccountId(5)),
            Verdict::Allow
        );
        assert_eq!(
            OwnershipGuard::authorize_mutation(Some(AccountId(5)), AccountId(7)),
            Verdict::Deny
        );
        assert_eq!(
            OwnershipGuard::authorize_mutation(None, AccountId(5)),
            Verdict::Deny
        );
    }

    #[test]
    fn test_authorize_self_service() {
        assert!(OwnershipGuard::authorize_self_service(Some(AccountId(3)), AccountId(3)).is_allowed());
        assert!(!OwnershipGuard::authorize_self_service(Some(AccountId(3)), AccountId(4)).is_allowed());
        assert!(!OwnershipGuard::authorize_self_service(None, AccountId(3)).is_allowed());
    }

    #[test]
    fn test_require_owner_distinguishes_failures() {
        assert_eq!(
            OwnershipGuard::require_owner(Some(AccountId(5)), AccountId(5)),
            Ok(AccountId(5))
        );
        assert_eq!(
            OwnershipGuard::require_owner(Some(AccountId(5)), AccountId(7)),
            Err(AccessError::OwnershipDenied)
        );
        assert_eq!(
            OwnershipGuard::require_owner(None, AccountId(5)),
            Err(AccessError::IdentityAbsent)
        );
    }

    #[test]
    fn test_require_self() {
        assert_eq!(
            OwnershipGuard::require_self(Some(AccountId(2)), AccountId(2)),
            Ok(AccountId(2))
        );
        assert_eq!(
            OwnershipGuard::require_self(Some(AccountId(2)), AccountId(8)),
            Err(AccessError::OwnershipDenied)
        );
        assert_eq!(
            OwnershipGuard::require_self(None, AccountId(2)),
            Err(AccessError::IdentityAbsent)
        );
    }

    #[test]
    fn test_require_identity() {
        assert_eq!(OwnershipGuard::require_identity(Some(AccountId(1))), Ok(AccountId(1)));
        assert_eq!(OwnershipGuard::require_identity(None), Err(AccessError::IdentityAbsent));
    }
}
