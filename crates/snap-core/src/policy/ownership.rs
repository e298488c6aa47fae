//! Ownership guard
//!
//! Every mutation of user-authored content goes through [`ensure_owner`], so the
//! author check lives in exactly one place.

use std::fmt;

use crate::error::DomainError;
use crate::value_objects::UserId;

/// What the actor is trying to do with the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Edit,
    Delete,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource with a single owning user
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

/// Fail with [`DomainError::NotOwner`] unless `actor` owns `resource`
pub fn ensure_owner<R>(actor: UserId, resource: &R, capability: Capability) -> Result<(), DomainError>
where
    R: Owned + ?Sized,
{
    if resource.owner_id() == actor {
        Ok(())
    } else {
        Err(DomainError::NotOwner(capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        owner: UserId,
    }

    impl Owned for Note {
        fn owner_id(&self) -> UserId {
            self.owner
        }
    }

    #[test]
    fn test_owner_passes_for_every_capability() {
        let owner = UserId::new();
        let note = Note { owner };

        assert!(ensure_owner(owner, &note, Capability::Edit).is_ok());
        assert!(ensure_owner(owner, &note, Capability::Delete).is_ok());
    }

    #[test]
    fn test_non_owner_is_rejected_with_capability() {
        let note = Note { owner: UserId::new() };
        let stranger = UserId::new();

        let err = ensure_owner(stranger, &note, Capability::Delete).unwrap_err();
        assert!(matches!(err, DomainError::NotOwner(Capability::Delete)));
        assert!(err.is_authorization());
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::Edit.to_string(), "edit");
        assert_eq!(Capability::Delete.to_string(), "delete");
    }
}
