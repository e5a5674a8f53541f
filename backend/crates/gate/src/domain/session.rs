//! Session State
//!
//! The per-request authentication state derived from the stored
//! artifact by the session validator.

use crate::domain::identity::Identity;

/// Authentication state of the current request
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated {
        identity: Identity,
        is_admin: bool,
        is_verified: bool,
    },
}

impl SessionState {
    /// Build the authenticated state, deriving the access flags from
    /// the identity snapshot.
    pub fn authenticated(identity: Identity) -> Self {
        let is_admin = identity.is_admin();
        let is_verified = identity.activated;
        Self::Authenticated {
            identity,
            is_admin,
            is_verified,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { is_admin: true, .. })
    }

    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            Self::Authenticated {
                is_verified: true,
                ..
            }
        )
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            Self::Anonymous => None,
        }
    }
}
