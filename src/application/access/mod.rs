use uuid::Uuid;

use crate::domain::users::user::UserRole;

/// Authenticated caller as resolved from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AdminOnly,
    SellerOrAdmin,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::AdminOnly => "AdminOnly",
            Policy::SellerOrAdmin => "SellerOrAdmin",
        }
    }

    pub fn allows(&self, role: UserRole) -> bool {
        match self {
            Policy::AdminOnly => role == UserRole::Admin,
            Policy::SellerOrAdmin => matches!(role, UserRole::Seller | UserRole::Admin),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{} policy denies role {}", .policy.name(), .role)]
pub struct Forbidden {
    pub policy: Policy,
    pub role: UserRole,
}

// Presentation layer builds the Principal; this module only decides.
pub fn require(principal: &Principal, policy: Policy) -> Result<(), Forbidden> {
    if policy.allows(principal.role) {
        Ok(())
    } else {
        Err(Forbidden {
            policy,
            role: principal.role,
        })
    }
}
