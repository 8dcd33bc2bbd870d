use core::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller role as asserted by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    /// Staff roles may decide offers on listings they do not own.
    pub fn is_staff(&self) -> bool {
        matches!(*self, Role::Admin | Role::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Superadmin => write!(f, "superadmin"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Claim<'a> {
    /// ID
    pub id: &'a str,
    /// Display name
    pub display_name: &'a str,
    /// User Email
    pub email: &'a str,
    /// Role of the user.
    pub role: Role,
    /// Audience
    pub aud: &'a str,
    /// Expire Time
    pub exp: u64,
    /// Issue Time
    pub iat: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClaimOwned {
    /// ID
    pub id: String,
    /// Display name
    pub display_name: String,
    /// User Email
    pub email: String,
    /// Role of the user.
    pub role: Role,
    /// Audience
    pub aud: String,
    /// Expire Time
    pub exp: u64,
    /// Issue Time
    pub iat: u64,
}

impl ClaimOwned {
    pub fn as_claim(&self) -> Claim {
        Claim {
            id: &self.id,
            display_name: &self.display_name,
            email: &self.email,
            role: self.role,
            aud: &self.aud,
            exp: self.exp,
            iat: self.iat,
        }
    }
}
