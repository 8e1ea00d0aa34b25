use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Roles granted to a stored role name. Admins also hold the user role;
    /// unknown names fall back to a plain user.
    pub fn grants_for(stored: &str) -> Vec<Role> {
        match Role::try_from(stored) {
            Ok(Role::Admin) => vec![Role::Admin, Role::User],
            _ => vec![Role::User],
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// Marker for routes restricted by `AuthRoleGuard`.
pub trait RequiredRole {
    fn permits(user: &CurrentUser) -> bool;
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn permits(user: &CurrentUser) -> bool {
        user.is_admin()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
    pub roles: Vec<Role>,
}

/// The authenticated caller of a request, as resolved by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|held| held == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::Admin)
    }
}

#[derive(Debug)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}
