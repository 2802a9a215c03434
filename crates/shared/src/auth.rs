//! Session claims, roles, and auth payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User roles, enforced at the application layer.
///
/// The `role` column in the database is plain text; this closed set is the
/// only accepted vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator; may manage the global species catalog.
    SuperAdmin,
    /// Institution administrator.
    OrgAdmin,
    /// Institution staff member.
    OrgEmployee,
}

impl UserRole {
    /// Returns the database/string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::OrgAdmin => "org_admin",
            Self::OrgEmployee => "org_employee",
        }
    }

    /// Returns the privilege level of a role (higher = more privileges).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::SuperAdmin => 100,
            Self::OrgAdmin => 80,
            Self::OrgEmployee => 30,
        }
    }

    /// Returns true if this role can manage the global species catalog.
    #[must_use]
    pub const fn can_manage_catalog(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns true if this role can manage institution staff accounts.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::OrgAdmin)
    }

    /// Returns true if this role can modify institution settings.
    #[must_use]
    pub const fn can_modify_institution(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::OrgAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "org_admin" => Ok(Self::OrgAdmin),
            "org_employee" => Ok(Self::OrgEmployee),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// JWT claims for session tokens.
///
/// The claim set is exactly subject, institution, and role, plus standard
/// expiry metadata. Authorization checks read these claims; they never go
/// back to the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i64,
    /// Institution ID the user belongs to.
    pub inst: i64,
    /// User's role within the institution.
    pub role: UserRole,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i64, institution_id: i64, role: UserRole, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            inst: institution_id,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.sub
    }

    /// Returns the institution ID from claims.
    #[must_use]
    pub const fn institution_id(&self) -> i64 {
        self.inst
    }
}

/// Server-side session view, re-materialized from a token on each request.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Authenticated user ID.
    pub user_id: i64,
    /// Institution the session is scoped to.
    pub institution_id: i64,
    /// Role carried by the session.
    pub role: UserRole,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
}

impl SessionView {
    /// Builds the session view from decoded claims.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            institution_id: claims.inst,
            role: claims.role,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Session token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// User display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// Role within the institution.
    pub role: UserRole,
    /// Institution the user belongs to.
    pub institution_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(UserRole::SuperAdmin, "super_admin")]
    #[case(UserRole::OrgAdmin, "org_admin")]
    #[case(UserRole::OrgEmployee, "org_employee")]
    fn test_role_round_trip(#[case] role: UserRole, #[case] s: &str) {
        assert_eq!(role.as_str(), s);
        assert_eq!(UserRole::from_str(s).unwrap(), role);
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(UserRole::from_str("owner").is_err());
        assert!(UserRole::from_str("").is_err());
    }

    #[test]
    fn test_role_levels_are_ordered() {
        assert!(UserRole::SuperAdmin.level() > UserRole::OrgAdmin.level());
        assert!(UserRole::OrgAdmin.level() > UserRole::OrgEmployee.level());
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::SuperAdmin.can_manage_catalog());
        assert!(!UserRole::OrgAdmin.can_manage_catalog());
        assert!(!UserRole::OrgEmployee.can_manage_catalog());

        assert!(UserRole::SuperAdmin.can_manage_users());
        assert!(UserRole::OrgAdmin.can_manage_users());
        assert!(!UserRole::OrgEmployee.can_manage_users());

        assert!(UserRole::OrgAdmin.can_modify_institution());
        assert!(!UserRole::OrgEmployee.can_modify_institution());
    }

    #[test]
    fn test_claims_accessors() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let claims = Claims::new(7, 3, UserRole::OrgAdmin, expires);

        assert_eq!(claims.user_id(), 7);
        assert_eq!(claims.institution_id(), 3);
        assert_eq!(claims.role, UserRole::OrgAdmin);
        assert_eq!(claims.exp, expires.timestamp());
    }

    #[test]
    fn test_session_view_from_claims() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let claims = Claims::new(7, 3, UserRole::OrgEmployee, expires);
        let view = SessionView::from_claims(&claims);

        assert_eq!(view.user_id, 7);
        assert_eq!(view.institution_id, 3);
        assert_eq!(view.role, UserRole::OrgEmployee);
        assert_eq!(view.expires_at.timestamp(), expires.timestamp());
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        let json = serde_json::to_string(&UserRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: UserRole = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UserRole::SuperAdmin);
    }
}
