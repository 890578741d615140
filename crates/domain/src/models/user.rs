//! User domain model and role enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Represents a user account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub points_balance: i32,
    pub created_at: DateTime<Utc>,
}

/// User role. Elevated roles (administrator, operator) authenticate via
/// server-side sessions; standard users via JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Administrator,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Administrator => "administrator",
            Role::Operator => "operator",
        }
    }

    /// True for roles that must authenticate through a server session.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Administrator | Role::Operator)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Role::Standard),
            "administrator" => Ok(Role::Administrator),
            "operator" => Ok(Role::Operator),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an active server-side session for an elevated user.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Standard.as_str(), "standard");
        assert_eq!(Role::Administrator.as_str(), "administrator");
        assert_eq!(Role::Operator.as_str(), "operator");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("standard").unwrap(), Role::Standard);
        assert_eq!(Role::from_str("STANDARD").unwrap(), Role::Standard);
        assert_eq!(
            Role::from_str("administrator").unwrap(),
            Role::Administrator
        );
        assert_eq!(Role::from_str("operator").unwrap(), Role::Operator);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::Administrator), "administrator");
        assert_eq!(format!("{}", Role::Standard), "standard");
    }

    #[test]
    fn test_role_is_elevated() {
        assert!(!Role::Standard.is_elevated());
        assert!(Role::Administrator.is_elevated());
        assert!(Role::Operator.is_elevated());
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            address: None,
            role: Role::Standard,
            points_balance: 42,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("pointsBalance"));
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            "\"administrator\""
        );
        let role: Role = serde_json::from_str("\"operator\"").unwrap();
        assert_eq!(role, Role::Operator);
    }
}
