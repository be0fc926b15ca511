//! Authenticated user

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    /// Backend subject identifier
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Profile payload as sent; the identifier may arrive as `id`, `sub` or both
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    role: Role,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .or(record.sub.filter(|sub| !sub.is_empty()))
            .ok_or_else(|| "user has neither `id` nor `sub`".to_string())?;

        Ok(Self {
            id,
            email: record.email,
            name: record.name,
            avatar: record.avatar,
            role: record.role,
        })
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_sub() {
        let user: User = serde_json::from_str(
            r#"{"sub":"u1","email":"a@b.c","name":"Ada","role":"admin"}"#,
        )
        .unwrap();

        assert_eq!(user.id, "u1");
        assert!(user.is_admin());
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_unknown_role_is_user() {
        let user: User =
            serde_json::from_str(r#"{"id":"u2","name":"Bo","role":"moderator"}"#).unwrap();
        assert_eq!(user.role, Role::User);

        let user: User = serde_json::from_str(r#"{"id":"u3"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_id_and_sub_together() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","sub":"google-123","email":"a@b.c","name":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");

        let user: User = serde_json::from_str(r#"{"id":"","sub":"u4"}"#).unwrap();
        assert_eq!(user.id, "u4");
    }

    #[test]
    fn test_missing_identifier_rejected() {
        assert!(serde_json::from_str::<User>(r#"{"name":"Ada"}"#).is_err());
    }
}
