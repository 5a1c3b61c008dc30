use serde::Serialize;
use sqlx::FromRow;

/// A registered account as held by a credential store.
///
/// Only the bcrypt digest of the password is kept; it is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
    }
}
