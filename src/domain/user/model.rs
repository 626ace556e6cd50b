use chrono::{DateTime, Utc};
use serde::Serialize;

/// User model
///
/// `password` always holds `<salt>.<hash>`, never the plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_omits_password() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            password: "0011223344556677.abcdef".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password").is_none());
    }
}
