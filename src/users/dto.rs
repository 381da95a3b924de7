use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::User;

/// Request body for user registration.
///
/// Absent and `null` fields decode to empty values and are then rejected by
/// field validation with a field-specific message. Only bodies that are not
/// JSON, or carry a field of the wrong type, fail to decode.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: i32,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Option::unwrap_or_default)
}

/// Raw query pairs for user lookup. Repeated keys are kept so the first
/// `id` wins, and the value stays a string so a missing or malformed id is
/// reported as a validation error.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct LookupQuery(pub Vec<(String, String)>);

impl LookupQuery {
    pub fn id(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.as_str())
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Response returned after a successful registration.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            age: u.age,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 42,
            email: "ann@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            name: "Ann".into(),
            age: 30,
            created_at: datetime!(2024-05-01 12:30:00 UTC),
        }
    }

    #[test]
    fn user_response_omits_password_hash_and_formats_timestamp() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["created_at"], "2024-05-01T12:30:00Z");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn missing_and_null_fields_decode_to_empty_values() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":null,"name":"Ann"}"#).unwrap();
        assert_eq!(req.email, "");
        assert_eq!(req.password, "");
        assert_eq!(req.name, "Ann");
        assert_eq!(req.age, 0);
    }

    #[test]
    fn wrongly_typed_field_still_fails_to_decode() {
        assert!(serde_json::from_str::<RegisterRequest>(r#"{"age":"30"}"#).is_err());
    }

    #[test]
    fn lookup_query_takes_first_id() {
        let q = LookupQuery(vec![
            ("other".into(), "x".into()),
            ("id".into(), "1".into()),
            ("id".into(), "2".into()),
        ]);
        assert_eq!(q.id(), Some("1"));
        assert_eq!(LookupQuery(Vec::new()).id(), None);
    }

    #[test]
    fn created_response_is_flat() {
        let body = CreatedUserResponse {
            user: sample_user().into(),
            message: "User created successfully",
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["email"], "ann@example.com");
        assert_eq!(json["message"], "User created successfully");
        assert!(json.get("user").is_none());
    }
}
