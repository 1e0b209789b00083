use crate::error::ApiResult;
use crate::http::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

const PROFILE_PATH: &str = "/person/me";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
}

/// Profile as returned by the server; fields beyond the names are kept as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Profile calls. Bodies are returned untouched, envelope included.
#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self) -> ApiResult<JsonValue> {
        Ok(self.client.get(PROFILE_PATH).await?.body)
    }

    /// Only the name fields are sent
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<JsonValue> {
        Ok(self.client.put(PROFILE_PATH, update).await?.body)
    }

    /// Profile object out of a `get_profile` body, whether wrapped or bare
    pub fn profile_from_body(body: &JsonValue) -> Option<UserProfile> {
        ["user", "person", "data"]
            .iter()
            .find_map(|key| body.get(*key))
            .unwrap_or(body)
            .as_object()
            .and_then(|obj| serde_json::from_value(JsonValue::Object(obj.clone())).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_wrapped_body() {
        let body = json!({"success": true, "user": {"first_name": "Ada", "last_name": "Lovelace", "role": "admin"}});

        let profile = UserService::profile_from_body(&body).unwrap();

        assert_eq!(profile.display_name(), "Ada Lovelace");
        assert_eq!(profile.extra["role"], "admin");
    }

    #[test]
    fn test_profile_from_bare_body() {
        let body = json!({"first_name": "Grace", "email": "grace@example.com"});

        let profile = UserService::profile_from_body(&body).unwrap();

        assert_eq!(profile.display_name(), "Grace");
        assert_eq!(profile.email.as_deref(), Some("grace@example.com"));
        assert!(UserService::profile_from_body(&JsonValue::Null).is_none());
    }
}
