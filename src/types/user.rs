use serde::{Deserialize, Serialize};

pub(crate) type UserId = serde_json::Value;

/// User record as returned by the backend. Only the fields the session layer
/// reads are typed; everything else rides along untouched.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) id: UserId,
    pub(crate) user_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) worker_type: Option<String>,
    #[serde(flatten)]
    pub(crate) extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_are_preserved() {
        let value = json!({
            "id": 42,
            "userType": "WORKER",
            "workerType": "MECHANIC",
            "email": "mechanic@garage.test",
            "profile": { "name": "Ana" }
        });

        let user: User = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(user.user_type, "WORKER");
        assert_eq!(user.worker_type.as_deref(), Some("MECHANIC"));
        assert_eq!(user.extra["email"], "mechanic@garage.test");
        assert_eq!(serde_json::to_value(&user).unwrap(), value);
    }

    #[test]
    fn test_worker_type_is_optional() {
        let user: User =
            serde_json::from_value(json!({ "id": "u-1", "userType": "CLIENT" })).unwrap();

        assert!(user.worker_type.is_none());
        assert!(user.extra.is_empty());
    }
}
