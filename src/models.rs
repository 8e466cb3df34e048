use serde::{Deserialize, Serialize};

// Store keys
pub const SUPPORTERS_LIST_KEY: &str = "supporters:list";
pub const SUPPORTERS_SET_KEY: &str = "supporters:set";

// Supporter as stored in the list, serialized to a JSON string
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SupporterEntry {
    pub name: String,
    #[serde(default)]
    pub ts: i64, // milliseconds since epoch
}

impl SupporterEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ts: chrono::Utc::now().timestamp_millis(),
        }
    }

    // String form pushed onto the list
    pub fn encode(&self) -> String {
        serde_json::json!({ "name": self.name, "ts": self.ts }).to_string()
    }
}

// Response body for both GET and a successful POST
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SupportersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    pub supporters: Vec<String>,
}

impl SupportersResponse {
    pub fn listing(supporters: Vec<String>) -> Self {
        Self {
            ok: None,
            supporters,
        }
    }

    pub fn registered(supporters: Vec<String>) -> Self {
        Self {
            ok: Some(true),
            supporters,
        }
    }
}

// Only the part of a stored value that is shown to clients
#[derive(Deserialize)]
struct StoredName {
    name: String,
}

/// Project stored list values to display names. Values without a string
/// `name` member are shown as-is; other members are not inspected.
pub fn project_names(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|value| match serde_json::from_str::<StoredName>(&value) {
            Ok(entry) => entry.name,
            Err(_) => value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_entry_names() {
        let raw = vec![
            r#"{"name":"Jane Doe","ts":1700000000000}"#.to_string(),
            r#"{"name":"John"}"#.to_string(),
        ];
        assert_eq!(project_names(raw), vec!["Jane Doe", "John"]);
    }

    #[test]
    fn ignores_malformed_timestamp() {
        let raw = vec![r#"{"name":"Ann","ts":"soon"}"#.to_string()];
        assert_eq!(project_names(raw), vec!["Ann"]);
    }

    #[test]
    fn falls_back_to_raw_value() {
        let raw = vec!["legacy-name".to_string(), r#"{"ts":5}"#.to_string()];
        assert_eq!(project_names(raw), vec!["legacy-name", r#"{"ts":5}"#]);
    }

    #[test]
    fn listing_omits_ok() {
        let body = serde_json::to_value(SupportersResponse::listing(vec!["a".into()])).unwrap();
        assert_eq!(body, serde_json::json!({ "supporters": ["a"] }));
    }

    #[test]
    fn registered_sets_ok() {
        let body = serde_json::to_value(SupportersResponse::registered(vec![])).unwrap();
        assert_eq!(body, serde_json::json!({ "ok": true, "supporters": [] }));
    }

    #[test]
    fn entry_serializes_name_and_ts() {
        let entry = SupporterEntry { name: "Jane".into(), ts: 42 };
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"{"name":"Jane","ts":42}"#);
    }

    #[test]
    fn encoded_entry_projects_back_to_name() {
        let entry = SupporterEntry::new("Jane Doe");
        assert!(entry.ts > 0);
        assert_eq!(project_names(vec![entry.encode()]), vec!["Jane Doe"]);
    }
}
