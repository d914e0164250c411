use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

pub const ICLOUD_CONTAINER_IDENTIFIERS: &str = "com.apple.developer.icloud-container-identifiers";

/// An entitlement document: capability key to arbitrary value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entitlements(Map<String, Value>);

impl Entitlements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plist(dict: &plist::Dictionary) -> Result<Self, Error> {
        match serde_json::to_value(dict)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_with_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let dict: plist::Dictionary = plist::from_file(path)?;
        Self::from_plist(&dict)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Reads `key` as a list of strings; a missing key reads as empty.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, Error> {
        match self.0.get(key) {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                Error::MalformedEntitlement {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    /// Compact JSON, base64 encoded, so the document travels as one argument.
    pub fn to_argument(&self) -> Result<String, Error> {
        let json = serde_json::to_vec(&self.0)?;
        Ok(BASE64.encode(json))
    }
}

impl From<Map<String, Value>> for Entitlements {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Values listed under `key` in the project but absent from the profile, in
/// project order. `None` means nothing is missing.
pub fn missing_values(
    key: &str,
    project: &Entitlements,
    profile: &Entitlements,
) -> Result<Option<Vec<String>>, Error> {
    let wanted = project.string_list(key)?;
    let granted = profile.string_list(key)?;

    let missing: Vec<String> = wanted
        .into_iter()
        .filter(|value| !granted.contains(value))
        .collect();

    if missing.is_empty() {
        Ok(None)
    } else {
        Ok(Some(missing))
    }
}

pub fn missing_containers(
    project: &Entitlements,
    profile: &Entitlements,
) -> Result<Option<Vec<String>>, Error> {
    missing_values(ICLOUD_CONTAINER_IDENTIFIERS, project, profile)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ents(value: Value) -> Entitlements {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn equal_without_container() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: [] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: [] }));
        assert_eq!(missing_containers(&project, &profile).unwrap(), None);
    }

    #[test]
    fn equal_with_container() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        assert_eq!(missing_containers(&project, &profile).unwrap(), None);
    }

    #[test]
    fn profile_has_more_containers() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: [] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        assert_eq!(missing_containers(&project, &profile).unwrap(), None);
    }

    #[test]
    fn project_has_more_containers() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: [] }));
        assert_eq!(
            missing_containers(&project, &profile).unwrap(),
            Some(vec!["container1".to_string()])
        );
    }

    #[test]
    fn profile_without_container_key() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        let profile = ents(json!({ "otherentitlement": "" }));
        assert_eq!(
            missing_containers(&project, &profile).unwrap(),
            Some(vec!["container1".to_string()])
        );

        let empty = Entitlements::new();
        assert_eq!(
            missing_containers(&project, &empty).unwrap(),
            Some(vec!["container1".to_string()])
        );
    }

    #[test]
    fn keeps_project_order() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["c", "a", "b", "d"] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["b"] }));
        assert_eq!(
            missing_containers(&project, &profile).unwrap(),
            Some(vec!["c".to_string(), "a".to_string(), "d".to_string()])
        );
    }

    #[test]
    fn malformed_project_value() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: "break" }));
        let err = missing_containers(&project, &Entitlements::new()).unwrap_err();
        assert!(
            matches!(err, Error::MalformedEntitlement { ref key, .. } if key == ICLOUD_CONTAINER_IDENTIFIERS)
        );
    }

    #[test]
    fn malformed_profile_value() {
        let project = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: ["container1"] }));
        let profile = ents(json!({ ICLOUD_CONTAINER_IDENTIFIERS: [1, 2] }));
        assert!(missing_containers(&project, &profile).is_err());
    }

    #[test]
    fn other_keys_use_the_same_diff() {
        let key = "com.apple.security.application-groups";
        let project = ents(json!({ key: ["group.a", "group.b"] }));
        let profile = ents(json!({ key: ["group.a"] }));
        assert_eq!(
            missing_values(key, &project, &profile).unwrap(),
            Some(vec!["group.b".to_string()])
        );
    }

    #[test]
    fn argument_is_base64_json() {
        let document = ents(json!({ "aps-environment": "production" }));
        let decoded = BASE64.decode(document.to_argument().unwrap()).unwrap();
        assert_eq!(decoded, br#"{"aps-environment":"production"}"#);
    }

    #[test]
    fn converts_plist_dictionary() {
        let mut dict = plist::Dictionary::new();
        dict.insert(
            ICLOUD_CONTAINER_IDENTIFIERS.to_string(),
            plist::Value::Array(vec![plist::Value::String("iCloud.io.bitrise".into())]),
        );
        dict.insert("get-task-allow".to_string(), plist::Value::Boolean(true));

        let ents = Entitlements::from_plist(&dict).unwrap();
        assert_eq!(
            ents.string_list(ICLOUD_CONTAINER_IDENTIFIERS).unwrap(),
            vec!["iCloud.io.bitrise".to_string()]
        );
        assert_eq!(ents.get("get-task-allow"), Some(&Value::Bool(true)));
    }
}
