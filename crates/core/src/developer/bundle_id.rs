use serde::{Deserialize, Serialize};

/// An app ID registered with the provisioning authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleId {
    pub id: String,
    pub attributes: BundleIdAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleIdAttributes {
    pub identifier: String,
    pub name: String,
}

impl BundleId {
    pub fn new(id: impl Into<String>, identifier: impl Into<String>, name: impl Into<String>) -> Self {
        BundleId {
            id: id.into(),
            attributes: BundleIdAttributes {
                identifier: identifier.into(),
                name: name.into(),
            },
        }
    }

    pub fn identifier(&self) -> &str {
        &self.attributes.identifier
    }
}
