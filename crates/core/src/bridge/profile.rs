use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::developer::{BundleId, Platform, Profile, ProfileAttributes, ProfileState};

/// Profile record as printed by the bridge.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProfileInfo {
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub status: ProfileState,
    pub expiry: DateTime<Utc>,
    pub platform: Platform,
    pub content: String,
    pub app_id: String,
    pub bundle_id: String,
    #[serde(default)]
    pub certificates: Vec<String>,
    #[serde(default)]
    pub devices: Vec<String>,
}

/// App ID record as printed by the bridge.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AppInfo {
    pub id: String,
    #[serde(rename = "bundleID")]
    pub bundle_id: String,
    pub name: String,
}

impl From<AppInfo> for BundleId {
    fn from(app: AppInfo) -> Self {
        BundleId::new(app.id, app.bundle_id, app.name)
    }
}

/// A profile decoded from a bridge response.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeProfile {
    attributes: ProfileAttributes,
    id: String,
    app_id: String,
    bundle_id: String,
    certificate_ids: HashSet<String>,
    device_ids: HashSet<String>,
}

impl BridgeProfile {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn bundle_identifier(&self) -> &str {
        &self.bundle_id
    }
}

impl TryFrom<ProfileInfo> for BridgeProfile {
    type Error = Error;

    fn try_from(info: ProfileInfo) -> Result<Self, Self::Error> {
        let content = BASE64
            .decode(info.content.trim())
            .map_err(|e| Error::ProfileContent(format!("failed to decode profile contents: {e}")))?;

        Ok(BridgeProfile {
            attributes: ProfileAttributes {
                name: info.name,
                uuid: info.uuid,
                profile_state: info.status,
                profile_content: content,
                platform: info.platform,
                expiration_date: info.expiry,
            },
            id: info.id,
            app_id: info.app_id,
            bundle_id: info.bundle_id,
            certificate_ids: info.certificates.into_iter().collect(),
            device_ids: info.devices.into_iter().collect(),
        })
    }
}

impl Profile for BridgeProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> &ProfileAttributes {
        &self.attributes
    }

    fn certificate_ids(&self) -> Result<HashSet<String>, Error> {
        Ok(self.certificate_ids.clone())
    }

    fn device_ids(&self) -> Result<HashSet<String>, Error> {
        Ok(self.device_ids.clone())
    }

    // The record carries no app ID name, so the profile name stands in.
    fn bundle_id(&self) -> Result<BundleId, Error> {
        Ok(BundleId::new(
            self.app_id.clone(),
            self.bundle_id.clone(),
            self.attributes.name.clone(),
        ))
    }
}
