use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::provision::MobileProvision;

use super::BundleId;

/// Profile types as named by the provisioning authority.
///
/// The macOS variants exist so that authority responses naming them decode,
/// but the engine only provisions the iOS and tvOS types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    IosAppDevelopment,
    IosAppStore,
    #[serde(rename = "IOS_APP_ADHOC")]
    IosAppAdHoc,
    #[serde(rename = "IOS_APP_INHOUSE")]
    IosAppInHouse,
    TvosAppDevelopment,
    TvosAppStore,
    #[serde(rename = "TVOS_APP_ADHOC")]
    TvosAppAdHoc,
    #[serde(rename = "TVOS_APP_INHOUSE")]
    TvosAppInHouse,
    MacAppDevelopment,
    MacAppStore,
    MacAppDirect,
}

impl ProfileType {
    pub const ALL: [ProfileType; 11] = [
        ProfileType::IosAppDevelopment,
        ProfileType::IosAppStore,
        ProfileType::IosAppAdHoc,
        ProfileType::IosAppInHouse,
        ProfileType::TvosAppDevelopment,
        ProfileType::TvosAppStore,
        ProfileType::TvosAppAdHoc,
        ProfileType::TvosAppInHouse,
        ProfileType::MacAppDevelopment,
        ProfileType::MacAppStore,
        ProfileType::MacAppDirect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::IosAppDevelopment => "IOS_APP_DEVELOPMENT",
            ProfileType::IosAppStore => "IOS_APP_STORE",
            ProfileType::IosAppAdHoc => "IOS_APP_ADHOC",
            ProfileType::IosAppInHouse => "IOS_APP_INHOUSE",
            ProfileType::TvosAppDevelopment => "TVOS_APP_DEVELOPMENT",
            ProfileType::TvosAppStore => "TVOS_APP_STORE",
            ProfileType::TvosAppAdHoc => "TVOS_APP_ADHOC",
            ProfileType::TvosAppInHouse => "TVOS_APP_INHOUSE",
            ProfileType::MacAppDevelopment => "MAC_APP_DEVELOPMENT",
            ProfileType::MacAppStore => "MAC_APP_STORE",
            ProfileType::MacAppDirect => "MAC_APP_DIRECT",
        }
    }

    pub fn platform(&self) -> Platform {
        use ProfileType::*;
        match self {
            IosAppDevelopment | IosAppStore | IosAppAdHoc | IosAppInHouse => Platform::Ios,
            TvosAppDevelopment | TvosAppStore | TvosAppAdHoc | TvosAppInHouse => Platform::TvOs,
            MacAppDevelopment | MacAppStore | MacAppDirect => Platform::MacOs,
        }
    }

    /// Development and ad-hoc profiles embed the devices they may run on.
    pub fn distributes_to_devices(&self) -> bool {
        use ProfileType::*;
        matches!(
            self,
            IosAppDevelopment | IosAppAdHoc | TvosAppDevelopment | TvosAppAdHoc | MacAppDevelopment
        )
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnrecognizedProfileType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "IOS", alias = "ios")]
    Ios,
    #[serde(rename = "TVOS", alias = "tvos")]
    TvOs,
    #[serde(rename = "MAC_OS", alias = "mac", alias = "macos")]
    MacOs,
}

impl Platform {
    /// Name used in human-readable profile names.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::TvOs => "tvOS",
            Platform::MacOs => "macOS",
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IOS" | "ios" => Ok(Platform::Ios),
            "TVOS" | "tvos" => Ok(Platform::TvOs),
            "MAC_OS" | "mac" | "macos" => Ok(Platform::MacOs),
            other => Err(Error::UnrecognizedPlatform(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileState {
    #[serde(rename = "ACTIVE", alias = "Active", alias = "active")]
    Active,
    #[serde(rename = "INVALID", alias = "Invalid", alias = "invalid")]
    Invalid,
    #[serde(rename = "EXPIRED", alias = "Expired", alias = "expired")]
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAttributes {
    pub name: String,
    pub uuid: String,
    pub profile_state: ProfileState,
    pub profile_content: Vec<u8>,
    pub platform: Platform,
    pub expiration_date: DateTime<Utc>,
}

impl ProfileAttributes {
    /// Parses the signed profile blob.
    pub fn mobile_provision(&self) -> Result<MobileProvision, Error> {
        MobileProvision::load_with_bytes(&self.profile_content)
    }
}

/// A provisioning profile as seen by resolution logic, regardless of which
/// client produced it.
pub trait Profile {
    fn id(&self) -> &str;
    fn attributes(&self) -> &ProfileAttributes;
    fn certificate_ids(&self) -> Result<HashSet<String>, Error>;
    fn device_ids(&self) -> Result<HashSet<String>, Error>;
    fn bundle_id(&self) -> Result<BundleId, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_type_round_trips_wire_names() {
        for t in ProfileType::ALL {
            assert_eq!(t.as_str().parse::<ProfileType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn unknown_profile_type_is_rejected() {
        let err = "unknown".parse::<ProfileType>().unwrap_err();
        assert!(matches!(err, Error::UnrecognizedProfileType(ref s) if s == "unknown"));
        assert!(serde_json::from_str::<ProfileType>("\"IOS_APP_WHATEVER\"").is_err());
    }

    #[test]
    fn device_bound_types() {
        assert!(ProfileType::IosAppDevelopment.distributes_to_devices());
        assert!(ProfileType::TvosAppAdHoc.distributes_to_devices());
        assert!(!ProfileType::IosAppStore.distributes_to_devices());
        assert!(!ProfileType::IosAppInHouse.distributes_to_devices());
    }

    #[test]
    fn platform_accepts_portal_spellings() {
        assert_eq!(serde_json::from_str::<Platform>("\"ios\"").unwrap(), Platform::Ios);
        assert_eq!(serde_json::from_str::<Platform>("\"TVOS\"").unwrap(), Platform::TvOs);
        assert_eq!(serde_json::from_str::<Platform>("\"mac\"").unwrap(), Platform::MacOs);
        assert!("watchos".parse::<Platform>().is_err());
    }
}
