use std::time::SystemTime;

use chrono::{DateTime, Utc};
use plist::{Dictionary, Value};

use crate::Error;

use super::Entitlements;

const TEAM_ID_REGEX: &str = r"^[A-Z0-9]{10}\.";

/// The plist payload of a signed `.mobileprovision` blob.
#[derive(Clone, Debug)]
pub struct MobileProvision {
    plist: Dictionary,
    entitlements: Entitlements,
}

impl MobileProvision {
    pub fn load_with_bytes(data: &[u8]) -> Result<Self, Error> {
        let plist = Self::extract_plist(data)?;
        let entitlements = plist
            .get("Entitlements")
            .and_then(Value::as_dictionary)
            .ok_or_else(|| Error::ProfileContent("missing Entitlements".into()))?;
        let entitlements = Entitlements::from_plist(entitlements)?;

        Ok(Self {
            plist,
            entitlements,
        })
    }

    pub fn entitlements(&self) -> &Entitlements {
        &self.entitlements
    }

    pub fn name(&self) -> Option<&str> {
        self.plist.get("Name").and_then(Value::as_string)
    }

    pub fn uuid(&self) -> Option<&str> {
        self.plist.get("UUID").and_then(Value::as_string)
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        let date = self.plist.get("ExpirationDate").and_then(Value::as_date)?;
        Some(DateTime::<Utc>::from(SystemTime::from(date)))
    }

    pub fn team_identifier(&self) -> Option<&str> {
        self.entitlements
            .get("com.apple.developer.team-identifier")
            .and_then(|v| v.as_str())
    }

    /// `application-identifier` without its team prefix.
    pub fn bundle_id(&self) -> Option<String> {
        let app_id = self
            .entitlements
            .get("application-identifier")?
            .as_str()?;

        let re = regex::Regex::new(TEAM_ID_REGEX).ok()?;
        let bundle_id = re.replace(app_id, "").to_string();

        Some(bundle_id)
    }

    // The CMS envelope is not verified, only the embedded XML plist is read.
    fn extract_plist(data: &[u8]) -> Result<Dictionary, Error> {
        let start = data
            .windows(6)
            .position(|w| w == b"<plist")
            .ok_or_else(|| Error::ProfileContent("no plist payload".into()))?;
        let end = data
            .windows(8)
            .rposition(|w| w == b"</plist>")
            .ok_or_else(|| Error::ProfileContent("unterminated plist payload".into()))?
            + 8;
        if end <= start {
            return Err(Error::ProfileContent("unterminated plist payload".into()));
        }

        let plist = Value::from_reader_xml(&data[start..end])?;
        plist
            .into_dictionary()
            .ok_or_else(|| Error::ProfileContent("plist payload is not a dictionary".into()))
    }
}
