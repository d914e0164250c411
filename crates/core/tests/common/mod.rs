#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use autoprov_core::{BridgeRequest, Error, Transport};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Value, json};

pub const BUNDLE_ID: &str = "io.bitrise.app";
pub const DEV_PROFILE_NAME: &str = "Bitrise iOS development - (io.bitrise.app)";
pub const CONTAINER_KEY: &str = "com.apple.developer.icloud-container-identifiers";

/// Answers bridge requests from queued outputs and records every request.
#[derive(Default)]
pub struct CannedTransport {
    outputs: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    requests: Mutex<Vec<BridgeRequest>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, operation: &str, output: impl Into<String>) -> Self {
        self.push(operation, Ok(output.into()))
    }

    pub fn respond_json(self, operation: &str, value: Value) -> Self {
        self.respond(operation, value.to_string())
    }

    /// Queues a non-zero exit for `operation`.
    pub fn fail(self, operation: &str, output: impl Into<String>) -> Self {
        self.push(operation, Err(output.into()))
    }

    fn push(self, operation: &str, output: Result<String, String>) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(output);
        self
    }

    pub fn requests(&self) -> Vec<BridgeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.operation().to_string())
            .collect()
    }
}

impl Transport for CannedTransport {
    async fn send(&self, request: &BridgeRequest) -> Result<String, Error> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self
            .outputs
            .lock()
            .unwrap()
            .get_mut(request.operation())
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(output)) => Ok(output),
            Some(Err(output)) => Err(Error::CommandFailed {
                operation: request.operation().to_string(),
                status: "exit status: 1".to_string(),
                output,
            }),
            None => Err(Error::CommandFailed {
                operation: request.operation().to_string(),
                status: "unexpected".to_string(),
                output: format!("no canned response for {}", request.operation()),
            }),
        }
    }
}

/// A signed-profile stand-in: junk around an XML plist.
pub fn profile_content(containers: &[&str], expiry: DateTime<Utc>) -> Vec<u8> {
    let containers: String = containers
        .iter()
        .map(|c| format!("<string>{c}</string>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>ExpirationDate</key>
    <date>{}</date>
    <key>Entitlements</key>
    <dict>
        <key>application-identifier</key>
        <string>ABCDE12345.io.bitrise.app</string>
        <key>{CONTAINER_KEY}</key>
        <array>{containers}</array>
    </dict>
</dict>
</plist>"#,
        expiry.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let mut data = vec![0x30, 0x82, 0x0b, 0x00];
    data.extend_from_slice(xml.as_bytes());
    data.extend_from_slice(&[0x31, 0x82, 0x01]);
    data
}

pub struct ProfileRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub status: &'static str,
    pub expiry: DateTime<Utc>,
    pub containers: Vec<&'static str>,
    pub certificates: Vec<&'static str>,
    pub devices: Vec<&'static str>,
}

impl ProfileRecord {
    pub fn valid(id: &'static str) -> Self {
        ProfileRecord {
            id,
            name: DEV_PROFILE_NAME,
            status: "ACTIVE",
            expiry: Utc::now() + Duration::days(300),
            containers: vec![],
            certificates: vec!["CERT1"],
            devices: vec!["DEV1"],
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "uuid": format!("uuid-{}", self.id),
            "name": self.name,
            "status": self.status,
            "expiry": self.expiry.to_rfc3339_opts(SecondsFormat::Secs, true),
            "platform": "IOS",
            "content": BASE64.encode(profile_content(&self.containers, self.expiry)),
            "app_id": "APP1",
            "bundle_id": BUNDLE_ID,
            "certificates": self.certificates,
            "devices": self.devices,
        })
    }
}

pub fn app_json(id: &str) -> Value {
    json!({ "id": id, "bundleID": BUNDLE_ID, "name": "Bitrise io bitrise app" })
}

pub fn listing(records: Vec<Value>) -> Value {
    json!({ "data": records })
}

pub fn single(record: Value) -> Value {
    json!({ "data": record })
}
