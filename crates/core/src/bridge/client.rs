use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::Error;
use crate::developer::{BundleId, ProfileType, app_id_name};
use crate::provision::{Entitlements, ProvisioningClient};

use super::{
    AppInfo, BUNDLE_ID_ARG, BUNDLE_ID_LISTING, BUNDLE_ID_NAME_ARG, BridgeProfile, BridgeRequest,
    CERTIFICATE_ID_ARG, ENTITLEMENTS_ARG, ID_ARG, PROFILE_LISTING, PROFILE_NAME_ARG,
    PROFILE_TYPE_ARG, ProfileInfo, Transport, first_match,
};

const RESPONSE_LINE_REGEX: &str = r"(?m)^\{.*\}\r?$";

#[derive(Deserialize)]
struct DataResponse<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Provisioning operations carried over the command bridge.
pub struct ProfileClient<T> {
    transport: T,
}

impl<T: Transport> ProfileClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` and returns its JSON response line.
    pub async fn send_request(&self, request: BridgeRequest) -> Result<String, Error> {
        log::debug!(
            "Bridge request {}: {:?}",
            request.operation(),
            request.redacted()
        );

        let output = self.transport.send(&request).await?;

        log::debug!("Bridge response from {}: {}", request.operation(), output.trim());

        extract_response(request.operation(), &output)
    }

    async fn request_data<R: DeserializeOwned>(&self, request: BridgeRequest) -> Result<R, Error> {
        let operation = request.operation().to_string();
        let response = self.send_request(request).await?;

        serde_json::from_str::<DataResponse<R>>(&response)
            .map(|r| r.data)
            .map_err(|source| Error::Decode {
                operation,
                output: response,
                source,
            })
    }

    async fn bundle_id_request(
        &self,
        operation: &str,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
    ) -> Result<(), Error> {
        let request = BridgeRequest::new(operation)
            .arg(BUNDLE_ID_ARG, bundle_id.identifier())
            .arg(ENTITLEMENTS_ARG, entitlements.to_argument()?);

        self.send_request(request).await?;

        Ok(())
    }
}

impl<T: Transport> ProvisioningClient for ProfileClient<T> {
    type Profile = BridgeProfile;

    async fn find_profile(
        &self,
        name: &str,
        profile_type: ProfileType,
    ) -> Result<Option<BridgeProfile>, Error> {
        let request = BridgeRequest::new("list_profiles")
            .arg(PROFILE_NAME_ARG, name)
            .arg(PROFILE_TYPE_ARG, profile_type.as_str());

        let profiles: Vec<ProfileInfo> = self.request_data(request).await?;

        first_match("profile", profiles, PROFILE_LISTING)
            .map(BridgeProfile::try_from)
            .transpose()
    }

    async fn create_profile(
        &self,
        name: &str,
        profile_type: ProfileType,
        bundle_id: &BundleId,
        certificate_ids: &[String],
        _device_ids: &[String],
    ) -> Result<BridgeProfile, Error> {
        // A profile binds to one certificate. Device IDs are not sent, the
        // bridge adds every enabled device of the team itself.
        let certificate_id = certificate_ids.first().ok_or(Error::NoCertificates)?;

        let request = BridgeRequest::new("create_profile")
            .arg(BUNDLE_ID_ARG, bundle_id.identifier())
            .arg(CERTIFICATE_ID_ARG, certificate_id.as_str())
            .arg(PROFILE_NAME_ARG, name)
            .arg(PROFILE_TYPE_ARG, profile_type.as_str());

        let profile: ProfileInfo = self.request_data(request).await?;

        BridgeProfile::try_from(profile)
    }

    async fn delete_profile(&self, id: &str) -> Result<(), Error> {
        let request = BridgeRequest::new("delete_profile").arg(ID_ARG, id);

        self.send_request(request).await?;

        Ok(())
    }

    async fn find_bundle_id(&self, identifier: &str) -> Result<Option<BundleId>, Error> {
        let request = BridgeRequest::new("get_app").arg(BUNDLE_ID_ARG, identifier);

        let apps: Vec<AppInfo> = self.request_data(request).await?;

        Ok(first_match("bundle ID", apps, BUNDLE_ID_LISTING).map(BundleId::from))
    }

    async fn create_bundle_id(&self, identifier: &str) -> Result<BundleId, Error> {
        let request = BridgeRequest::new("create_app")
            .arg(BUNDLE_ID_ARG, identifier)
            .arg(BUNDLE_ID_NAME_ARG, app_id_name(identifier));

        let app: AppInfo = self.request_data(request).await?;

        Ok(app.into())
    }

    async fn check_bundle_id_entitlements(
        &self,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
    ) -> Result<(), Error> {
        self.bundle_id_request("check_bundleid", bundle_id, entitlements)
            .await
    }

    async fn sync_bundle_id_entitlements(
        &self,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
    ) -> Result<(), Error> {
        self.bundle_id_request("sync_bundleid", bundle_id, entitlements)
            .await
    }
}

/// Finds the response in bridge output, which may carry log lines around it.
///
/// The last line that is a JSON object is the response. An `{"error": …}`
/// response becomes [`Error::Authority`].
pub fn extract_response(operation: &str, output: &str) -> Result<String, Error> {
    let line = last_json_line(output).ok_or_else(|| Error::MissingResponse {
        operation: operation.to_string(),
        output: output.trim().to_string(),
    })?;

    let envelope: ErrorResponse =
        serde_json::from_str(line).map_err(|source| Error::Decode {
            operation: operation.to_string(),
            output: output.trim().to_string(),
            source,
        })?;

    match envelope.error {
        Some(message) if !message.is_empty() => Err(Error::Authority {
            operation: operation.to_string(),
            message,
        }),
        _ => Ok(line.to_string()),
    }
}

fn last_json_line(output: &str) -> Option<&str> {
    let re = regex::Regex::new(RESPONSE_LINE_REGEX).ok()?;
    re.find_iter(output).last().map(|m| m.as_str().trim_end_matches('\r'))
}
