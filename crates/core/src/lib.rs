pub mod bridge;
pub mod developer;
pub mod options;
pub mod provision;

pub use bridge::{BridgeCommand, BridgeProfile, BridgeRequest, ProfileClient, Transport};
pub use developer::{BundleId, Platform, Profile, ProfileAttributes, ProfileState, ProfileType};
pub use options::ResolverOptions;
pub use provision::{
    Entitlements, ProfileResolver, ProvisioningClient, Resolution, ResolutionOutcome,
    ResolveTarget,
};

use thiserror::Error as ThisError;
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Unrecognized profile type: {0}")]
    UnrecognizedProfileType(String),
    #[error("Unrecognized platform: {0}")]
    UnrecognizedPlatform(String),
    #[error("Malformed entitlement value for {key}: {reason}")]
    MalformedEntitlement { key: String, reason: String },
    #[error("Profile creation requires at least one certificate ID")]
    NoCertificates,
    #[error("Invalid profile content: {0}")]
    ProfileContent(String),
    #[error("Provisioning command {operation} failed ({status}): {output}")]
    CommandFailed {
        operation: String,
        status: String,
        output: String,
    },
    #[error("Provisioning command {operation} returned no response: {output}")]
    MissingResponse { operation: String, output: String },
    #[error("Provisioning authority rejected {operation}: {message}")]
    Authority { operation: String, message: String },
    #[error("Failed to decode {operation} response: {source} ({output})")]
    Decode {
        operation: String,
        output: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl Error {
    /// True when the authority answered and refused the request, as opposed to
    /// the bridge itself failing to run or to produce a readable response.
    pub fn is_authority_rejection(&self) -> bool {
        matches!(self, Error::Authority { .. })
    }
}
