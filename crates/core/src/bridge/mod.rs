mod client;
mod policy;
mod profile;
mod transport;

pub use client::{ProfileClient, extract_response};
pub use policy::{BUNDLE_ID_LISTING, DuplicatePolicy, PROFILE_LISTING, first_match};
pub use profile::{AppInfo, BridgeProfile, ProfileInfo};
pub use transport::{BridgeCommand, BridgeRequest, Transport};

pub const PROFILE_NAME_ARG: &str = "--profile-name";
pub const PROFILE_TYPE_ARG: &str = "--profile-type";
pub const CERTIFICATE_ID_ARG: &str = "--certificate-id";
pub const BUNDLE_ID_ARG: &str = "--bundle-id";
pub const BUNDLE_ID_NAME_ARG: &str = "--bundle-id-name";
pub const ENTITLEMENTS_ARG: &str = "--entitlements";
pub const ID_ARG: &str = "--id";
