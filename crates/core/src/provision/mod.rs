mod entitlements;
mod expiry;
mod mobileprovision;
mod naming;
mod resolver;

pub use entitlements::{
    Entitlements, ICLOUD_CONTAINER_IDENTIFIERS, missing_containers, missing_values,
};
pub use expiry::{is_expired_at, is_profile_expired};
pub use mobileprovision::MobileProvision;
pub use naming::profile_name;
pub use resolver::{
    Mismatch, ProfileResolver, ProvisioningClient, Resolution, ResolutionOutcome, ResolveTarget,
};
