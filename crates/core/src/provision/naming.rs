use crate::Error;
use crate::developer::ProfileType;

/// Canonical name for profiles this engine creates, e.g.
/// `Bitrise iOS app-store - (io.bitrise.app)`.
///
/// Lookups go by this name, so it must stay stable for a given input.
pub fn profile_name(profile_type: ProfileType, bundle_id: &str) -> Result<String, Error> {
    use ProfileType::*;
    let label = match profile_type {
        IosAppDevelopment | TvosAppDevelopment => "development",
        IosAppStore | TvosAppStore => "app-store",
        IosAppAdHoc | TvosAppAdHoc => "ad-hoc",
        IosAppInHouse | TvosAppInHouse => "enterprise",
        other => return Err(Error::UnrecognizedProfileType(other.to_string())),
    };

    Ok(format!(
        "Bitrise {} {} - ({})",
        profile_type.platform().display_name(),
        label,
        bundle_id
    ))
}
