mod bundle_id;
mod profile;

pub use bundle_id::{BundleId, BundleIdAttributes};
pub use profile::{Platform, Profile, ProfileAttributes, ProfileState, ProfileType};

// The portal rejects most punctuation in app ID names, so separators become spaces.
pub fn app_id_name(identifier: &str) -> String {
    let prefix = if identifier.ends_with(".*") {
        "Wildcard "
    } else {
        ""
    };

    let readable: String = identifier
        .chars()
        .map(|c| match c {
            '.' | '_' | '-' | '*' => ' ',
            c => c,
        })
        .collect();

    format!("{prefix}Bitrise {readable}").trim_end().to_string()
}
