use chrono::{DateTime, Duration, Utc};

use crate::developer::Profile;

/// A profile counts as expired once fewer than `min_profile_days_valid` days
/// of validity remain. Zero means strictly expired.
pub fn is_profile_expired<P: Profile + ?Sized>(profile: &P, min_profile_days_valid: u32) -> bool {
    is_expired_at(
        profile.attributes().expiration_date,
        Utc::now(),
        min_profile_days_valid,
    )
}

pub fn is_expired_at(
    expiration: DateTime<Utc>,
    now: DateTime<Utc>,
    min_profile_days_valid: u32,
) -> bool {
    // A window past the representable range can never be satisfied.
    now.checked_add_signed(Duration::days(i64::from(min_profile_days_valid)))
        .map_or(true, |limit| expiration < limit)
}
