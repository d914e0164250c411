/// Settings for profile resolution.
#[derive(Clone, Debug)]
pub struct ResolverOptions {
    /// Days of validity a reused profile must still have. Zero accepts any
    /// profile that has not expired yet.
    pub min_profile_days_valid: u32,
    /// Push project entitlements to the bundle ID when they are out of sync.
    pub sync_entitlements: bool,
    /// Require every target device in development and ad-hoc profiles.
    pub check_devices: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            min_profile_days_valid: 0,
            sync_entitlements: true,
            check_devices: true,
        }
    }
}
