use std::collections::HashSet;
use std::fmt;

use crate::Error;
use crate::developer::{BundleId, Profile, ProfileState, ProfileType};
use crate::options::ResolverOptions;

use super::{Entitlements, is_profile_expired, missing_containers, profile_name};

/// Remote operations resolution needs from the provisioning authority.
#[allow(async_fn_in_trait)]
pub trait ProvisioningClient {
    type Profile: Profile;

    /// `Ok(None)` when nothing matches.
    async fn find_profile(
        &self,
        name: &str,
        profile_type: ProfileType,
    ) -> Result<Option<Self::Profile>, Error>;

    async fn create_profile(
        &self,
        name: &str,
        profile_type: ProfileType,
        bundle_id: &BundleId,
        certificate_ids: &[String],
        device_ids: &[String],
    ) -> Result<Self::Profile, Error>;

    async fn delete_profile(&self, id: &str) -> Result<(), Error>;

    /// `Ok(None)` when nothing matches.
    async fn find_bundle_id(&self, identifier: &str) -> Result<Option<BundleId>, Error>;

    async fn create_bundle_id(&self, identifier: &str) -> Result<BundleId, Error>;

    /// Validates without changing anything remotely.
    async fn check_bundle_id_entitlements(
        &self,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
    ) -> Result<(), Error>;

    async fn sync_bundle_id_entitlements(
        &self,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
    ) -> Result<(), Error>;
}

/// What the resolved profile has to satisfy.
#[derive(Clone, Debug)]
pub struct ResolveTarget {
    pub bundle_id: String,
    pub profile_type: ProfileType,
    pub certificate_ids: Vec<String>,
    pub device_ids: Vec<String>,
    pub entitlements: Entitlements,
}

/// Why an existing profile could not be reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// The authority no longer considers the profile active.
    InvalidState(ProfileState),
    Expired,
    EntitlementsIncomplete { missing: Vec<String> },
    CertificatesMissing { missing: Vec<String> },
    DevicesMissing { missing: Vec<String> },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::InvalidState(state) => write!(f, "profile state is {state:?}"),
            Mismatch::Expired => write!(f, "profile expired or expires too soon"),
            Mismatch::EntitlementsIncomplete { missing } => {
                write!(f, "containers missing: {}", missing.join(", "))
            }
            Mismatch::CertificatesMissing { missing } => {
                write!(f, "certificates missing: {}", missing.join(", "))
            }
            Mismatch::DevicesMissing { missing } => {
                write!(f, "devices missing: {}", missing.join(", "))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The existing profile was valid; nothing was changed remotely.
    Reused,
    /// No profile existed, a new one was created.
    Created,
    /// The existing profile was deleted and created again.
    Regenerated { reason: Mismatch },
}

#[derive(Debug)]
pub struct Resolution<P> {
    pub profile: P,
    pub outcome: ResolutionOutcome,
}

pub struct ProfileResolver<'a, C> {
    client: &'a C,
    options: ResolverOptions,
}

impl<'a, C: ProvisioningClient> ProfileResolver<'a, C> {
    pub fn new(client: &'a C, options: ResolverOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Finds the canonical profile for `target`, repairing or recreating
    /// remote state as needed. Stops at the first failing remote call.
    pub async fn resolve(&self, target: &ResolveTarget) -> Result<Resolution<C::Profile>, Error> {
        if target.certificate_ids.is_empty() {
            return Err(Error::NoCertificates);
        }

        let name = profile_name(target.profile_type, &target.bundle_id)?;
        log::info!("Looking for {} profile {:?}", target.profile_type, name);

        let mismatch = match self.client.find_profile(&name, target.profile_type).await? {
            Some(profile) => match self.check_profile(&profile, target)? {
                None => {
                    log::info!("Reusing profile {} ({})", profile.id(), name);
                    return Ok(Resolution {
                        profile,
                        outcome: ResolutionOutcome::Reused,
                    });
                }
                Some(reason) => {
                    log::warn!("Profile {} is not usable: {}, regenerating", profile.id(), reason);
                    self.client.delete_profile(profile.id()).await?;
                    Some(reason)
                }
            },
            None => {
                log::info!("Profile {:?} not found", name);
                None
            }
        };

        let (bundle_id, created) = self.ensure_bundle_id(&target.bundle_id).await?;
        let needs_sync =
            created || matches!(mismatch, Some(Mismatch::EntitlementsIncomplete { .. }));
        self.ensure_entitlements(&bundle_id, &target.entitlements, needs_sync)
            .await?;

        log::info!("Creating profile {:?}", name);
        let profile = self
            .client
            .create_profile(
                &name,
                target.profile_type,
                &bundle_id,
                &target.certificate_ids,
                &target.device_ids,
            )
            .await?;

        let outcome = match mismatch {
            Some(reason) => ResolutionOutcome::Regenerated { reason },
            None => ResolutionOutcome::Created,
        };

        Ok(Resolution { profile, outcome })
    }

    /// `Ok(None)` when the profile can be reused as is.
    pub fn check_profile<P: Profile + ?Sized>(
        &self,
        profile: &P,
        target: &ResolveTarget,
    ) -> Result<Option<Mismatch>, Error> {
        let state = profile.attributes().profile_state;
        if state != ProfileState::Active {
            return Ok(Some(Mismatch::InvalidState(state)));
        }

        if is_profile_expired(profile, self.options.min_profile_days_valid) {
            return Ok(Some(Mismatch::Expired));
        }

        let provision = profile.attributes().mobile_provision()?;
        if let Some(missing) = missing_containers(&target.entitlements, provision.entitlements())? {
            return Ok(Some(Mismatch::EntitlementsIncomplete { missing }));
        }

        let missing = not_in(&target.certificate_ids, &profile.certificate_ids()?);
        if !missing.is_empty() {
            return Ok(Some(Mismatch::CertificatesMissing { missing }));
        }

        if self.options.check_devices && target.profile_type.distributes_to_devices() {
            let missing = not_in(&target.device_ids, &profile.device_ids()?);
            if !missing.is_empty() {
                return Ok(Some(Mismatch::DevicesMissing { missing }));
            }
        }

        Ok(None)
    }

    async fn ensure_bundle_id(&self, identifier: &str) -> Result<(BundleId, bool), Error> {
        if let Some(bundle_id) = self.client.find_bundle_id(identifier).await? {
            Ok((bundle_id, false))
        } else {
            log::info!("Registering bundle ID {}", identifier);
            Ok((self.client.create_bundle_id(identifier).await?, true))
        }
    }

    async fn ensure_entitlements(
        &self,
        bundle_id: &BundleId,
        entitlements: &Entitlements,
        needs_sync: bool,
    ) -> Result<(), Error> {
        if needs_sync && self.options.sync_entitlements {
            log::info!("Syncing entitlements of {}", bundle_id.identifier());
            return self
                .client
                .sync_bundle_id_entitlements(bundle_id, entitlements)
                .await;
        }

        match self
            .client
            .check_bundle_id_entitlements(bundle_id, entitlements)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_authority_rejection() && self.options.sync_entitlements => {
                log::warn!(
                    "Entitlements of {} are out of sync ({}), syncing",
                    bundle_id.identifier(),
                    e
                );
                self.client
                    .sync_bundle_id_entitlements(bundle_id, entitlements)
                    .await
            }
            Err(e) => Err(e),
        }
    }
}

fn not_in(wanted: &[String], present: &HashSet<String>) -> Vec<String> {
    wanted
        .iter()
        .filter(|id| !present.contains(*id))
        .cloned()
        .collect()
}
