use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use autoprov_core::{
    BridgeCommand, Entitlements, Profile, ProfileClient, ProfileResolver, ProfileType,
    ResolutionOutcome, ResolveTarget, ResolverOptions,
};

#[derive(Debug, Args)]
#[command(arg_required_else_help = true)]
pub struct ResolveArgs {
    /// Bundle identifier the profile is for
    #[arg(short = 'b', long = "bundle-id", value_name = "BUNDLE_ID")]
    pub bundle_id: String,
    /// Profile type, e.g. IOS_APP_DEVELOPMENT
    #[arg(short = 't', long = "profile-type", value_name = "TYPE")]
    pub profile_type: ProfileType,
    /// Certificate ID the profile must include (repeatable)
    #[arg(short = 'c', long = "certificate-id", value_name = "ID", required = true)]
    pub certificate_ids: Vec<String>,
    /// Device ID the profile must include (repeatable)
    #[arg(short = 'd', long = "device-id", value_name = "ID")]
    pub device_ids: Vec<String>,
    /// Project entitlements plist
    #[arg(short = 'e', long = "entitlements", value_name = "PATH")]
    pub entitlements: Option<PathBuf>,
    /// Days of validity a reused profile must still have
    #[arg(long = "min-days", value_name = "DAYS", default_value_t = 0)]
    pub min_days: u32,
    /// Never push entitlements to the bundle ID, only check them
    #[arg(long = "no-sync")]
    pub no_sync: bool,
    /// Program that talks to the provisioning authority
    #[arg(long = "bridge", value_name = "PROGRAM")]
    pub bridge: PathBuf,
    /// Argument passed to the bridge before the operation (repeatable)
    #[arg(long = "bridge-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub bridge_args: Vec<String>,
    /// Write the profile content here
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: ResolveArgs) -> Result<()> {
    let entitlements = match &args.entitlements {
        Some(path) => Entitlements::load_with_path(path)
            .with_context(|| format!("Failed to read entitlements from {}", path.display()))?,
        None => Entitlements::new(),
    };

    let options = ResolverOptions {
        min_profile_days_valid: args.min_days,
        sync_entitlements: !args.no_sync,
        ..Default::default()
    };

    let client = ProfileClient::new(BridgeCommand::new(&args.bridge).args(&args.bridge_args));
    let resolver = ProfileResolver::new(&client, options);

    let target = ResolveTarget {
        bundle_id: args.bundle_id,
        profile_type: args.profile_type,
        certificate_ids: args.certificate_ids,
        device_ids: args.device_ids,
        entitlements,
    };

    let resolution = resolver.resolve(&target).await?;
    let attributes = resolution.profile.attributes();

    if let Some(path) = &args.output {
        tokio::fs::write(path, &attributes.profile_content)
            .await
            .with_context(|| format!("Failed to write profile to {}", path.display()))?;
        log::info!("Profile written to {}", path.display());
    }

    let (outcome, reason) = match &resolution.outcome {
        ResolutionOutcome::Reused => ("reused", None),
        ResolutionOutcome::Created => ("created", None),
        ResolutionOutcome::Regenerated { reason } => ("regenerated", Some(reason.to_string())),
    };

    let summary = json!({
        "outcome": outcome,
        "reason": reason,
        "id": resolution.profile.id(),
        "uuid": attributes.uuid,
        "name": attributes.name,
        "expiration_date": attributes.expiration_date.to_rfc3339(),
        "bundle_id": resolution.profile.bundle_identifier(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
