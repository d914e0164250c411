use anyhow::Result;
use clap::Args;

use autoprov_core::ProfileType;
use autoprov_core::provision::profile_name;

#[derive(Debug, Args)]
#[command(arg_required_else_help = true)]
pub struct NameArgs {
    /// Profile type, e.g. IOS_APP_DEVELOPMENT
    #[arg(short = 't', long = "profile-type", value_name = "TYPE")]
    pub profile_type: ProfileType,
    /// Bundle identifier
    #[arg(short = 'b', long = "bundle-id", value_name = "BUNDLE_ID")]
    pub bundle_id: String,
}

pub fn execute(args: NameArgs) -> Result<()> {
    println!("{}", profile_name(args.profile_type, &args.bundle_id)?);
    Ok(())
}
