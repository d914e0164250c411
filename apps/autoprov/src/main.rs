mod commands;

use clap::Parser;
use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args).await?,
        Commands::Name(args) => commands::name::execute(args)?,
    }

    Ok(())
}
