use clap::{Parser, Subcommand};

pub mod name;
pub mod resolve;

#[derive(Debug, Parser)]
#[command(
    name = "autoprov",
    author,
    version,
    about = "Find, repair or create provisioning profiles through a command bridge",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the profile for a bundle ID, creating or regenerating it if needed
    Resolve(resolve::ResolveArgs),
    /// Print the managed profile name for a bundle ID
    Name(name::NameArgs),
}
