use clap::{Args, Subcommand};

mod purge_expired;

#[derive(Debug, Args)]
pub(crate) struct CartsCommand {
    #[command(subcommand)]
    command: CartsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartsSubcommand {
    /// Delete cart lines past their expiry
    PurgeExpired(purge_expired::PurgeExpiredArgs),
}

pub(crate) async fn run(command: CartsCommand) -> Result<(), String> {
    match command.command {
        CartsSubcommand::PurgeExpired(args) => purge_expired::run(args).await,
    }
}
