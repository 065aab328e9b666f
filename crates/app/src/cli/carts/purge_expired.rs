use clap::Args;
use jiff::Timestamp;
use storefront_app::{
    database::{self, Db},
    domain::carts::{CartItemsRepository, PgCartItemsRepository},
};

#[derive(Debug, Args)]
pub(crate) struct PurgeExpiredArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: PurgeExpiredArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let items = PgCartItemsRepository::new(Db::new(pool));

    let purged = items
        .purge_expired(Timestamp::now())
        .await
        .map_err(|error| format!("failed to purge expired carts: {error}"))?;

    println!("purged_items: {purged}");

    Ok(())
}
