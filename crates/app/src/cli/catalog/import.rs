use std::{fs, path::PathBuf};

use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::catalog::{
        CatalogService, CatalogServiceError, PgCatalogService, models::NewProduct,
    },
};

#[derive(Debug, Args)]
pub(crate) struct ImportArgs {
    /// Path to a JSON array of products
    #[arg(long)]
    file: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Fail on products that already exist instead of skipping them
    #[arg(long)]
    strict: bool,
}

pub(crate) async fn run(args: ImportArgs) -> Result<(), String> {
    let contents = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let products: Vec<NewProduct> = serde_json::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.file.display()))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCatalogService::new(Db::new(pool));

    let mut imported = 0_usize;
    let mut skipped = 0_usize;

    for product in products {
        let id = product.id.clone();

        match service.create_product(product).await {
            Ok(product) => {
                imported += 1;
                println!("imported: {} ({} variants)", product.id, product.variants.len());
            }
            Err(CatalogServiceError::AlreadyExists) if !args.strict => {
                skipped += 1;
                println!("skipped: {id} (already exists)");
            }
            Err(error) => return Err(format!("failed to import {id}: {error}")),
        }
    }

    println!("imported_products: {imported}");
    println!("skipped_products: {skipped}");

    Ok(())
}
