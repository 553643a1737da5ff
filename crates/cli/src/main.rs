//! Duka CLI - Catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! duka products list
//!
//! # Show one product
//! duka products show 7
//!
//! # Create a product
//! duka products add --name "Jiko" --price 3500 --category Kitchen
//!
//! # Delete a product
//! duka products delete 7
//!
//! # Create every product listed in a YAML file
//! duka seed fixtures/products.yaml
//! ```
//!
//! The backend location comes from `CATALOG_API_URL` (default
//! `http://localhost:3000`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use duka_core::{Price, ProductId};

mod commands;

use commands::products::NewProduct;

#[derive(Parser)]
#[command(name = "duka")]
#[command(author, version, about = "Duka catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products through the REST API
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Create every product listed in a YAML file
    Seed {
        /// Path to a YAML list of products
        file: String,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product id
        id: String,
    },
    /// Create a product
    Add {
        #[arg(short, long)]
        name: String,

        /// Non-negative price, e.g. 1200 or 99.50
        #[arg(short, long)]
        price: Price,

        #[arg(short, long, default_value = "")]
        category: String,

        #[arg(short, long, default_value = "")]
        brand: String,

        #[arg(long, default_value = "")]
        image_url: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
            ProductsAction::Show { id } => commands::products::show(&ProductId::new(id)).await?,
            ProductsAction::Add {
                name,
                price,
                category,
                brand,
                image_url,
                description,
            } => {
                commands::products::add(NewProduct {
                    name,
                    category,
                    brand,
                    image_url,
                    description,
                    price,
                })
                .await?;
            }
            ProductsAction::Delete { id } => {
                commands::products::delete(&ProductId::new(id)).await?;
            }
        },
        Commands::Seed { file } => commands::seed::products(&file).await?,
    }
    Ok(())
}
