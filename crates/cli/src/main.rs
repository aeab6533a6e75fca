//! Fresh Market CLI - catalog, cart and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! fm-cli catalog
//!
//! # Manage the local cart
//! fm-cli cart add grocery-1 --quantity 2
//! fm-cli cart update grocery-1 5
//! fm-cli cart remove grocery-1
//! fm-cli cart show
//!
//! # Start a hosted checkout against a running storefront
//! fm-cli checkout --api-url http://127.0.0.1:3000
//!
//! # Check the result after paying
//! fm-cli status cs_test_...
//! ```
//!
//! The cart is stored under `--cart-dir` (default `.fresh-market`), in the
//! same JSON format the web client keeps in local storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "Fresh Market CLI tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true, default_value = ".fresh-market")]
    cart_dir: PathBuf,

    /// Base URL of the storefront API
    #[arg(long, global = true, default_value = "http://127.0.0.1:3000")]
    api_url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog,
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create a hosted checkout session for the cart
    Checkout,
    /// Show the payment status of a checkout session
    Status {
        /// Checkout session id (`cs_...`)
        session_id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product by id or slug
    Add {
        product: String,

        /// Size label
        #[arg(short, long, default_value = "1")]
        size: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        product: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Size label
        #[arg(short, long, default_value = "1")]
        size: String,
    },
    /// Remove a line
    Remove {
        product: String,

        /// Size label
        #[arg(short, long, default_value = "1")]
        size: String,
    },
    /// Remove every line
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &mut io::stdout().lock()).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = commands::cart::open(&cli.cart_dir);

    match cli.command {
        Commands::Catalog => commands::catalog::list(out)?,
        Commands::Cart { action } => {
            match action {
                CartAction::Show => {}
                CartAction::Add {
                    product,
                    size,
                    quantity,
                } => commands::cart::add(&mut cart, &product, &size, quantity)?,
                CartAction::Update {
                    product,
                    quantity,
                    size,
                } => commands::cart::update(&mut cart, &product, quantity, &size)?,
                CartAction::Remove { product, size } => {
                    commands::cart::remove(&mut cart, &product, &size)?;
                }
                CartAction::Clear => cart.clear(),
            }
            commands::cart::show(&cart, out)?;
        }
        Commands::Checkout => commands::checkout::start(&cli.api_url, &cart, out).await?,
        Commands::Status { session_id } => {
            commands::checkout::status(&cli.api_url, &session_id, &mut cart, out).await?;
        }
    }
    Ok(())
}
