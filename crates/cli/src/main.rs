//! Garuda Dhruvam CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (content tables and session store)
//! gd-cli migrate
//!
//! # Create an admin user (password read from ADMIN_PASSWORD)
//! ADMIN_PASSWORD=... gd-cli admin create -e admin@example.org -n "Admin Name" -r super_admin
//!
//! # Deactivate an admin user
//! gd-cli admin deactivate -e admin@example.org
//!
//! # Insert default website content where a section has none
//! gd-cli seed content
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` / `admin deactivate` - Manage admin users
//! - `seed content` - Seed default website content

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "gd-cli")]
#[command(author, version, about = "Garuda Dhruvam Foundation CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `editor`)
        #[arg(short, long, default_value = "editor")]
        role: String,

        /// Initial password
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Deactivate an admin user; their sessions end on the next request
    Deactivate {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert default website content for sections that have none
    Content,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::admin::create_user(&email, &name, &role, &SecretString::from(password))
                    .await?;
            }
            AdminAction::Deactivate { email } => {
                commands::admin::deactivate_user(&email).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Content => commands::seed::content().await?,
        },
    }
    Ok(())
}
