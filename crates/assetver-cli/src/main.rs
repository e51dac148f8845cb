//! assetver CLI
//!
//! Command-line interface over the asset versioning engine

use std::path::PathBuf;
use std::sync::Arc;

use assetver_core::logging_facility;
use assetver_core::{StaticIdentityProvider, VersionService, VersioningConfig};
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "assetver")]
#[command(about = "assetver - Versioning of research assets", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overriding the configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Identity the request acts as
    #[arg(long, global = true, default_value = "anonymous")]
    user: String,

    /// Grant the acting identity admin privilege
    #[arg(long, global = true)]
    admin: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all versions of an asset
    List(commands::list::ListArgs),
    /// Create the next version of an asset
    Create(commands::create::CreateArgs),
    /// Show one version by id
    Get(commands::get::GetArgs),
    /// Show the latest version of an asset
    Latest(commands::get::LatestArgs),
    /// Replace the comment and archived flag of a version
    Update(commands::update::UpdateArgs),
    /// Archive (soft delete) a version
    Archive(commands::archive::ArchiveArgs),
}

fn open(global: GlobalArgs) -> Result<VersionService, Box<dyn std::error::Error>> {
    let mut config = VersioningConfig::load(global.config.as_deref())?;
    if let Some(db) = global.db {
        config = config.with_db_path(db);
    }
    logging_facility::init(config.logging.profile);

    let identity = if global.admin {
        StaticIdentityProvider::admin(global.user)
    } else {
        StaticIdentityProvider::new(global.user)
    };
    Ok(assetver_engine::open_service(&config, Arc::new(identity))?)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let service = open(cli.global)?;

    match cli.command {
        Commands::List(args) => commands::list::execute(args, &service),
        Commands::Create(args) => commands::create::execute(args, &service),
        Commands::Get(args) => commands::get::execute(args, &service),
        Commands::Latest(args) => commands::get::execute_latest(args, &service),
        Commands::Update(args) => commands::update::execute(args, &service),
        Commands::Archive(args) => commands::archive::execute(args, &service),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
