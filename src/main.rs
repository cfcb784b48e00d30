use anyhow::Result;
use clap::{Parser, Subcommand};
use photogram_backend::api;
use photogram_backend::config::PhotogramConfig;
use photogram_backend::database::Database;
use photogram_backend::seed;
use photogram_backend::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Photogram backend daemon")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for the JSON API and static uploads
    Serve,
    /// Populate the database with a demo account and sample posts
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();

    let config = PhotogramConfig::from_env()?;
    let database = Database::connect(&config.paths)?;
    if database.ensure_migrations()? {
        tracing::info!(db = %config.paths.db_path.display(), "created database");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => api::serve_http(config, database).await,
        Command::Seed => seed::run(&database),
    }
}
