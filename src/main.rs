//! Sarcopenia Intake Manager
//!
//! An MCP server for sarcopenia risk assessment intake.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use sarcopenia_intake::build_info;
use sarcopenia_intake::config::Config;
use sarcopenia_intake::db::{self, Database};
use sarcopenia_intake::mcp::SarcService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sarcopenia_intake=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    build_info::print_startup_banner(config.remote.as_ref().map(|r| r.url.as_str()));
    eprintln!("Starting MCP server on stdio...");

    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let remote = config.remote_store()?;
    if remote.is_enabled() {
        tracing::info!(store = remote.name(), "remote assessment store enabled");
    } else {
        tracing::info!("no remote store configured, assessments are kept locally only");
    }

    let service = SarcService::new(db_path, database, remote);

    // Create stdio transport
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
