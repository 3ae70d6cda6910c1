//! Push pending or failed assessments to the configured remote store
//! Usage: cargo run --bin sync_assessments -- [limit]

use sarcopenia_intake::config::Config;
use sarcopenia_intake::db::{migrations, Database};
use sarcopenia_intake::tools::assessments::retry_remote_sync;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sarcopenia_intake=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let limit = std::env::args().nth(1).map(|s| s.parse::<i64>()).transpose()?;

    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = Database::new(&config.database_path)?;
    database.with_conn(migrations::run_migrations)?;

    let remote = config.remote_store()?;
    let result = retry_remote_sync(&database, remote.as_ref(), limit).await?;

    println!(
        "Attempted {}: {} synced, {} failed",
        result.attempted, result.synced, result.failed
    );
    for outcome in &result.results {
        match &outcome.error {
            Some(err) => println!("  #{} {}: {}", outcome.assessment_id, outcome.remote_status, err),
            None => println!(
                "  #{} {} {}",
                outcome.assessment_id,
                outcome.remote_status,
                outcome.remote_id.as_deref().unwrap_or("")
            ),
        }
    }

    Ok(())
}
