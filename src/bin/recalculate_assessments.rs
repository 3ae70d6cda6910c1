//! Recompute cached derived metrics for every stored assessment
//! Usage: cargo run --bin recalculate_assessments

use sarcopenia_intake::config::Config;
use sarcopenia_intake::db::{migrations, Database};
use sarcopenia_intake::models::Assessment;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let before = Assessment::count(conn)?;
        println!("Found {} assessments", before);

        let updated = Assessment::recalculate_all(conn)?;
        println!("Recalculated {} assessments", updated);

        for a in Assessment::list(conn, 20, 0)? {
            println!(
                "  #{}: BMI {} | stage {} | SARC-F {}",
                a.id,
                a.cached_bmi.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".into()),
                a.cached_sarcopenia_stage.map(|s| s.as_str()).unwrap_or("-"),
                a.cached_sarc_f_total.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
            );
        }

        Ok(())
    })?;

    Ok(())
}
