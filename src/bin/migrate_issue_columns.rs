use dotenvy::dotenv;
use std::env;

use civic_location::db::Database;
use civic_location::schema_change::IssueSchemaChange;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let direction = env::args().nth(1).unwrap_or_else(|| "up".to_string());
    if direction != "up" && direction != "down" {
        anyhow::bail!("Usage: migrate_issue_columns [up|down], got '{}'", direction);
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let db = Database::new(&database_url).await?;

    let change = IssueSchemaChange::new(db.pool.clone());

    match direction.as_str() {
        "up" => {
            tracing::info!("Applying Issues mlaInfo/mpInfo schema change...");
            change.apply().await?;
            tracing::info!("Schema change applied.");
        }
        "down" => {
            tracing::info!("Reverting Issues mlaInfo/mpInfo schema change (lossy)...");
            change.revert().await?;
            tracing::info!("Schema change reverted.");
        }
        _ => unreachable!(),
    }

    Ok(())
}
