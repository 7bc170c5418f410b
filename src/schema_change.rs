//! Schema change adding representative-info columns to `Issues`.
//!
//! `apply` adds two nullable JSONB columns (`mlaInfo`, `mpInfo`) intended to
//! hold a representative's name, party, and constituency; `revert` removes
//! exactly those columns and is lossy. No existence guards beyond what
//! Postgres itself enforces: applying twice fails with "column already
//! exists", reverting an unapplied change fails with "column does not
//! exist", and both errors propagate to the invoking migration runner.

use sqlx::PgPool;

use crate::errors::{AppError, ResultExt};

const TABLE: &str = r#""Issues""#;

pub struct IssueSchemaChange {
    pool: PgPool,
}

impl IssueSchemaChange {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Adds the `mlaInfo` and `mpInfo` columns. Existing rows read back NULL.
    pub async fn apply(&self) -> Result<(), AppError> {
        tracing::info!("Adding mlaInfo/mpInfo columns to {}", TABLE);

        sqlx::query(&format!(
            r#"ALTER TABLE {} ADD COLUMN "mlaInfo" jsonb"#,
            TABLE
        ))
        .execute(&self.pool)
        .await
        .context("adding Issues.mlaInfo")?;

        sqlx::query(&format!(
            r#"COMMENT ON COLUMN {}."mlaInfo" IS 'Store MLA name, party, constituency, etc.'"#,
            TABLE
        ))
        .execute(&self.pool)
        .await
        .context("commenting Issues.mlaInfo")?;

        sqlx::query(&format!(
            r#"ALTER TABLE {} ADD COLUMN "mpInfo" jsonb"#,
            TABLE
        ))
        .execute(&self.pool)
        .await
        .context("adding Issues.mpInfo")?;

        sqlx::query(&format!(
            r#"COMMENT ON COLUMN {}."mpInfo" IS 'Store MP name, party, constituency, etc.'"#,
            TABLE
        ))
        .execute(&self.pool)
        .await
        .context("commenting Issues.mpInfo")?;

        tracing::info!("mlaInfo/mpInfo columns added");
        Ok(())
    }

    /// Drops the two columns. Any data written into them is destroyed.
    pub async fn revert(&self) -> Result<(), AppError> {
        tracing::info!("Dropping mlaInfo/mpInfo columns from {}", TABLE);

        sqlx::query(&format!(r#"ALTER TABLE {} DROP COLUMN "mlaInfo""#, TABLE))
            .execute(&self.pool)
            .await
            .context("dropping Issues.mlaInfo")?;

        sqlx::query(&format!(r#"ALTER TABLE {} DROP COLUMN "mpInfo""#, TABLE))
            .execute(&self.pool)
            .await
            .context("dropping Issues.mpInfo")?;

        tracing::info!("mlaInfo/mpInfo columns dropped");
        Ok(())
    }
}
