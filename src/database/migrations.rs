use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    create_students_table(pool).await?;
    normalize_stored_codes(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_students_table(pool: &SqlitePool) -> Result<()> {
    // Counter and date columns keep loose affinity so imported rows load as-is.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            code TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            daily_seconds INTEGER NOT NULL DEFAULT 0,
            monthly_seconds INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 0,
            start_time TEXT,
            last_update TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Rewrite float-rendered codes like `1234.0` to `1234` so upserts hit the same row.
async fn normalize_stored_codes(pool: &SqlitePool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET code = substr(code, 1, length(code) - 2)
        WHERE code GLOB '[0-9]*.0'
          AND substr(code, 1, length(code) - 2) NOT GLOB '*[^0-9]*'
          AND NOT EXISTS (
              SELECT 1 FROM students AS other
              WHERE other.code = substr(students.code, 1, length(students.code) - 2)
          )
        "#,
    )
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        info!("Normalized {} float-rendered student code(s)", result.rows_affected());
    }

    Ok(())
}
