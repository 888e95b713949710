use crate::database::models::{RecordColumns, StoredCode, StoredRow};
use crate::engine::record::{StudentRecord, normalize_code};
use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

const SELECT_STUDENTS: &str = r#"
    SELECT code,
           typeof(code) AS code_type,
           CAST(name AS TEXT) AS name,
           CAST(daily_seconds AS REAL) AS daily_seconds,
           CAST(monthly_seconds AS REAL) AS monthly_seconds,
           CAST(is_active AS INTEGER) AS is_active,
           CAST(start_time AS TEXT) AS start_time,
           CAST(last_update AS TEXT) AS last_update
    FROM students
    ORDER BY rowid ASC
"#;

const UPSERT_STUDENT: &str = r#"
    INSERT INTO students (code, name, daily_seconds, monthly_seconds, is_active, start_time, last_update)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(code) DO UPDATE SET
        name = excluded.name,
        daily_seconds = excluded.daily_seconds,
        monthly_seconds = excluded.monthly_seconds,
        is_active = excluded.is_active,
        start_time = excluded.start_time,
        last_update = excluded.last_update,
        updated_at = CURRENT_TIMESTAMP
"#;

/// Every student in registration order.
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<StudentRecord>> {
    let rows = sqlx::query(SELECT_STUDENTS)
        .fetch_all(pool)
        .await
        .context("failed to load students")?;

    let mut records: Vec<StudentRecord> = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let record = stored_row(row)?.into_record();
        // 正規化後に同じコードになる行は最初の1件だけ使う
        if records.iter().any(|kept| kept.code == record.code) {
            tracing::warn!(
                "Ignoring duplicate row for student code {} ({}); remove it from the store",
                record.code,
                record.name
            );
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

fn stored_row(row: &SqliteRow) -> Result<StoredRow> {
    let code_type: String = row.try_get("code_type")?;
    let code = match code_type.as_str() {
        "integer" => StoredCode::Integer(row.try_get("code")?),
        "real" => StoredCode::Real(row.try_get("code")?),
        _ => StoredCode::Text(row.try_get("code")?),
    };

    Ok(StoredRow {
        code,
        name: row.try_get("name")?,
        daily_seconds: row.try_get("daily_seconds")?,
        monthly_seconds: row.try_get("monthly_seconds")?,
        is_active: row.try_get("is_active")?,
        start_time: row.try_get("start_time")?,
        last_update: row.try_get("last_update")?,
    })
}

pub async fn exists(pool: &SqlitePool, code: &str) -> Result<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE code = ?)")
        .bind(normalize_code(code))
        .fetch_one(pool)
        .await?;

    Ok(found != 0)
}

pub async fn upsert(pool: &SqlitePool, record: &StudentRecord) -> Result<()> {
    let mut tx = pool.begin().await?;
    upsert_in(&mut tx, record).await?;
    tx.commit().await?;

    Ok(())
}

/// Writes all records in one transaction: either every row lands or none does.
pub async fn upsert_batch(pool: &SqlitePool, records: &[StudentRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for record in records {
        upsert_in(&mut tx, record)
            .await
            .with_context(|| format!("failed to save student {}", record.code))?;
    }
    tx.commit().await?;

    Ok(())
}

async fn upsert_in(tx: &mut Transaction<'_, Sqlite>, record: &StudentRecord) -> Result<()> {
    let columns = RecordColumns::from(record);

    sqlx::query(UPSERT_STUDENT)
        .bind(columns.code)
        .bind(columns.name)
        .bind(columns.daily_seconds)
        .bind(columns.monthly_seconds)
        .bind(columns.is_active)
        .bind(columns.start_time)
        .bind(columns.last_update)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Returns false when no such student existed.
pub async fn delete_student(pool: &SqlitePool, code: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM students WHERE code = ?")
        .bind(normalize_code(code))
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::engine::record::{SessionStart, SessionState};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[tokio::test]
    async fn upsert_then_load_returns_same_record() {
        let pool = create_memory_pool().await.unwrap();
        let mut record = StudentRecord::new("1001".into(), "Mina".into(), today());
        record.daily_seconds = 125;
        record.start(today().and_hms_micro_opt(9, 0, 0, 123_456).unwrap());

        upsert(&pool, &record).await.unwrap();
        let loaded = load_all(&pool).await.unwrap();

        assert_eq!(loaded, vec![record]);
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_row() {
        let pool = create_memory_pool().await.unwrap();
        let mut record = StudentRecord::new("1001".into(), "Mina".into(), today());
        upsert(&pool, &record).await.unwrap();

        record.daily_seconds = 900;
        upsert(&pool, &record).await.unwrap();

        let loaded = load_all(&pool).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].daily_seconds, 900);
    }

    #[tokio::test]
    async fn batch_keeps_registration_order() {
        let pool = create_memory_pool().await.unwrap();
        let records = vec![
            StudentRecord::new("3".into(), "C".into(), today()),
            StudentRecord::new("1".into(), "A".into(), today()),
            StudentRecord::new("2".into(), "B".into(), today()),
        ];
        upsert_batch(&pool, &records).await.unwrap();

        let codes: Vec<_> = load_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let pool = create_memory_pool().await.unwrap();
        upsert(&pool, &StudentRecord::new("77".into(), "Lee".into(), today()))
            .await
            .unwrap();

        assert!(exists(&pool, "77").await.unwrap());
        assert!(exists(&pool, "77.0").await.unwrap());
        assert!(!exists(&pool, "78").await.unwrap());

        assert!(delete_student(&pool, "77").await.unwrap());
        assert!(!delete_student(&pool, "77").await.unwrap());
        assert!(load_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn codes_colliding_after_normalization_load_once() {
        let pool = create_memory_pool().await.unwrap();
        let mut first = StudentRecord::new("1234".into(), "Mina".into(), today());
        first.daily_seconds = 60;
        upsert(&pool, &first).await.unwrap();

        // imported after the connection was opened, so the migration never saw it
        sqlx::query("INSERT INTO students (code, name, last_update) VALUES (?, ?, ?)")
            .bind("1234.0")
            .bind("Imported")
            .bind("2025-03-14")
            .execute(&pool)
            .await
            .unwrap();

        let loaded = load_all(&pool).await.unwrap();
        assert_eq!(loaded, vec![first]);
    }

    #[tokio::test]
    async fn loose_rows_are_normalized_on_load() {
        let pool = create_memory_pool().await.unwrap();
        sqlx::query(
            "INSERT INTO students (code, name, daily_seconds, monthly_seconds, is_active, start_time, last_update)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(4321.0_f64)
        .bind("Park")
        .bind("12.7")
        .bind("oops")
        .bind(1_i64)
        .bind("not a time")
        .bind("2025-03-13")
        .execute(&pool)
        .await
        .unwrap();

        let loaded = load_all(&pool).await.unwrap();
        let record = &loaded[0];
        assert_eq!(record.code, "4321");
        assert_eq!(record.daily_seconds, 12);
        assert_eq!(record.monthly_seconds, 0);
        assert_eq!(
            record.session,
            SessionState::Studying {
                start: SessionStart::Corrupt("not a time".into())
            }
        );
        assert_eq!(record.last_update, NaiveDate::from_ymd_opt(2025, 3, 13));
    }
}
