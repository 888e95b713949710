pub mod board;
pub mod commands;
pub mod snapshot;

use crate::config::Config;
use crate::database::{self, queries};
use crate::engine::{self, AttendanceError, SessionEvent, StudentRecord, Toggle, normalize_code};
use crate::utils::time::{current_datetime, room_offset};
use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use snapshot::Snapshot;
use sqlx::SqlitePool;
use std::future::Future;
use tracing::{info, warn};

/// The study room: record store plus the settings every operation needs.
#[derive(Clone)]
pub struct StudyRoom {
    pub pool: SqlitePool,
    pub config: Config,
    offset: FixedOffset,
}

impl StudyRoom {
    pub async fn open(config: Config) -> Result<Self> {
        let pool = database::create_connection(&config.database_url, config.store_timeout).await?;
        Self::new(pool, config)
    }

    pub fn new(pool: SqlitePool, config: Config) -> Result<Self> {
        let offset = room_offset(config.utc_offset_hours)?;
        Ok(Self {
            pool,
            config,
            offset,
        })
    }

    pub fn now(&self) -> NaiveDateTime {
        current_datetime(self.offset)
    }

    /// Bounds a store call by the configured timeout.
    async fn store<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T, AttendanceError> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("Store call {} failed: {:#}", operation, e);
                Err(AttendanceError::StoreUnavailable(format!("{}: {:#}", operation, e)))
            }
            Err(_) => {
                warn!(
                    "Store call {} timed out after {:?}",
                    operation, self.config.store_timeout
                );
                Err(AttendanceError::StoreUnavailable(format!(
                    "{} timed out",
                    operation
                )))
            }
        }
    }

    /// Fresh records, or the previous ones flagged stale when the store is down.
    pub async fn load_snapshot(&self, previous: Option<Snapshot>, now: NaiveDateTime) -> Snapshot {
        match self.store("load_all", queries::load_all(&self.pool)).await {
            Ok(records) => Snapshot::fresh(records, now),
            Err(e) => {
                warn!("Falling back to last known records: {}", e);
                Snapshot::fallback(previous)
            }
        }
    }

    /// Load and roll stale records over, writing them back only if something changed.
    pub async fn refresh(&self, previous: Option<Snapshot>, now: NaiveDateTime) -> Snapshot {
        let snapshot = self.load_snapshot(previous, now).await;
        let scan = engine::scan_and_rollover(&snapshot.records, now.date());
        let changed = scan.changed_records();
        let mut snapshot = Snapshot {
            records: scan.records,
            ..snapshot
        };

        if changed.is_empty() || snapshot.stale {
            return snapshot;
        }

        if self
            .store("upsert_batch", queries::upsert_batch(&self.pool, &changed))
            .await
            .is_err()
        {
            snapshot.stale = true;
        }

        snapshot
    }

    /// Explicit rollover pass; unlike `refresh` a store failure is an error.
    pub async fn rollover(&self, today: NaiveDate) -> Result<Vec<String>, AttendanceError> {
        let records = self.store("load_all", queries::load_all(&self.pool)).await?;
        let scan = engine::scan_and_rollover(&records, today);

        if scan.changed() {
            self.store(
                "upsert_batch",
                queries::upsert_batch(&self.pool, &scan.changed_records()),
            )
            .await?;
        }

        Ok(scan.rolled_over)
    }

    /// Toggle a student's session against the current store contents.
    pub async fn check(&self, code: &str, now: NaiveDateTime) -> Result<Toggle, AttendanceError> {
        let records = self.store("load_all", queries::load_all(&self.pool)).await?;
        let scan = engine::scan_and_rollover(&records, now.date());
        let toggle = engine::toggle_session(&scan.records, code, now)?;

        let mut batch: Vec<StudentRecord> = scan
            .changed_records()
            .into_iter()
            .filter(|record| record.code != toggle.record.code)
            .collect();
        batch.push(toggle.record.clone());
        self.store("upsert_batch", queries::upsert_batch(&self.pool, &batch))
            .await?;

        match &toggle.event {
            SessionEvent::ForcedClose { warning } if warning.is_integrity_warning() => {
                warn!("Data integrity problem for {}: {}", toggle.record.code, warning);
            }
            event => info!("{} ({}): {:?}", toggle.record.name, toggle.record.code, event),
        }
        Ok(toggle)
    }

    pub async fn register(
        &self,
        code: &str,
        name: &str,
        password: &str,
        today: NaiveDate,
    ) -> Result<StudentRecord, AttendanceError> {
        self.authorize(password)?;

        if self.store("exists", queries::exists(&self.pool, code)).await? {
            return Err(AttendanceError::DuplicateCode(normalize_code(code)));
        }

        let records = self.store("load_all", queries::load_all(&self.pool)).await?;
        let record = engine::register(&records, code, name, today)?;
        self.store("upsert", queries::upsert(&self.pool, &record))
            .await?;

        info!("Registered {} ({})", record.name, record.code);
        Ok(record)
    }

    pub async fn remove(&self, code: &str, password: &str) -> Result<(), AttendanceError> {
        self.authorize(password)?;

        let code = normalize_code(code);
        if !self
            .store("delete_student", queries::delete_student(&self.pool, &code))
            .await?
        {
            return Err(AttendanceError::NotFound(code));
        }

        info!("Removed student {}", code);
        Ok(())
    }

    fn authorize(&self, password: &str) -> Result<(), AttendanceError> {
        match &self.config.admin_password {
            Some(expected) if expected == password => Ok(()),
            _ => Err(AttendanceError::AdminRequired),
        }
    }
}
