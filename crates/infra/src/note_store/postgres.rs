//! Postgres-backed note store.
//!
//! Each trait method is a single statement (or RETURNING insert), so the
//! store's atomicity guarantee falls out of per-statement transaction
//! semantics. Tenant isolation is enforced in every WHERE clause, and soft
//! delete is a `deleted_at` timestamp that all reads and mutations exclude.
//!
//! The `NoteStore` trait is synchronous while sqlx is async; calls bridge
//! onto the pool with `block_in_place` + `Handle::block_on`, which requires
//! running inside a multi-threaded tokio runtime (the axum server and the
//! consumer workers both satisfy this). See `schema.sql` next to this crate
//! for the table definition.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use scribe_core::{CharacterId, NoteId, TenantId};

use super::{NewNote, NoteRecord, NoteStore, NoteUpdate, StoreError};

const SELECT_COLUMNS: &str = "id, tenant_id, character_id, sender_id, message, flag, \
     timestamp, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PostgresNoteStore {
    pool: Arc<PgPool>,
}

impl PostgresNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn run<T>(&self, fut: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            StoreError::Backend(
                "PostgresNoteStore requires a tokio runtime (multi-threaded)".to_string(),
            )
        })?;
        tokio::task::block_in_place(|| handle.block_on(fut))
    }

    #[instrument(skip(self, note), fields(tenant_id = %tenant_id))]
    async fn insert(&self, tenant_id: TenantId, note: NewNote) -> Result<NoteRecord, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO notes (tenant_id, character_id, sender_id, message, flag, timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(note.character_id.as_u32()))
        .bind(i64::from(note.sender_id.as_u32()))
        .bind(&note.message)
        .bind(i16::from(note.flag))
        .bind(note.timestamp)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        record_from_row(&row)
    }

    #[instrument(skip(self, update), fields(tenant_id = %tenant_id, id = %id))]
    async fn replace(
        &self,
        tenant_id: TenantId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE notes \
             SET character_id = $3, sender_id = $4, message = $5, flag = $6, \
                 timestamp = COALESCE($7, timestamp), updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(id.as_u32()))
        .bind(i64::from(update.character_id.as_u32()))
        .bind(i64::from(update.sender_id.as_u32()))
        .bind(&update.message)
        .bind(i16::from(update.flag))
        .bind(update.timestamp)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn fetch_by_id(
        &self,
        tenant_id: TenantId,
        id: NoteId,
    ) -> Result<NoteRecord, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM notes \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL"
        ))
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(id.as_u32()))
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("get_by_id", e))?
        .ok_or(StoreError::NotFound)?;

        record_from_row(&row)
    }

    async fn fetch_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<Vec<NoteRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM notes \
             WHERE tenant_id = $1 AND character_id = $2 AND deleted_at IS NULL \
             ORDER BY id"
        ))
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(character_id.as_u32()))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("list_by_character", e))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn fetch_all(&self, tenant_id: TenantId) -> Result<Vec<NoteRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM notes \
             WHERE tenant_id = $1 AND deleted_at IS NULL \
             ORDER BY id"
        ))
        .bind(*tenant_id.as_uuid())
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id, id = %id))]
    async fn remove_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET deleted_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(id.as_u32()))
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id, character_id = %character_id))]
    async fn remove_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET deleted_at = now() \
             WHERE tenant_id = $1 AND character_id = $2 AND deleted_at IS NULL",
        )
        .bind(*tenant_id.as_uuid())
        .bind(i64::from(character_id.as_u32()))
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error("delete_by_character", e))?;

        Ok(result.rows_affected())
    }
}

impl NoteStore for PostgresNoteStore {
    fn create(&self, tenant_id: TenantId, note: NewNote) -> Result<NoteRecord, StoreError> {
        self.run(self.insert(tenant_id, note))
    }

    fn update(
        &self,
        tenant_id: TenantId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<(), StoreError> {
        self.run(self.replace(tenant_id, id, update))
    }

    fn get_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<NoteRecord, StoreError> {
        self.run(self.fetch_by_id(tenant_id, id))
    }

    fn list_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<Vec<NoteRecord>, StoreError> {
        self.run(self.fetch_by_character(tenant_id, character_id))
    }

    fn list_all(&self, tenant_id: TenantId) -> Result<Vec<NoteRecord>, StoreError> {
        self.run(self.fetch_all(tenant_id))
    }

    fn delete_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<(), StoreError> {
        self.run(self.remove_by_id(tenant_id, id))
    }

    fn delete_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<u64, StoreError> {
        self.run(self.remove_by_character(tenant_id, character_id))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            // 23xxx = integrity constraint violation class.
            match db_err.code().as_deref() {
                Some(code) if code.starts_with("23") => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn record_from_row(row: &PgRow) -> Result<NoteRecord, StoreError> {
    fn decode(operation: &str, err: impl core::fmt::Display) -> StoreError {
        StoreError::Backend(format!("row decode failed for {operation}: {err}"))
    }

    fn u32_col(row: &PgRow, column: &str) -> Result<u32, StoreError> {
        let value: i64 = row.try_get(column).map_err(|e| decode(column, e))?;
        u32::try_from(value).map_err(|e| decode(column, e))
    }

    let tenant: Uuid = row.try_get("tenant_id").map_err(|e| decode("tenant_id", e))?;
    let flag: i16 = row.try_get("flag").map_err(|e| decode("flag", e))?;
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(|e| decode("timestamp", e))?;
    let created_at: DateTime<Utc> =
        row.try_get("created_at").map_err(|e| decode("created_at", e))?;
    let updated_at: DateTime<Utc> =
        row.try_get("updated_at").map_err(|e| decode("updated_at", e))?;
    let deleted_at: Option<DateTime<Utc>> =
        row.try_get("deleted_at").map_err(|e| decode("deleted_at", e))?;

    Ok(NoteRecord {
        id: NoteId::new(u32_col(row, "id")?),
        tenant_id: TenantId::from_uuid(tenant),
        character_id: CharacterId::new(u32_col(row, "character_id")?),
        sender_id: CharacterId::new(u32_col(row, "sender_id")?),
        message: row.try_get("message").map_err(|e| decode("message", e))?,
        flag: u8::try_from(flag).map_err(|e| decode("flag", e))?,
        timestamp,
        created_at,
        updated_at,
        deleted_at,
    })
}
