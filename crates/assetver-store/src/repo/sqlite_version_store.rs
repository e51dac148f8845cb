//! SQLite version store
//!
//! One instance per asset type, each bound to that type's table. Several
//! stores may share a connection; several processes may share the file.

use std::sync::{Arc, Mutex, MutexGuard};

use assetver_core::errors::{ExError, ExErrorKind};
use assetver_core::ops::{Mutation, VersionStore};
use assetver_core::{AssetId, AssetVersion, AssetVersionType, Identity, NewAssetVersion, VersionId};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};

use crate::errors::{from_rusqlite, Result};

const COLUMNS: &str =
    "id, asset_id, version, comment, archived, created_by, created_date, payload";

/// Table holding the versions of `asset_type`
pub fn table_name(asset_type: AssetVersionType) -> &'static str {
    match asset_type {
        AssetVersionType::Cohort => "cohort_versions",
        AssetVersionType::ConceptSet => "concept_set_versions",
        AssetVersionType::Characterization => "characterization_versions",
        AssetVersionType::IncidenceRate => "ir_versions",
        AssetVersionType::Pathway => "pathway_versions",
    }
}

/// Version store over one asset type's table
pub struct SqliteVersionStore {
    asset_type: AssetVersionType,
    table: &'static str,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteVersionStore {
    /// Store for `asset_type` over a migrated connection
    pub fn new(asset_type: AssetVersionType, conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            asset_type,
            table: table_name(asset_type),
            conn,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_asset_type(self.asset_type)
                .with_message("connection lock poisoned")
        })
    }

    fn select_one(&self, conn: &Connection, id: VersionId) -> Result<Option<AssetVersion>> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = ?1", self.table);
        conn.query_row(&sql, [id.0], |row| self.map_row(row))
            .optional()
            .map_err(from_rusqlite)
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<AssetVersion> {
        let created_ms: i64 = row.get(6)?;
        let created_date = millis_to_utc(created_ms).ok_or_else(|| {
            rusqlite::Error::IntegralValueOutOfRange(6, created_ms)
        })?;
        Ok(AssetVersion {
            id: VersionId(row.get(0)?),
            asset_type: self.asset_type,
            asset_id: AssetId(row.get(1)?),
            version: row.get(2)?,
            comment: row.get(3)?,
            archived: row.get(4)?,
            created_by: Identity::new(row.get::<_, String>(5)?),
            created_date,
            payload: parse_payload(&row.get::<_, String>(7)?)?,
        })
    }
}

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Payloads are stored as JSON text; a JSON `null` is the text `null`
fn parse_payload(text: &str) -> rusqlite::Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl std::fmt::Debug for SqliteVersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVersionStore")
            .field("asset_type", &self.asset_type)
            .field("table", &self.table)
            .finish()
    }
}

impl VersionStore for SqliteVersionStore {
    fn asset_type(&self) -> AssetVersionType {
        self.asset_type
    }

    fn find_all_versions(&self, asset_id: AssetId) -> Result<Vec<AssetVersion>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE asset_id = ?1 ORDER BY version ASC",
            self.table
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let versions = stmt
            .query_map([asset_id.0], |row| self.map_row(row))
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(versions)
    }

    fn find_latest_version_number(&self, asset_id: AssetId) -> Result<Option<u32>> {
        let conn = self.lock()?;
        let sql = format!("SELECT MAX(version) FROM {} WHERE asset_id = ?1", self.table);
        conn.query_row(&sql, [asset_id.0], |row| row.get::<_, Option<u32>>(0))
            .map_err(from_rusqlite)
    }

    fn find_one(&self, id: VersionId) -> Result<Option<AssetVersion>> {
        let conn = self.lock()?;
        self.select_one(&conn, id)
    }

    fn save_new_and_flush(&self, draft: &NewAssetVersion) -> Result<VersionId> {
        let (created_by, created_date) = draft.require_stamp()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let sql = format!(
            "INSERT INTO {} (asset_id, version, comment, archived, created_by, created_date, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            self.table
        );
        tx.execute(
            &sql,
            rusqlite::params![
                draft.asset_id.0,
                draft.version,
                draft.comment,
                draft.archived,
                created_by.as_str(),
                created_date.timestamp_millis(),
                draft.payload.to_string(),
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_asset_type(self.asset_type)
                .with_asset_id(draft.asset_id)
        })?;
        let id = VersionId(tx.last_insert_rowid());
        tx.commit().map_err(from_rusqlite)?;
        Ok(id)
    }

    fn modify(&self, id: VersionId, mutation: Mutation<'_>) -> Result<Option<AssetVersion>> {
        let mut conn = self.lock()?;
        // IMMEDIATE takes the write lock before the read, so no other
        // process can change the row between check and write
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let Some(mut version) = self.select_one(&tx, id)? else {
            return Ok(None);
        };
        mutation(&mut version)?;

        let sql = format!(
            "UPDATE {} SET comment = ?1, archived = ?2 WHERE id = ?3",
            self.table
        );
        tx.execute(&sql, rusqlite::params![version.comment, version.archived, id.0])
            .map_err(from_rusqlite)?;
        tx.commit().map_err(from_rusqlite)?;

        // Only comment and archived are writable
        self.select_one(&conn, id)
    }
}
