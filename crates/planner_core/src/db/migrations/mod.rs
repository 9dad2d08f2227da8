//! Key-value store schema migrations.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - All pending migrations run inside one transaction.
//! - A store at the latest version always has the `kv_store` table.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, OptionalExtension};

/// Table holding every planner key.
pub const KV_TABLE: &str = "kv_store";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "kv_store",
        sql: include_str!("0001_kv_store.sql"),
    },
    Migration {
        version: 2,
        name: "kv_store_updated_index",
        sql: include_str!("0002_kv_store_updated_index.sql"),
    },
];

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the store schema to `latest_version()` and checks that the
/// key-value table is present afterwards.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version < latest {
        let tx = conn.transaction()?;
        for migration in pending(current_version) {
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
            info!(
                "event=db_migrate module=db status=ok version={} name={}",
                migration.version, migration.name
            );
        }
        tx.commit()?;
    }

    ensure_kv_table(conn)
}

fn pending(current_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current_version)
}

/// A file stamped with our version by another tool has no key table.
fn ensure_kv_table(conn: &Connection) -> DbResult<()> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [KV_TABLE],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(DbError::MissingTable(KV_TABLE)),
    }
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
