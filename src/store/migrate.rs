use rusqlite::Connection;

use crate::store::tables::{FOLD_CASE, TREES, USERS, USER_TREES};
use crate::store::{Store, StoreError};

type MigrationFn = fn(&Connection) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_lookup_indexes", m002_lookup_indexes),
        ("003_user_trees_view", m003_user_trees_view),
        ("004_unicode_lookup_indexes", m004_unicode_lookup_indexes),
    ]
}

/// Apply every pending migration.
///
/// Each migration is idempotent and the schema version is persisted right
/// after it succeeds, so a crash between the two only replays that step.
/// Versions only move forward.
pub fn run(store: &Store) -> Result<(), StoreError> {
    store.with_conn(|conn| {
        let current = get_current_version(conn)?;

        for (index, (name, func)) in migrations().iter().enumerate() {
            let version = (index + 1) as u32;
            if version > current {
                tracing::info!(version, name, "Running migration");
                func(conn)?;
                set_version(conn, version)?;
                tracing::info!(version, name, "Migration complete");
            } else {
                tracing::debug!(version, name, "Migration already applied, skipping");
            }
        }
        Ok(())
    })
}

pub fn latest_version() -> u32 {
    migrations().len() as u32
}

pub fn get_current_version(conn: &Connection) -> Result<u32, StoreError> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version.max(0) as u32)
}

pub fn set_version(conn: &Connection, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(conn)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn m001_initial(conn: &Connection) -> Result<(), StoreError> {
    // lat/long are declared without a type so malformed legacy values are kept verbatim.
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {USERS} (
             id INTEGER PRIMARY KEY,
             email TEXT NOT NULL,
             display_name TEXT,
             is_subscriber INTEGER NOT NULL DEFAULT 0
         );
         CREATE TABLE IF NOT EXISTS {TREES} (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             tree_code TEXT,
             tree_name TEXT,
             tree_type TEXT,
             area TEXT,
             lat,
             long,
             planted_at TEXT,
             user_id INTEGER REFERENCES {USERS}(id)
         );"
    ))?;
    Ok(())
}

fn m002_lookup_indexes(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "CREATE INDEX IF NOT EXISTS idx_trees_user_id ON {TREES}(user_id);
         CREATE INDEX IF NOT EXISTS idx_trees_code_lower ON {TREES}(lower(tree_code));
         CREATE INDEX IF NOT EXISTS idx_users_email_lower ON {USERS}(lower(email));"
    ))?;
    Ok(())
}

fn m003_user_trees_view(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "CREATE VIEW IF NOT EXISTS {USER_TREES} AS
         SELECT t.id AS id,
                t.tree_code AS tree_code,
                t.tree_name AS tree_name,
                t.tree_type AS tree_type,
                t.area AS area,
                t.lat AS lat,
                t.long AS long,
                t.planted_at AS planted_at,
                t.user_id AS user_id,
                u.email AS email,
                COALESCE(u.is_subscriber, 0) AS is_subscriber
         FROM {TREES} t
         LEFT JOIN {USERS} u ON u.id = t.user_id;"
    ))?;
    Ok(())
}

fn m004_unicode_lookup_indexes(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "DROP INDEX IF EXISTS idx_trees_code_lower;
         DROP INDEX IF EXISTS idx_users_email_lower;
         CREATE INDEX IF NOT EXISTS idx_trees_code_folded ON {TREES}({FOLD_CASE}(tree_code));
         CREATE INDEX IF NOT EXISTS idx_users_email_folded ON {USERS}({FOLD_CASE}(email));"
    ))?;
    Ok(())
}
