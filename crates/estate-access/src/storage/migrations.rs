//! Schema versioning.
//!
//! Each entry in [`MIGRATIONS`] takes the database from the previous
//! version to its own. The reached version is recorded in the `metadata`
//! table, so opening an up-to-date database runs nothing.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::{CREATE_KV_TABLE, CREATE_METADATA_TABLE, CREATE_UPDATED_AT_INDEX};

/// Metadata key holding the schema version.
const VERSION_KEY: &str = "schema_version";

/// One schema step.
#[derive(Debug)]
struct Migration {
    version: u32,
    description: &'static str,
    statements: &'static [&'static str],
}

/// Every schema step, oldest first.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "document table",
        statements: &[CREATE_KV_TABLE],
    },
    Migration {
        version: 2,
        description: "index documents by update time",
        statements: &[CREATE_UPDATED_AT_INDEX],
    },
];

/// The schema version this build writes.
pub const CURRENT_VERSION: u32 = 2;

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if the database was written by a newer build, holds an
/// unreadable version, or a migration statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {found} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > found) {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Read the recorded schema version; 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<u32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for statement in migration.statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;

    info!(
        "Applied schema migration {} ({})",
        migration.version, migration.description
    );
    Ok(())
}
