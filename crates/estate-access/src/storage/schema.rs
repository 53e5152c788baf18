//! `SQLite` schema definitions for estate-access.
//!
//! The store is a flat key-value table of JSON documents plus a metadata
//! table holding the schema version.

/// SQL statement to create the key-value document table.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Index backing the most-recent-write lookup in storage stats.
pub const CREATE_UPDATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_kv_store_updated_at ON kv_store (updated_at)
";
