//! SQL schema for the rolodex SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id      TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    date_of_birth TEXT,            -- ISO 8601 UTC or NULL
    address1      TEXT,
    address2      TEXT,
    city          TEXT,
    state         TEXT,            -- two-letter postal code
    zip_code      INTEGER,
    email         TEXT NOT NULL,
    phone         TEXT,
    image_data    BLOB,
    image_type    TEXT,
    version       INTEGER NOT NULL DEFAULT 1,
    -- an image payload and its content type travel together
    CHECK ((image_data IS NULL) = (image_type IS NULL))
);

CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    TEXT NOT NULL,
    name        TEXT NOT NULL,
    version     INTEGER NOT NULL DEFAULT 1
);

-- Pure join; the rowid preserves association (membership) order.
CREATE TABLE IF NOT EXISTS contact_categories (
    contact_id  INTEGER NOT NULL REFERENCES contacts(contact_id)   ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(category_id) ON DELETE CASCADE,
    PRIMARY KEY (contact_id, category_id)
);

CREATE INDEX IF NOT EXISTS contacts_owner_idx     ON contacts(owner_id);
CREATE INDEX IF NOT EXISTS categories_owner_idx   ON categories(owner_id);
CREATE INDEX IF NOT EXISTS associations_category_idx ON contact_categories(category_id);

PRAGMA user_version = 1;
";
