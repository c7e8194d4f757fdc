//! SQL schema for the Quill SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! The referential-integrity rules are the interesting part:
//!   - comments cascade when their post or author is deleted;
//!   - posts and follow edges cascade when their user is deleted;
//!   - a post's group reference is cleared, not cascaded, when the group
//!     is deleted;
//!   - the UNIQUE (user_id, author_id) constraint on follows backs the
//!     insert-or-ignore used for idempotent follow creation.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    username   TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS groups (
    group_id    TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS posts (
    post_id    TEXT PRIMARY KEY,
    author_id  TEXT NOT NULL REFERENCES users(user_id)  ON DELETE CASCADE,
    group_id   TEXT          REFERENCES groups(group_id) ON DELETE SET NULL,
    text       TEXT NOT NULL,
    image      TEXT,            -- path reference; no blobs in the database
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT          REFERENCES posts(post_id)  ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id)  ON DELETE CASCADE,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS follows (
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    UNIQUE (user_id, author_id)
);

CREATE INDEX IF NOT EXISTS posts_author_idx   ON posts(author_id);
CREATE INDEX IF NOT EXISTS posts_group_idx    ON posts(group_id);
CREATE INDEX IF NOT EXISTS posts_created_idx  ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx  ON comments(post_id);
CREATE INDEX IF NOT EXISTS follows_user_idx   ON follows(user_id);

PRAGMA user_version = 1;
";
