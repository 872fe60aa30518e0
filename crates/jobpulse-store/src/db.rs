use rusqlite::{Connection, Result};

/// Initialise the listing schema. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    create_vacancies_table(conn)
}

/// `url` is not UNIQUE: dedup happens in the sweep against a snapshot, and
/// one batch may write the same new URL twice.
fn create_vacancies_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS vacancies (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            slug          TEXT    NOT NULL DEFAULT '',
            company_name  TEXT    NOT NULL DEFAULT '',
            title         TEXT    NOT NULL DEFAULT '',
            description   TEXT    NOT NULL,
            remote        INTEGER NOT NULL DEFAULT 0,
            url           TEXT    NOT NULL,
            tags          TEXT    NOT NULL DEFAULT '[]',  -- JSON array
            job_types     TEXT    NOT NULL DEFAULT '[]',  -- JSON array
            location      TEXT    NOT NULL,
            created_at    INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_vacancies_url
            ON vacancies(url);
        CREATE INDEX IF NOT EXISTS idx_vacancies_location
            ON vacancies(location);
        CREATE INDEX IF NOT EXISTS idx_vacancies_title
            ON vacancies(title);",
    )
}
