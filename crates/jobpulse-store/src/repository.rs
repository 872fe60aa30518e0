use std::collections::HashSet;
use std::sync::Mutex;

use jobpulse_core::{CityCount, Listing, ListingPage, StoredListing, TitleCount};
use rusqlite::{types::Type, Connection};
use tracing::debug;

use crate::db::init_db;
use crate::error::Result;
use crate::store::ListingStore;

/// SQLite-backed [`ListingStore`].
///
/// Thread-safe: wraps the connection in a Mutex. Both cadences and the HTTP
/// handlers go through the same instance, so every statement is serialised.
pub struct SqliteListingStore {
    db: Mutex<Connection>,
}

impl SqliteListingStore {
    /// Wrap an open connection, creating the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Fresh private database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ListingStore for SqliteListingStore {
    fn insert(&self, listing: &Listing) -> Result<i64> {
        let tags = serde_json::to_string(&listing.tags)?;
        let job_types = serde_json::to_string(&listing.job_types)?;

        let db = self.conn();
        db.execute(
            "INSERT INTO vacancies
             (slug, company_name, title, description, remote, url,
              tags, job_types, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                listing.slug,
                listing.company_name,
                listing.title,
                listing.description,
                listing.remote,
                listing.url,
                tags,
                job_types,
                listing.location,
                listing.created_at,
            ],
        )?;
        let id = db.last_insert_rowid();
        debug!(id, url = %listing.url, "vacancy stored");
        Ok(id)
    }

    fn existing_urls(&self) -> Result<HashSet<String>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached("SELECT url FROM vacancies")?;
        let urls = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(urls)
    }

    fn paginated(&self, page_index: u32, page_size: u32) -> Result<ListingPage> {
        let db = self.conn();
        let total: i64 = db.query_row("SELECT COUNT(*) FROM vacancies", [], |row| row.get(0))?;
        let total = total.max(0) as u64;

        let offset = u64::from(page_index) * u64::from(page_size);
        let mut stmt = db.prepare_cached(
            "SELECT id, slug, company_name, title, description, remote, url,
                    tags, job_types, location, created_at
             FROM vacancies
             ORDER BY id DESC
             LIMIT ?1 OFFSET ?2",
        )?;
        let content = stmt
            .query_map(rusqlite::params![page_size, offset as i64], row_to_listing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size))
        };

        Ok(ListingPage {
            content,
            page: page_index.saturating_add(1),
            size: page_size,
            total_elements: total,
            total_pages,
        })
    }

    fn city_counts(&self) -> Result<Vec<CityCount>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(
            "SELECT location, COUNT(*) AS city_count
             FROM vacancies
             GROUP BY location
             ORDER BY city_count DESC, location ASC",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(CityCount {
                    location: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    fn popular_titles(&self, limit: usize) -> Result<Vec<TitleCount>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(
            "SELECT title, COUNT(*) AS title_count
             FROM vacancies
             GROUP BY title
             HAVING COUNT(*) > 1
             ORDER BY title_count DESC, title ASC
             LIMIT ?1",
        )?;
        let titles = stmt
            .query_map([limit as i64], |row| {
                Ok(TitleCount {
                    title: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(titles)
    }
}

fn row_to_listing(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredListing> {
    Ok(StoredListing {
        id: row.get(0)?,
        listing: Listing {
            slug: row.get(1)?,
            company_name: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            remote: row.get(5)?,
            url: row.get(6)?,
            tags: json_column(row, 7)?,
            job_types: json_column(row, 8)?,
            location: row.get(9)?,
            created_at: row.get(10)?,
        },
    })
}

/// Decode a JSON-array TEXT column.
fn json_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
