//! Job repository — CRUD operations for the `translation_jobs` table.
//!
//! Functions borrow a `Connection` rather than the `Database` handle so
//! callers can compose several operations inside one transaction via
//! `Database::with_txn`.

use rusqlite::{params, Connection, Row};

use super::DatabaseError;

/// A raw translation job row from the database.
///
/// Identifier columns (`code` through `product`) are written together
/// once the bureau accepts a batch. Unprocessed and rejected rows keep
/// them `NULL`, so a rejected batch never consumes a part.
#[derive(Debug, Clone)]
pub struct JobRow {
    pub id: String,
    pub content_ref: String,
    pub language: String,
    pub state: String,
    pub code: Option<String>,
    pub year: Option<i64>,
    pub number: Option<i64>,
    pub version: Option<i64>,
    pub part: Option<i64>,
    pub product: Option<String>,
    pub requested_date: Option<String>,
    pub annotation: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            content_ref: row.get("content_ref")?,
            language: row.get("language")?,
            state: row.get("state")?,
            code: row.get("code")?,
            year: row.get("year")?,
            number: row.get("number")?,
            version: row.get("version")?,
            part: row.get("part")?,
            product: row.get("product")?,
            requested_date: row.get("requested_date")?,
            annotation: row.get("annotation")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a new job row.
pub fn insert(conn: &Connection, job: &JobRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO translation_jobs (id, content_ref, language, state, code, year, number,
         version, part, product, requested_date, annotation, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            job.id,
            job.content_ref,
            job.language,
            job.state,
            job.code,
            job.year,
            job.number,
            job.version,
            job.part,
            job.product,
            job.requested_date,
            job.annotation,
            job.created_at,
            job.updated_at,
        ],
    )?;
    Ok(())
}

/// Updates an existing job row. All fields except `id` and `created_at` are overwritten.
pub fn update(conn: &Connection, job: &JobRow) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE translation_jobs SET content_ref=?2, language=?3, state=?4, code=?5, year=?6,
         number=?7, version=?8, part=?9, product=?10, requested_date=?11, annotation=?12,
         updated_at=?13
         WHERE id=?1",
        params![
            job.id,
            job.content_ref,
            job.language,
            job.state,
            job.code,
            job.year,
            job.number,
            job.version,
            job.part,
            job.product,
            job.requested_date,
            job.annotation,
            job.updated_at,
        ],
    )?;
    Ok(())
}

/// Finds a job by its ID.
pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM translation_jobs WHERE id = ?1")?;
    let mut rows = stmt.query_map(params![id], JobRow::from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Returns all jobs for a content item, newest first.
pub fn find_by_content(conn: &Connection, content_ref: &str) -> Result<Vec<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM translation_jobs WHERE content_ref = ?1 ORDER BY created_at DESC",
    )?;
    let rows: Vec<JobRow> = stmt
        .query_map(params![content_ref], JobRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns the unprocessed jobs for a content item, oldest first.
pub fn find_unprocessed_for_content(
    conn: &Connection,
    content_ref: &str,
) -> Result<Vec<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM translation_jobs
         WHERE content_ref = ?1 AND state = 'unprocessed'
         ORDER BY created_at ASC",
    )?;
    let rows: Vec<JobRow> = stmt
        .query_map(params![content_ref], JobRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Deletes a job row.
pub fn delete(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM translation_jobs WHERE id = ?1", params![id])?;
    Ok(())
}

/// Finds the most recently submitted job for a content item, i.e. the row
/// carrying the highest identifier version.
///
/// Rows without identifier columns (never submitted, or rejected as part
/// of a turned-down batch) are skipped.
pub fn latest_submitted(
    conn: &Connection,
    content_ref: &str,
) -> Result<Option<JobRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM translation_jobs
         WHERE content_ref = ?1 AND number IS NOT NULL
         ORDER BY version DESC, created_at DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![content_ref], JobRow::from_row)?;
    match rows.next() {
        Some(Ok(row)) => Ok(Some(row)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Highest part recorded for a request number, with the year stamped on
/// that row. Every identifier reusing the number keeps that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRecord {
    pub part: i64,
    pub year: Option<i64>,
}

/// Returns the highest part recorded for a request number, or `None` when
/// no job carries that number.
///
/// The distinction matters: a record with part 0 means part 0 was handed
/// out, `None` means there is no history at all for the number.
pub fn highest_part_for_number(
    conn: &Connection,
    number: i64,
) -> Result<Option<PartRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT part, year FROM translation_jobs
         WHERE number = ?1 AND part IS NOT NULL
         ORDER BY part DESC
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![number], |row| {
        Ok(PartRecord {
            part: row.get(0)?,
            year: row.get(1)?,
        })
    })?;
    match rows.next() {
        Some(Ok(record)) => Ok(Some(record)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}
