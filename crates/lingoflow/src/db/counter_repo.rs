//! Counter repository — the shared request-number counter.

use rusqlite::{params, Connection};

use super::DatabaseError;

/// Name of the counter holding the last request number handed out.
pub const LAST_REQUEST_NUMBER: &str = "last_request_number";

/// Reads the last request number, or `None` when no number was ever minted.
pub fn last_request_number(conn: &Connection) -> Result<Option<i64>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM counters WHERE name = ?1")?;
    let mut rows = stmt.query_map(params![LAST_REQUEST_NUMBER], |r| r.get::<_, i64>(0))?;
    match rows.next() {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Records the last request number, inserting or overwriting as needed.
pub fn set_last_request_number(conn: &Connection, value: i64) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO counters (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![LAST_REQUEST_NUMBER, value],
    )?;
    Ok(())
}
