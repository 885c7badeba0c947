//! Identifier allocation for new translation requests.
//!
//! Three paths produce an identifier:
//!
//! 1. Resubmission: the content item was submitted before, so its last
//!    identifier is cloned with the version bumped. Number, year and
//!    part travel along unchanged, which is why a resubmission can carry
//!    a year older than the current one.
//! 2. Part advance: first submission for this content item while the
//!    shared counter points at a number with recorded parts. The next
//!    free part of that number is taken, stamped with the year already
//!    on record for the number.
//! 3. Mint: no counter yet, or the current number has no free part
//!    left. A fresh number comes from the sequence and part restarts
//!    at 0. Minting writes the counter.
//!
//! Allocation runs on the caller's connection so that the history
//! reads and the counter write share one transaction. Together with the
//! database handle's mutex this is what makes overlapping checkouts
//! come away with distinct identifiers.

use chrono::{Datelike, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::config::NumberingConfig;
use crate::db::{counter_repo, job_repo, DatabaseError};

use super::id::{RequestId, MAX_PART};
use super::sequence::{ConfiguredSequence, NumberSequence};

/// Hands out the identifier a new submission must carry.
///
/// Implementations are consulted inside the submission transaction and
/// must not open their own.
pub trait IdentifierSource: Send + Sync {
    /// Decides the identifier for the next submission of `content_ref`.
    ///
    /// Calling this twice without persisting jobs in between yields the
    /// same identifier both times.
    fn next_request_id(
        &self,
        conn: &Connection,
        content_ref: &str,
    ) -> Result<RequestId, AllocationError>;
}

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("No part history recorded for request number {number}")]
    MissingHistory { number: i64 },
}

/// What to do when the counter names a number but no job row carries it.
///
/// The gap means history was lost (or never written); assuming part 0 is
/// free keeps allocation going at the cost of a possible part collision,
/// failing makes the gap visible immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingHistoryPolicy {
    #[default]
    AssumeZero,
    Fail,
}

/// Allocator deriving identifiers from job history plus the shared
/// request-number counter.
pub struct RequestIdAllocator {
    code: String,
    product: String,
    policy: MissingHistoryPolicy,
    sequence: Box<dyn NumberSequence>,
}

impl RequestIdAllocator {
    pub fn new(
        code: impl Into<String>,
        product: impl Into<String>,
        policy: MissingHistoryPolicy,
        sequence: Box<dyn NumberSequence>,
    ) -> Self {
        Self {
            code: code.into(),
            product: product.into(),
            policy,
            sequence,
        }
    }

    pub fn from_config(numbering: &NumberingConfig) -> Self {
        let policy = if numbering.assume_zero_on_missing_history {
            MissingHistoryPolicy::AssumeZero
        } else {
            MissingHistoryPolicy::Fail
        };
        Self::new(
            numbering.code.clone(),
            numbering.product.clone(),
            policy,
            Box::new(ConfiguredSequence::new(numbering.start)),
        )
    }

    /// Allocates the next identifier for `content_ref` on the caller's
    /// connection.
    pub fn allocate(
        &self,
        conn: &Connection,
        content_ref: &str,
    ) -> Result<RequestId, AllocationError> {
        if let Some(last) = self.latest_submitted_id(conn, content_ref)? {
            let next = last.next_version();
            tracing::debug!(identifier = %next, "Resubmission, bumping version");
            return Ok(next);
        }

        let number = match counter_repo::last_request_number(conn)? {
            Some(number) => number,
            None => return self.mint(conn, None),
        };

        match job_repo::highest_part_for_number(conn, number)? {
            Some(record) => match u8::try_from(record.part + 1).ok().filter(|c| *c <= MAX_PART) {
                Some(candidate) => {
                    // The year belongs to the number, not the allocation date.
                    let year = recorded_year(number, record.year);
                    Ok(self.build(number, candidate, year))
                }
                // Part space used up, abandon this number.
                None => self.mint(conn, Some(number)),
            },
            None => match self.policy {
                MissingHistoryPolicy::AssumeZero => {
                    tracing::warn!(number, "No job history for counter number, assuming part 0 is free");
                    Ok(self.build(number, 0, Utc::now().year()))
                }
                MissingHistoryPolicy::Fail => Err(AllocationError::MissingHistory { number }),
            },
        }
    }

    fn latest_submitted_id(
        &self,
        conn: &Connection,
        content_ref: &str,
    ) -> Result<Option<RequestId>, AllocationError> {
        let row = match job_repo::latest_submitted(conn, content_ref)? {
            Some(row) => row,
            None => return Ok(None),
        };
        // A corrupt stored identifier is logged by from_columns and the
        // content item is treated as never submitted.
        Ok(RequestId::from_columns(
            row.code.as_deref(),
            row.year,
            row.number,
            row.version,
            row.part,
            row.product.as_deref(),
        ))
    }

    fn mint(&self, conn: &Connection, last: Option<i64>) -> Result<RequestId, AllocationError> {
        let number = self.sequence.next_number(last);
        counter_repo::set_last_request_number(conn, number)?;
        tracing::debug!(number, "Minted fresh request number");
        Ok(self.build(number, 0, Utc::now().year()))
    }

    fn build(&self, number: i64, part: u8, year: i32) -> RequestId {
        RequestId {
            code: self.code.clone(),
            year,
            number,
            version: 1,
            part,
            product: self.product.clone(),
        }
    }
}

fn recorded_year(number: i64, year: Option<i64>) -> i32 {
    match year.map(i32::try_from) {
        Some(Ok(year)) => year,
        _ => {
            tracing::warn!(number, "Recorded year missing or out of range, using the current year");
            Utc::now().year()
        }
    }
}

impl IdentifierSource for RequestIdAllocator {
    fn next_request_id(
        &self,
        conn: &Connection,
        content_ref: &str,
    ) -> Result<RequestId, AllocationError> {
        self.allocate(conn, content_ref)
    }
}
