//! Translation jobs and their lifecycle states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::job_repo::JobRow;
use crate::request::RequestId;

// ─── Helpers ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            log::warn!("parse_timestamp: failed to parse '{}': {}", s, e);
            Utc::now()
        })
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str, job_id: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!(
                "Unreadable requested date '{}' for job {}: {}",
                s,
                job_id,
                e
            );
            None
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ─── JobState ───────────────────────────────────────────────────────────────

/// Lifecycle state of one translation job.
///
/// `Unprocessed` jobs either leave the system again (cancellation) or
/// move batch-wide to `Submitted` or `Rejected` when the bureau answers.
/// `Received` and `Accepted` track the return leg once translated
/// content comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Unprocessed,
    Submitted,
    Rejected,
    Received,
    Accepted,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Unprocessed => "unprocessed",
            JobState::Submitted => "submitted",
            JobState::Rejected => "rejected",
            JobState::Received => "received",
            JobState::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str, job_id: &str) -> Self {
        match s {
            "unprocessed" => JobState::Unprocessed,
            "submitted" => JobState::Submitted,
            "rejected" => JobState::Rejected,
            "received" => JobState::Received,
            "accepted" => JobState::Accepted,
            other => {
                log::warn!(
                    "Unknown job state '{}' for job {}, defaulting to Unprocessed",
                    other,
                    job_id
                );
                JobState::Unprocessed
            }
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── TranslationJob ─────────────────────────────────────────────────────────

/// One translation job: a single content item heading into a single
/// target language, tracked from creation until the translation returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationJob {
    /// Unique job identifier.
    pub id: String,
    /// Reference to the content item being translated.
    pub content_ref: String,
    /// Target language tag.
    pub language: String,
    /// Current lifecycle state.
    pub state: JobState,
    /// Identifier the job was submitted under, if it ever was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    /// Delivery date requested from the bureau.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_date: Option<NaiveDate>,
    /// Warning or rejection text accumulated over the job's lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job last changed.
    pub updated_at: DateTime<Utc>,
}

impl TranslationJob {
    /// Creates a fresh unprocessed job for one content item and language.
    pub fn new(content_ref: impl Into<String>, language: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            content_ref: content_ref.into(),
            language: language.into(),
            state: JobState::Unprocessed,
            request_id: None,
            requested_date: None,
            annotation: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_job_row(row: &JobRow) -> Self {
        Self {
            id: row.id.clone(),
            content_ref: row.content_ref.clone(),
            language: row.language.clone(),
            state: JobState::parse(&row.state, &row.id),
            request_id: RequestId::from_columns(
                row.code.as_deref(),
                row.year,
                row.number,
                row.version,
                row.part,
                row.product.as_deref(),
            ),
            requested_date: row
                .requested_date
                .as_deref()
                .and_then(|s| parse_date(s, &row.id)),
            annotation: row.annotation.clone(),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }

    pub fn to_row(&self) -> JobRow {
        JobRow {
            id: self.id.clone(),
            content_ref: self.content_ref.clone(),
            language: self.language.clone(),
            state: self.state.as_str().to_string(),
            code: self.request_id.as_ref().map(|r| r.code.clone()),
            year: self.request_id.as_ref().map(|r| i64::from(r.year)),
            number: self.request_id.as_ref().map(|r| r.number),
            version: self.request_id.as_ref().map(|r| i64::from(r.version)),
            part: self.request_id.as_ref().map(|r| i64::from(r.part)),
            product: self.request_id.as_ref().map(|r| r.product.clone()),
            requested_date: self.requested_date.map(format_date),
            annotation: self.annotation.clone(),
            created_at: format_timestamp(self.created_at),
            updated_at: format_timestamp(self.updated_at),
        }
    }

    /// Records a successful submission: identifier, requested delivery
    /// date, state `submitted`.
    pub fn mark_submitted(&mut self, request_id: RequestId, requested_date: NaiveDate) {
        self.request_id = Some(request_id);
        self.requested_date = Some(requested_date);
        self.state = JobState::Submitted;
        self.updated_at = Utc::now();
    }

    /// Records a rejection with the bureau's explanation attached.
    /// Repeated rejections accumulate, joined by "; ".
    pub fn mark_rejected(&mut self, annotation: &str) {
        self.annotation = match self.annotation.take() {
            Some(existing) if !existing.is_empty() => {
                Some(format!("{}; {}", existing, annotation))
            }
            _ => Some(annotation.to_string()),
        };
        self.state = JobState::Rejected;
        self.updated_at = Utc::now();
    }
}
