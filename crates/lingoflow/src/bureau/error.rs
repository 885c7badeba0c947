use thiserror::Error;

use crate::checkout::JobState;
use crate::db::DatabaseError;
use crate::request::{AllocationError, RequestId};

/// Failure to reach or understand the bureau.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Bureau endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Bureau did not answer within {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Malformed bureau response: {0}")]
    MalformedResponse(String),
}

/// Failure to render a content item into a request payload.
#[derive(Error, Debug)]
#[error("Failed to render '{content_ref}' for {language}: {reason}")]
pub struct RenderError {
    pub content_ref: String,
    pub language: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Checkout queue is empty, nothing to submit")]
    EmptyQueue,

    #[error("No target languages requested")]
    NoLanguages,

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Request {request} rejected by translation bureau: {}", .errors.join("; "))]
    Rejected {
        request: RequestId,
        errors: Vec<String>,
    },

    #[error("Job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: String,
        from: JobState,
        to: JobState,
    },

    #[error("Job {job_id} not found")]
    MissingJob { job_id: String },
}
