//! Test harness for isolated checkout testing.
//!
//! The `TestHarness` struct wires a `SubmissionService` to an in-memory
//! database, a scriptable transport stub, and a canned payload renderer,
//! so tests can drive full checkouts without any external service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use lingoflow::bureau::{
    BatchRequest, BureauResponse, BureauTransport, PayloadRenderer, RenderError, TransportError,
};
use lingoflow::db::job_repo::{self, JobRow};
use lingoflow::request::{ConfiguredSequence, MissingHistoryPolicy, RequestIdAllocator};
use lingoflow::{Database, SubmissionService};

/// Transport stub that records every batch and replies from a script.
///
/// With no scripted reply queued it confirms the batch, echoing its
/// identifier, which is what the real bureau does on the happy path.
#[derive(Clone, Default)]
pub struct StubTransport {
    replies: Arc<Mutex<VecDeque<Result<BureauResponse, TransportError>>>>,
    sent: Arc<Mutex<Vec<BatchRequest>>>,
}

impl StubTransport {
    pub fn push_reply(&self, reply: Result<BureauResponse, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Every batch the service sent, in order.
    pub fn sent(&self) -> Vec<BatchRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl BureauTransport for StubTransport {
    fn send_batch(&self, request: &BatchRequest) -> Result<BureauResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(BureauResponse::success(request.request_id.clone())),
        }
    }
}

/// Renderer producing a small deterministic payload per job.
pub struct StubRenderer;

impl PayloadRenderer for StubRenderer {
    fn render(&self, content_ref: &str, language: &str) -> Result<String, RenderError> {
        Ok(format!(
            "<content ref=\"{}\" lang=\"{}\"/>",
            content_ref, language
        ))
    }
}

/// Renderer that refuses everything, for failure-path tests.
pub struct FailingRenderer;

impl PayloadRenderer for FailingRenderer {
    fn render(&self, content_ref: &str, language: &str) -> Result<String, RenderError> {
        Err(RenderError {
            content_ref: content_ref.to_string(),
            language: language.to_string(),
            reason: "no renderable fields".to_string(),
        })
    }
}

/// Isolated checkout environment: in-memory database, stub transport,
/// submission service configured with code "XYZ" and numbering start 500.
pub struct TestHarness {
    pub db: Database,
    pub transport: StubTransport,
    pub service: SubmissionService,
}

impl TestHarness {
    /// Harness with the default two target languages.
    pub fn new() -> Self {
        Self::with_languages(&["de-DE", "fr-FR"])
    }

    pub fn with_languages(languages: &[&str]) -> Self {
        Self::build(languages, Box::new(StubRenderer))
    }

    pub fn with_renderer(renderer: Box<dyn PayloadRenderer>) -> Self {
        Self::build(&["de-DE", "fr-FR"], renderer)
    }

    fn build(languages: &[&str], renderer: Box<dyn PayloadRenderer>) -> Self {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let transport = StubTransport::default();
        let allocator = RequestIdAllocator::new(
            "XYZ",
            "translation",
            MissingHistoryPolicy::default(),
            Box::new(ConfiguredSequence::new(500)),
        );
        let service = SubmissionService::new(
            db.clone(),
            Box::new(allocator),
            Box::new(transport.clone()),
            renderer,
            languages.iter().map(|l| l.to_string()).collect(),
            14,
        );
        Self {
            db,
            transport,
            service,
        }
    }

    /// All stored rows for a content item, newest first.
    pub fn rows_for(&self, content_ref: &str) -> Vec<JobRow> {
        self.db
            .with_conn(|conn| job_repo::find_by_content(conn, content_ref))
            .expect("Failed to read job rows")
    }

    /// Current value of the shared request-number counter.
    pub fn counter(&self) -> Option<i64> {
        self.db
            .with_conn(lingoflow::db::counter_repo::last_request_number)
            .expect("Failed to read counter")
    }

    /// Seeds an already-submitted row, as if a batch had gone out before
    /// the test started.
    pub fn seed_submitted(
        &self,
        id: &str,
        content_ref: &str,
        number: i64,
        year: i64,
        version: i64,
        part: i64,
    ) {
        let row = JobRow {
            id: id.to_string(),
            content_ref: content_ref.to_string(),
            language: "de-DE".to_string(),
            state: "submitted".to_string(),
            code: Some("XYZ".to_string()),
            year: Some(year),
            number: Some(number),
            version: Some(version),
            part: Some(part),
            product: Some("translation".to_string()),
            requested_date: Some("2026-01-15".to_string()),
            annotation: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };
        self.db
            .with_conn(|conn| job_repo::insert(conn, &row))
            .expect("Failed to seed job row");
    }

    /// Seeds the shared counter directly.
    pub fn seed_counter(&self, value: i64) {
        self.db
            .with_conn(|conn| lingoflow::db::counter_repo::set_last_request_number(conn, value))
            .expect("Failed to seed counter");
    }
}
