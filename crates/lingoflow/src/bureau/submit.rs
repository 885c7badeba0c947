//! Submission service: drives a checkout from job creation through the
//! bureau's verdict and on through the return leg.
//!
//! One bureau exchange runs inside one database transaction, so the
//! identifier allocation, the state changes it leads to, and the counter
//! write land atomically. A rejected batch still commits (jobs must end
//! up annotated and `rejected`) and only then surfaces as an error; a
//! transport failure rolls everything back, leaving the jobs
//! unprocessed and the counter untouched.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::{debug, info_span, warn};

use crate::checkout::{CheckoutQueue, JobState, TranslationJob};
use crate::config::Config;
use crate::db::{job_repo, Database};
use crate::request::{IdentifierSource, RequestId, RequestIdAllocator};

use super::error::SubmitError;
use super::transport::{BureauTransport, PayloadRenderer};
use super::types::{BatchItem, BatchRequest, OrderAction};

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub request_id: RequestId,
    /// Redirect target captured from the queue before it was reset.
    pub destination: Option<String>,
    /// Warnings the bureau attached to its acceptance.
    pub warnings: Vec<String>,
}

/// Verdict of one bureau exchange, decided inside the submission
/// transaction.
enum Verdict {
    Accepted {
        request_id: RequestId,
        warnings: Vec<String>,
    },
    TurnedDown {
        request_id: RequestId,
        errors: Vec<String>,
    },
}

pub struct SubmissionService {
    db: Database,
    identifiers: Box<dyn IdentifierSource>,
    transport: Box<dyn BureauTransport>,
    renderer: Box<dyn PayloadRenderer>,
    languages: Vec<String>,
    default_deadline_days: u32,
}

impl SubmissionService {
    /// Production constructor — allocator and defaults from config, the
    /// transport and renderer supplied by the integration.
    pub fn from_config(
        config: &Config,
        db: Database,
        transport: Box<dyn BureauTransport>,
        renderer: Box<dyn PayloadRenderer>,
    ) -> Self {
        let identifiers = Box::new(RequestIdAllocator::from_config(&config.numbering));
        Self::new(
            db,
            identifiers,
            transport,
            renderer,
            config.languages.clone(),
            config.default_deadline_days,
        )
    }

    pub fn new(
        db: Database,
        identifiers: Box<dyn IdentifierSource>,
        transport: Box<dyn BureauTransport>,
        renderer: Box<dyn PayloadRenderer>,
        languages: Vec<String>,
        default_deadline_days: u32,
    ) -> Self {
        Self {
            db,
            identifiers,
            transport,
            renderer,
            languages,
            default_deadline_days,
        }
    }

    /// Starts a checkout for the configured target languages.
    pub fn start_checkout(&self, content_ref: &str) -> Result<CheckoutQueue, SubmitError> {
        self.start_checkout_for_languages(content_ref, &self.languages)
    }

    /// Starts a checkout for an explicit language selection: one
    /// unprocessed job per language, persisted in one transaction and
    /// queued together. Duplicate language tags collapse to one job.
    pub fn start_checkout_for_languages(
        &self,
        content_ref: &str,
        languages: &[String],
    ) -> Result<CheckoutQueue, SubmitError> {
        let mut seen = HashSet::new();
        let languages: Vec<&String> = languages.iter().filter(|l| seen.insert(*l)).collect();
        if languages.is_empty() {
            return Err(SubmitError::NoLanguages);
        }

        let mut queue = CheckoutQueue::new();
        self.db.with_txn(|conn| {
            for language in &languages {
                let job = TranslationJob::new(content_ref, language.as_str());
                job_repo::insert(conn, &job.to_row())?;
                queue.add_job(job);
            }
            Ok::<_, SubmitError>(())
        })?;

        debug!(content_ref, jobs = queue.len(), "Checkout started");
        Ok(queue)
    }

    /// Reloads the still-unprocessed jobs of a content item into a fresh
    /// queue, e.g. when a checkout is picked up again.
    pub fn resume_checkout(&self, content_ref: &str) -> Result<CheckoutQueue, SubmitError> {
        let rows = self
            .db
            .with_conn(|conn| job_repo::find_unprocessed_for_content(conn, content_ref))?;

        let mut queue = CheckoutQueue::new();
        for row in &rows {
            queue.add_job(TranslationJob::from_job_row(row));
        }
        Ok(queue)
    }

    /// Submits every queued job as one batch under one identifier, with
    /// the default requested delivery date.
    pub fn submit_checkout(
        &self,
        queue: &mut CheckoutQueue,
    ) -> Result<SubmissionOutcome, SubmitError> {
        self.submit_checkout_with_date(queue, self.default_requested_date())
    }

    /// Submits every queued job as one batch under one identifier.
    ///
    /// The whole batch shares one verdict: acceptance moves every job to
    /// `submitted` and resets the queue; rejection annotates every job,
    /// moves it to `rejected`, commits, and only then raises
    /// [`SubmitError::Rejected`]. The queue is left as-is on rejection
    /// so the caller can inspect what was turned down.
    pub fn submit_checkout_with_date(
        &self,
        queue: &mut CheckoutQueue,
        requested_date: NaiveDate,
    ) -> Result<SubmissionOutcome, SubmitError> {
        if queue.is_empty() {
            return Err(SubmitError::EmptyQueue);
        }
        let content_ref = queue.jobs()[0].content_ref.clone();
        let _span = info_span!(
            "submit_checkout",
            content_ref = %content_ref,
            jobs = queue.len(),
        )
        .entered();

        let verdict = self
            .db
            .with_txn(|conn| self.exchange(conn, queue, &content_ref, requested_date))?;

        match verdict {
            Verdict::Accepted {
                request_id,
                warnings,
            } => {
                for warning in &warnings {
                    warn!(request = %request_id, "Bureau warning: {}", warning);
                }
                let destination = queue.destination().map(str::to_string);
                queue.reset();
                debug!(request = %request_id, "Batch submitted");
                Ok(SubmissionOutcome {
                    request_id,
                    destination,
                    warnings,
                })
            }
            Verdict::TurnedDown { request_id, errors } => {
                log::error!(
                    "Batch {} rejected by bureau: {}",
                    request_id,
                    errors.join("; ")
                );
                Err(SubmitError::Rejected {
                    request: request_id,
                    errors,
                })
            }
        }
    }

    /// One allocate-render-send-apply cycle on the submission connection.
    fn exchange(
        &self,
        conn: &Connection,
        queue: &mut CheckoutQueue,
        content_ref: &str,
        requested_date: NaiveDate,
    ) -> Result<Verdict, SubmitError> {
        let request_id = self.identifiers.next_request_id(conn, content_ref)?;
        let action = if request_id.version > 1 {
            OrderAction::Update
        } else {
            OrderAction::Create
        };
        debug!(request = %request_id, ?action, "Allocated identifier for batch");

        let mut items = Vec::with_capacity(queue.len());
        for job in queue.jobs() {
            let payload = self.renderer.render(&job.content_ref, &job.language)?;
            items.push(BatchItem {
                language: job.language.clone(),
                payload,
            });
        }

        let request = BatchRequest {
            request_id: request_id.clone(),
            action,
            requested_date,
            items,
        };
        let response = self.transport.send_batch(&request)?;

        if response.success {
            let confirmed = match response.request_id {
                Some(echoed) => {
                    if echoed != request_id {
                        warn!(
                            allocated = %request_id,
                            echoed = %echoed,
                            "Bureau echoed a different identifier, keeping the echoed one",
                        );
                    }
                    echoed
                }
                None => {
                    warn!(request = %request_id, "Bureau confirmed without echoing the identifier");
                    request_id
                }
            };
            for job in queue.jobs_mut() {
                job.mark_submitted(confirmed.clone(), requested_date);
                job_repo::update(conn, &job.to_row())?;
            }
            Ok(Verdict::Accepted {
                request_id: confirmed,
                warnings: response.warnings,
            })
        } else {
            let mut notes = response.errors.clone();
            notes.extend(response.warnings.iter().cloned());
            let annotation = if notes.is_empty() {
                "Rejected without explanation".to_string()
            } else {
                notes.join("; ")
            };
            for job in queue.jobs_mut() {
                job.mark_rejected(&annotation);
                job_repo::update(conn, &job.to_row())?;
            }
            let errors = if response.errors.is_empty() {
                vec![annotation]
            } else {
                response.errors
            };
            Ok(Verdict::TurnedDown { request_id, errors })
        }
    }

    /// Abandons a checkout before submission: still-unprocessed rows are
    /// deleted and the queue is cleared.
    pub fn cancel_checkout(&self, queue: &mut CheckoutQueue) -> Result<(), SubmitError> {
        self.db.with_txn(|conn| {
            for job in queue.jobs() {
                if job.state == JobState::Unprocessed {
                    job_repo::delete(conn, &job.id)?;
                }
            }
            Ok::<_, SubmitError>(())
        })?;

        debug!(jobs = queue.len(), "Checkout cancelled");
        queue.reset();
        Ok(())
    }

    /// Records that the bureau delivered the translation for one job.
    pub fn mark_delivered(&self, job_id: &str) -> Result<TranslationJob, SubmitError> {
        self.transition(job_id, JobState::Submitted, JobState::Received)
    }

    /// Records that a delivered translation passed review.
    pub fn mark_accepted(&self, job_id: &str) -> Result<TranslationJob, SubmitError> {
        self.transition(job_id, JobState::Received, JobState::Accepted)
    }

    fn transition(
        &self,
        job_id: &str,
        from: JobState,
        to: JobState,
    ) -> Result<TranslationJob, SubmitError> {
        self.db.with_txn(|conn| {
            let row = job_repo::find_by_id(conn, job_id)?.ok_or_else(|| {
                SubmitError::MissingJob {
                    job_id: job_id.to_string(),
                }
            })?;
            let mut job = TranslationJob::from_job_row(&row);
            if job.state != from {
                return Err(SubmitError::InvalidTransition {
                    job_id: job_id.to_string(),
                    from: job.state,
                    to,
                });
            }
            job.state = to;
            job.updated_at = Utc::now();
            job_repo::update(conn, &job.to_row())?;
            debug!(job_id, %from, %to, "Job transitioned");
            Ok(job)
        })
    }

    /// All jobs ever created for a content item, newest first.
    pub fn jobs_for_content(&self, content_ref: &str) -> Result<Vec<TranslationJob>, SubmitError> {
        let rows = self
            .db
            .with_conn(|conn| job_repo::find_by_content(conn, content_ref))?;
        Ok(rows.iter().map(TranslationJob::from_job_row).collect())
    }

    /// Delivery date requested from the bureau when the caller gives
    /// none: today plus the configured deadline.
    pub fn default_requested_date(&self) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(i64::from(self.default_deadline_days))
    }
}
