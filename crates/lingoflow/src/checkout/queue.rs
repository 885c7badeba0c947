//! The in-memory checkout queue.

use super::job::TranslationJob;

/// Jobs grouped for one checkout: the per-language translation jobs
/// created together for a single content submission, plus the redirect
/// destination to present once the batch went out.
///
/// Scoped to one interactive checkout and never persisted itself; the
/// database rows backing the jobs are the durable side.
#[derive(Debug, Default)]
pub struct CheckoutQueue {
    jobs: Vec<TranslationJob>,
    destination: Option<String>,
}

impl CheckoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job to the queue. A job already queued under the same id
    /// is skipped.
    pub fn add_job(&mut self, job: TranslationJob) {
        if self.jobs.iter().any(|j| j.id == job.id) {
            log::warn!("Job {} already queued, skipping duplicate", job.id);
            return;
        }
        self.jobs.push(job);
    }

    pub fn jobs(&self) -> &[TranslationJob] {
        &self.jobs
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut [TranslationJob] {
        &mut self.jobs
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = Some(destination.into());
    }

    /// Clears all jobs and the destination. Called after a successful
    /// submission and after cancellation.
    pub fn reset(&mut self) {
        self.jobs.clear();
        self.destination = None;
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list() {
        let mut queue = CheckoutQueue::new();
        assert!(queue.is_empty());

        queue.add_job(TranslationJob::new("page:1", "de-DE"));
        queue.add_job(TranslationJob::new("page:1", "fr-FR"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.jobs()[0].language, "de-DE");
    }

    #[test]
    fn test_duplicate_job_is_skipped() {
        let mut queue = CheckoutQueue::new();
        let job = TranslationJob::new("page:1", "de-DE");
        queue.add_job(job.clone());
        queue.add_job(job);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_destination() {
        let mut queue = CheckoutQueue::new();
        assert!(queue.destination().is_none());
        queue.set_destination("/content/page:1");
        assert_eq!(queue.destination(), Some("/content/page:1"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut queue = CheckoutQueue::new();
        queue.add_job(TranslationJob::new("page:1", "de-DE"));
        queue.set_destination("/content/page:1");

        queue.reset();
        assert!(queue.is_empty());
        assert!(queue.destination().is_none());
    }
}
