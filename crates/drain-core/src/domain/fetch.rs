//! FetchResult - outcome of one retrieval from a queue.

use super::Job;

/// What a single `pop` produced.
///
/// Queues that never batch return `Single`; batching queues return `Batch`.
/// `Empty` covers timeouts and "no more work".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Empty,
    Single(Job),
    Batch(Vec<Job>),
}

impl FetchResult {
    /// Build from a list of jobs, collapsing the degenerate shapes:
    /// no jobs is `Empty`, one job is `Single`.
    pub fn from_jobs(mut jobs: Vec<Job>) -> Self {
        match jobs.len() {
            0 => FetchResult::Empty,
            1 => FetchResult::Single(jobs.remove(0)),
            _ => FetchResult::Batch(jobs),
        }
    }

    /// Terminal for the worker loop. An empty batch counts as empty, so a
    /// batching queue that answers `[]` ends the call instead of being polled
    /// again straight away.
    pub fn is_empty(&self) -> bool {
        match self {
            FetchResult::Empty => true,
            FetchResult::Single(_) => false,
            FetchResult::Batch(jobs) => jobs.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FetchResult::Empty => 0,
            FetchResult::Single(_) => 1,
            FetchResult::Batch(jobs) => jobs.len(),
        }
    }

    /// Normalize into an ordered sequence of jobs.
    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            FetchResult::Empty => Vec::new(),
            FetchResult::Single(job) => vec![job],
            FetchResult::Batch(jobs) => jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JobKind;
    use rstest::rstest;

    fn job(n: u32) -> Job {
        Job::new(JobKind::new("t"), serde_json::json!({ "n": n }))
    }

    #[rstest]
    #[case::none(0, 0, true)]
    #[case::one(1, 1, false)]
    #[case::many(3, 3, false)]
    fn from_jobs_collapses_shapes(
        #[case] n: u32,
        #[case] expected_len: usize,
        #[case] expected_empty: bool,
    ) {
        let fetched = FetchResult::from_jobs((0..n).map(job).collect());
        assert_eq!(fetched.len(), expected_len);
        assert_eq!(fetched.is_empty(), expected_empty);
    }

    #[test]
    fn single_from_jobs_is_single_variant() {
        let j = job(7);
        assert_eq!(FetchResult::from_jobs(vec![j.clone()]), FetchResult::Single(j));
    }

    #[test]
    fn empty_batch_is_terminal() {
        assert!(FetchResult::Batch(Vec::new()).is_empty());
    }

    #[test]
    fn into_jobs_keeps_order() {
        let jobs = vec![job(1), job(2), job(3)];
        let ids: Vec<_> = jobs.iter().map(Job::id).collect();

        let out = FetchResult::Batch(jobs).into_jobs();
        assert_eq!(out.iter().map(Job::id).collect::<Vec<_>>(), ids);
    }
}
