//! FIFO of submitted jobs in window order.

use std::collections::VecDeque;

use crate::job::Job;

/// Jobs in chronological order of their window start; consumed from the front.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail. Windows come from a forward-only cursor, so the
    /// new job never starts before the current tail.
    pub fn push_back(&mut self, job: Job) {
        debug_assert!(
            self.jobs
                .back()
                .map_or(true, |tail| tail.window().since <= job.window().since),
            "job queue must stay in window order"
        );
        self.jobs.push_back(job);
    }

    /// Put a job back at the head. It must not start after the current head.
    pub fn push_front(&mut self, job: Job) {
        debug_assert!(
            self.jobs
                .front()
                .map_or(true, |head| job.window().since <= head.window().since),
            "job queue must stay in window order"
        );
        self.jobs.push_front(job);
    }

    pub fn front(&self) -> Option<&Job> {
        self.jobs.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut Job> {
        self.jobs.front_mut()
    }

    pub fn pop_front(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Completed jobs still waiting to be handed out.
    pub fn completed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.completed()).count()
    }

    /// Queued jobs that are not yet completed.
    pub fn in_flight(&self) -> usize {
        self.jobs.len() - self.completed_count()
    }

    /// The first `k` jobs from the head.
    pub fn lookahead(&self, k: usize) -> impl Iterator<Item = &Job> {
        self.jobs.iter().take(k)
    }

    pub fn lookahead_mut(&mut self, k: usize) -> impl Iterator<Item = &mut Job> {
        self.jobs.iter_mut().take(k)
    }
}
