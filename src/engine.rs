use crate::models::AccountingRecord;
use std::collections::HashMap;

/// What the aggregator did with a record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecordOutcome {
    /// Opened a new job entry.
    Accepted,
    /// Updated memory usage of an existing job.
    Merged,
    /// Not a grid job and no entry to update.
    Discarded,
}

/// Collapses sacct job and job-step lines into one record per job id,
/// keeping the order in which jobs were first accepted.
#[derive(Debug, Default)]
pub struct JobAggregator {
    jobs: Vec<AccountingRecord>,
    index: HashMap<String, usize>,
}

impl JobAggregator {
    /// Creates an empty `JobAggregator`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a single accounting record.
    pub fn process(&mut self, record: AccountingRecord) -> RecordOutcome {
        let job_id = record.logical_job_id();

        if let Some(&pos) = self.index.get(job_id) {
            self.jobs[pos].merge_step_usage(&record);
            return RecordOutcome::Merged;
        }

        if !record.is_grid_job() {
            return RecordOutcome::Discarded;
        }

        let job_id = job_id.to_string();
        self.index.insert(job_id, self.jobs.len());
        self.jobs.push(record);
        RecordOutcome::Accepted
    }

    /// Looks up the aggregated record for a logical job id.
    #[cfg(test)]
    pub fn get(&self, job_id: &str) -> Option<&AccountingRecord> {
        self.index.get(job_id).map(|&pos| &self.jobs[pos])
    }

    /// Aggregated jobs in first-acceptance order.
    pub fn jobs(&self) -> &[AccountingRecord] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}
