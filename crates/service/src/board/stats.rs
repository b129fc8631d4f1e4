use models::{Complaint, ComplaintStatus};
use serde::Serialize;

/// Per-status tallies over a complaint list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub escalated: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        let mut counts = StatusCounts::default();
        for complaint in complaints {
            counts.total += 1;
            match complaint.status_kind() {
                Some(ComplaintStatus::Pending) => counts.pending += 1,
                Some(ComplaintStatus::Assigned) => counts.assigned += 1,
                Some(ComplaintStatus::InProgress) => counts.in_progress += 1,
                Some(ComplaintStatus::Resolved) => counts.resolved += 1,
                Some(ComplaintStatus::Escalated) => counts.escalated += 1,
                Some(ComplaintStatus::Rejected) => counts.rejected += 1,
                None => {}
            }
        }
        counts
    }

    /// Still awaiting an outcome: pending, assigned or in progress.
    pub fn open(&self) -> usize {
        self.pending + self.assigned + self.in_progress
    }
}
