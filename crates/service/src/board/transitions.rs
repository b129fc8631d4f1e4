use models::complaint::normalize_status;
use models::ComplaintStatus;

use crate::errors::ServiceError;

use ComplaintStatus::*;

/// Statuses a department may set on complaints assigned to it.
pub const DEPARTMENT_STATUSES: [ComplaintStatus; 4] = [Assigned, InProgress, Resolved, Escalated];

/// Which status changes a board permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTable {
    /// Workflow-ordered moves; resolved and rejected are terminal.
    Admin,
    /// Any status from [`DEPARTMENT_STATUSES`].
    Department,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    NoChange,
    Change(ComplaintStatus),
}

fn admin_targets(from: ComplaintStatus) -> &'static [ComplaintStatus] {
    match from {
        Pending => &[Assigned, Rejected],
        Assigned => &[InProgress, Resolved, Escalated],
        InProgress => &[Resolved, Escalated],
        Escalated => &[InProgress, Resolved, Rejected],
        Resolved | Rejected => &[],
    }
}

impl TransitionTable {
    /// Statuses reachable from `current`, excluding `current` itself.
    pub fn targets(self, current: &str) -> Vec<ComplaintStatus> {
        let from = ComplaintStatus::parse(current);
        match self {
            TransitionTable::Admin => from.map(|s| admin_targets(s).to_vec()).unwrap_or_default(),
            TransitionTable::Department => DEPARTMENT_STATUSES.into_iter().filter(|s| Some(*s) != from).collect(),
            TransitionTable::ReadOnly => Vec::new(),
        }
    }

    /// Validate a requested change before anything is sent.
    pub fn check(self, current: &str, target: &str) -> Result<Transition, ServiceError> {
        let wanted = normalize_status(target);
        if wanted == normalize_status(current) {
            return Ok(Transition::NoChange);
        }
        let next = ComplaintStatus::parse(&wanted)
            .ok_or_else(|| ServiceError::validation(format!("Unknown status: {wanted}.")))?;
        if self.targets(current).contains(&next) {
            Ok(Transition::Change(next))
        } else {
            Err(ServiceError::validation(format!(
                "Cannot change status from {} to {}.",
                status_text(current),
                next.label()
            )))
        }
    }
}

fn status_text(raw: &str) -> String {
    ComplaintStatus::parse(raw)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| normalize_status(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_workflow() {
        let t = TransitionTable::Admin;
        assert_eq!(t.targets("pending"), vec![Assigned, Rejected]);
        assert_eq!(t.targets("In Progress"), vec![Resolved, Escalated]);
        assert!(t.targets("resolved").is_empty());
        assert!(t.targets("rejected").is_empty());
        assert_eq!(t.check("escalated", "rejected").ok(), Some(Transition::Change(Rejected)));
    }

    #[test]
    fn same_status_is_a_no_op_even_when_terminal() {
        assert_eq!(TransitionTable::Admin.check("Resolved", "resolved").ok(), Some(Transition::NoChange));
        assert_eq!(TransitionTable::ReadOnly.check("pending", "pending").ok(), Some(Transition::NoChange));
    }

    #[test]
    fn disallowed_targets_are_rejected() {
        let err = TransitionTable::Admin.check("pending", "resolved").unwrap_err();
        assert_eq!(err.to_string(), "Cannot change status from Pending to Resolved.");
        assert!(TransitionTable::Admin.check("resolved", "pending").is_err());
        assert!(TransitionTable::Department.check("assigned", "rejected").is_err());
        assert!(TransitionTable::Department.check("assigned", "bogus").is_err());
    }

    #[test]
    fn department_vocabulary() {
        assert_eq!(TransitionTable::Department.check("assigned", "In Progress").ok(), Some(Transition::Change(InProgress)));
        assert_eq!(TransitionTable::Department.targets("assigned"), vec![InProgress, Resolved, Escalated]);
    }
}
