//! One list controller for every complaint view.
//!
//! A [`ComplaintBoard`] loads complaints through a [`BoardBackend`], keeps
//! them (plus departments and staged status edits) as owned state, and
//! answers filtering, row, stats and transition queries for its
//! [`BoardView`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::text::timestamp_key;
use models::complaint::normalize_status;
use models::{Complaint, ComplaintStatus, Department, HistoryEntry};
use tracing::{debug, info, instrument};

use crate::admin::AdminService;
use crate::complaints::ComplaintService;
use crate::errors::ServiceError;

pub mod rows;
pub mod stats;
pub mod transitions;

pub use rows::ComplaintRow;
pub use stats::StatusCounts;
pub use transitions::{Transition, TransitionTable, DEPARTMENT_STATUSES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardView {
    Student,
    DepartmentQueue,
    DepartmentPage(ComplaintStatus),
    AdminAll,
    AdminQueue,
    AdminEscalations,
}

impl BoardView {
    pub fn is_admin(self) -> bool {
        matches!(self, BoardView::AdminAll | BoardView::AdminQueue | BoardView::AdminEscalations)
    }

    fn includes(self, complaint: &Complaint) -> bool {
        match self {
            BoardView::Student | BoardView::AdminAll => true,
            BoardView::DepartmentQueue => complaint.status_kind() == Some(ComplaintStatus::Assigned),
            BoardView::DepartmentPage(status) => complaint.status_kind() == Some(status),
            BoardView::AdminQueue => {
                complaint.is_unassigned() || complaint.status_kind() == Some(ComplaintStatus::Pending)
            }
            BoardView::AdminEscalations => complaint.status_kind() == Some(ComplaintStatus::Escalated),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub view: BoardView,
    pub row_limit: Option<usize>,
    pub title_width: usize,
    pub newest_first: bool,
    pub transitions: TransitionTable,
}

impl BoardConfig {
    pub fn for_view(view: BoardView) -> Self {
        let base = BoardConfig { view, row_limit: None, title_width: 40, newest_first: false, transitions: TransitionTable::ReadOnly };
        match view {
            BoardView::Student => BoardConfig { row_limit: Some(6), ..base },
            BoardView::DepartmentQueue => BoardConfig {
                row_limit: Some(12),
                title_width: 30,
                transitions: TransitionTable::Department,
                ..base
            },
            BoardView::DepartmentPage(_) => BoardConfig { newest_first: true, ..base },
            BoardView::AdminAll => BoardConfig { transitions: TransitionTable::Admin, ..base },
            BoardView::AdminQueue | BoardView::AdminEscalations => base,
        }
    }
}

/// Client-side search and status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                complaint.title.to_lowercase().contains(&term) || complaint.id.to_lowercase().contains(&term)
            }
            None => true,
        };
        let status_ok = match self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(status) => complaint.normalized_status() == normalize_status(status),
            None => true,
        };
        search_ok && status_ok
    }
}

/// Where a board gets its data and sends its edits.
#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// Admin views receive every complaint; others only the caller's own.
    async fn complaints(&self, view: BoardView) -> Result<Vec<Complaint>, ServiceError>;
    async fn departments(&self) -> Result<Vec<Department>, ServiceError>;
    async fn update_status(&self, view: BoardView, id: &str, status: ComplaintStatus) -> Result<Complaint, ServiceError>;
    async fn assign(&self, id: &str, department_id: &str) -> Result<Complaint, ServiceError>;
    async fn history(&self, id: &str) -> Result<Vec<HistoryEntry>, ServiceError>;
}

/// Backend over the HTTP services.
pub struct ApiBackend {
    complaints: Arc<ComplaintService>,
    admin: Arc<AdminService>,
}

impl ApiBackend {
    pub fn new(complaints: Arc<ComplaintService>, admin: Arc<AdminService>) -> Self { Self { complaints, admin } }
}

#[async_trait]
impl BoardBackend for ApiBackend {
    async fn complaints(&self, view: BoardView) -> Result<Vec<Complaint>, ServiceError> {
        if view.is_admin() {
            self.admin.all_complaints().await
        } else {
            self.complaints.my_complaints().await
        }
    }

    async fn departments(&self) -> Result<Vec<Department>, ServiceError> {
        self.admin.departments().await
    }

    async fn update_status(&self, view: BoardView, id: &str, status: ComplaintStatus) -> Result<Complaint, ServiceError> {
        if view.is_admin() {
            self.admin.update_status(id, status).await
        } else {
            self.complaints.update_status(id, status).await
        }
    }

    async fn assign(&self, id: &str, department_id: &str) -> Result<Complaint, ServiceError> {
        self.admin.assign(id, department_id).await
    }

    async fn history(&self, id: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.complaints.history(id).await
    }
}

pub struct ComplaintBoard<B: BoardBackend> {
    backend: B,
    config: BoardConfig,
    complaints: Vec<Complaint>,
    departments: Vec<Department>,
    pending_updates: BTreeMap<String, ComplaintStatus>,
}

impl<B: BoardBackend> ComplaintBoard<B> {
    pub fn new(backend: B, config: BoardConfig) -> Self {
        Self { backend, config, complaints: Vec::new(), departments: Vec::new(), pending_updates: BTreeMap::new() }
    }

    pub fn config(&self) -> &BoardConfig { &self.config }

    pub fn complaints(&self) -> &[Complaint] { &self.complaints }

    pub fn departments(&self) -> &[Department] { &self.departments }

    /// Reload complaints (and departments for the assignment queue).
    /// Staged edits are discarded.
    #[instrument(skip(self), fields(view = ?self.config.view))]
    pub async fn refresh(&mut self) -> Result<(), ServiceError> {
        self.complaints = self.backend.complaints(self.config.view).await?;
        if self.config.view == BoardView::AdminQueue {
            self.departments = self.backend.departments().await?;
        }
        self.pending_updates.clear();
        debug!(count = self.complaints.len(), "board loaded");
        Ok(())
    }

    /// Complaints this view shows after `filter`, ordered and capped.
    pub fn visible(&self, filter: &ListFilter) -> Vec<&Complaint> {
        let mut list: Vec<&Complaint> = self
            .complaints
            .iter()
            .filter(|c| self.config.view.includes(c) && filter.matches(c))
            .collect();
        if self.config.newest_first {
            list.sort_by(|a, b| {
                timestamp_key(b.created_at.as_deref()).cmp(&timestamp_key(a.created_at.as_deref()))
            });
        }
        if let Some(limit) = self.config.row_limit {
            list.truncate(limit);
        }
        list
    }

    pub fn rows(&self, filter: &ListFilter) -> Vec<ComplaintRow> {
        self.visible(filter)
            .into_iter()
            .map(|c| ComplaintRow::project(c, self.config.title_width))
            .collect()
    }

    /// Tallies over everything loaded, not just the visible slice.
    pub fn stats(&self) -> StatusCounts {
        StatusCounts::tally(&self.complaints)
    }

    fn find(&self, id: &str) -> Result<&Complaint, ServiceError> {
        self.complaints
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("Complaint"))
    }

    pub fn allowed_targets(&self, id: &str) -> Result<Vec<ComplaintStatus>, ServiceError> {
        let current = &self.find(id)?.status;
        Ok(self.config.transitions.targets(current))
    }

    /// Validate and send one status change. Returns `None` when `target`
    /// equals the current status; nothing is sent in that case.
    #[instrument(skip(self))]
    pub async fn change_status(&mut self, id: &str, target: &str) -> Result<Option<&Complaint>, ServiceError> {
        let current = self.find(id)?.status.clone();
        let next = match self.config.transitions.check(&current, target)? {
            Transition::NoChange => return Ok(None),
            Transition::Change(next) => next,
        };
        let updated = self.backend.update_status(self.config.view, id, next).await?;
        info!(from = %current, to = %next, "status changed");
        Ok(Some(self.merge(id, updated, Some(next))))
    }

    /// Record a status edit for the batch queue. Choosing the current
    /// status removes any staged edit for that complaint.
    pub fn stage(&mut self, id: &str, target: &str) -> Result<(), ServiceError> {
        let current = self.find(id)?.status.clone();
        match self.config.transitions.check(&current, target)? {
            Transition::NoChange => {
                self.pending_updates.remove(id);
            }
            Transition::Change(next) => {
                self.pending_updates.insert(id.to_string(), next);
            }
        }
        Ok(())
    }

    pub fn pending_updates(&self) -> &BTreeMap<String, ComplaintStatus> { &self.pending_updates }

    /// Send every staged edit, then reload. The first failure stops the
    /// batch and leaves the queue intact for another attempt.
    #[instrument(skip(self), fields(staged = self.pending_updates.len()))]
    pub async fn apply_staged(&mut self) -> Result<usize, ServiceError> {
        let staged: Vec<(String, ComplaintStatus)> =
            self.pending_updates.iter().map(|(id, s)| (id.clone(), *s)).collect();
        for (id, status) in &staged {
            self.backend.update_status(self.config.view, id, *status).await?;
        }
        self.refresh().await?;
        if !staged.is_empty() {
            info!(applied = staged.len(), "queue updated");
        }
        Ok(staged.len())
    }

    /// Assign a complaint to a known department.
    #[instrument(skip(self))]
    pub async fn assign(&mut self, id: &str, department_id: &str) -> Result<&Complaint, ServiceError> {
        if department_id.trim().is_empty() {
            return Err(ServiceError::validation("Please select a department first."));
        }
        self.find(id)?;
        if self.departments.is_empty() {
            self.departments = self.backend.departments().await?;
        }
        let department = self
            .departments
            .iter()
            .find(|d| d.id.as_deref() == Some(department_id))
            .ok_or_else(|| ServiceError::not_found("Department"))?;
        let name = department.name.clone();
        let mut updated = self.backend.assign(id, department_id).await?;
        if updated.department_id.is_none() {
            updated.department_id = Some(department_id.to_string());
        }
        if updated.department_name.is_none() && !name.is_empty() {
            updated.department_name = Some(name);
        }
        info!("assigned");
        Ok(self.merge(id, updated, None))
    }

    pub async fn history(&self, id: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.backend.history(id).await
    }

    fn merge(&mut self, id: &str, mut update: Complaint, status: Option<ComplaintStatus>) -> &Complaint {
        if update.status.is_empty() {
            if let Some(status) = status {
                update.status = status.as_str().to_string();
            }
        }
        let idx = match self.complaints.iter().position(|c| c.id == id) {
            Some(idx) => idx,
            None => {
                self.complaints.push(Complaint { id: id.to_string(), ..Default::default() });
                self.complaints.len() - 1
            }
        };
        let entry = &mut self.complaints[idx];
        entry.merge(update);
        entry
    }
}
