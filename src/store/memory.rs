use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Project;

use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Created,
    Existing,
}

/// Keyed project store.
///
/// Projects live in a `DashMap` keyed by external project name; a second map
/// indexes session tokens to project names. Each request locks only the one
/// project it touches, so writers on the same project serialize instead of
/// overwriting each other.
///
/// Lock order: a project shard may be held while touching `sessions`, never
/// the other way round.
#[derive(Clone, Default)]
pub struct MemoryStore {
    projects: Arc<DashMap<String, Project>>,
    sessions: Arc<DashMap<String, String>>,
    dirty: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted projects, restoring live sessions.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        for project in snapshot.projects {
            if let Some(token) = &project.avalon {
                store
                    .sessions
                    .insert(token.clone(), project.project_id.clone());
            }
            store.projects.insert(project.project_id.clone(), project);
        }
        store
    }

    /// Create the project on first login, otherwise reuse it. Either way a new
    /// session token is issued and the previous one stops working.
    pub fn login(&self, project_id: &str) -> (String, LoginOutcome) {
        let token = Uuid::new_v4().simple().to_string();

        // The session index holds only the project's current token; it is
        // written while the project entry is locked.
        let outcome = match self.projects.entry(project_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if let Some(previous) = entry.get_mut().avalon.replace(token.clone()) {
                    self.sessions.remove(&previous);
                }
                self.sessions.insert(token.clone(), project_id.to_string());
                LoginOutcome::Existing
            }
            Entry::Vacant(entry) => {
                let _project = entry.insert(Project::new(project_id, token.clone()));
                self.sessions.insert(token.clone(), project_id.to_string());
                LoginOutcome::Created
            }
        };
        self.mark_dirty();

        tracing::debug!(project_id, ?outcome, "session issued");
        (token, outcome)
    }

    /// Detach the session from its project. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> bool {
        let Some((_, project_id)) = self.sessions.remove(token) else {
            return false;
        };
        if let Some(mut project) = self.projects.get_mut(&project_id) {
            if project.avalon.as_deref() == Some(token) {
                project.avalon = None;
            }
        }
        self.mark_dirty();
        true
    }

    /// Returns `true` if a project was removed.
    pub fn delete_project(&self, project_id: &str) -> bool {
        let Some((_, project)) = self.projects.remove(project_id) else {
            return false;
        };
        if let Some(token) = project.avalon {
            self.sessions.remove(&token);
        }
        self.mark_dirty();
        true
    }

    fn resolve(&self, token: &str) -> Result<String, AppError> {
        self.sessions
            .get(token)
            .map(|r| r.value().clone())
            .ok_or(AppError::ProjectNotFound)
    }

    /// Run `f` against the session's project.
    pub fn read<R>(
        &self,
        token: &str,
        f: impl FnOnce(&Project) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let project_id = self.resolve(token)?;
        let project = self
            .projects
            .get(&project_id)
            .ok_or(AppError::ProjectNotFound)?;
        if project.avalon.as_deref() != Some(token) {
            return Err(AppError::ProjectNotFound);
        }
        f(&project)
    }

    /// Run `f` with exclusive access to the session's project.
    pub fn update<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Project) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let project_id = self.resolve(token)?;
        let mut project = self
            .projects
            .get_mut(&project_id)
            .ok_or(AppError::ProjectNotFound)?;
        if project.avalon.as_deref() != Some(token) {
            return Err(AppError::ProjectNotFound);
        }
        let result = f(&mut project);
        if result.is_ok() {
            self.mark_dirty();
        }
        result
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Point-in-time copy of every project, ordered by creation.
    pub fn snapshot(&self) -> Snapshot {
        let mut projects: Vec<Project> = self.projects.iter().map(|r| r.value().clone()).collect();
        projects.sort_by_key(|p| p.id);
        Snapshot { projects }
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Returns whether anything changed since the last call, and resets it.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}
