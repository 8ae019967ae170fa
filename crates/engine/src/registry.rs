// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory job registry.
//!
//! The single source of truth for job state. Every record and every live
//! execution handle sits behind one mutex, so callers never observe a
//! half-applied transition and a record turning terminal always drops its
//! handle in the same critical section.

use crate::error::JobError;
use crate::handle::ExecutionHandle;
use indexmap::IndexMap;
use mb_core::{JobId, JobRecord, TransitionError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct RegistryState {
    /// Records in creation order
    jobs: IndexMap<JobId, JobRecord>,
    /// Handles of live jobs only
    handles: HashMap<JobId, ExecutionHandle>,
}

/// Shared, thread-safe store of job records and execution handles.
///
/// Cloning is cheap; all clones see the same state.
#[derive(Clone, Default)]
pub struct JobRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. The id must not already be present.
    pub fn create(&self, record: JobRecord) -> Result<JobId, JobError> {
        let mut state = self.state.lock();
        let id = record.id().clone();
        if state.jobs.contains_key(&id) {
            return Err(JobError::IdCollision(id));
        }
        state.jobs.insert(id.clone(), record);
        Ok(id)
    }

    /// Snapshot of one record.
    pub fn get(&self, id: &str) -> Result<JobRecord, JobError> {
        self.state.lock().jobs.get(id).cloned().ok_or_else(|| JobError::NotFound(id.into()))
    }

    /// Apply `f` to a record under the registry lock.
    pub fn update<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut JobRecord) -> R,
    ) -> Result<R, JobError> {
        let mut state = self.state.lock();
        let record = state.jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.into()))?;
        Ok(f(record))
    }

    /// Remove a record. A handle still registered for it is cancelled and
    /// dropped with it.
    pub fn delete(&self, id: &str) -> Result<JobRecord, JobError> {
        let mut state = self.state.lock();
        let record = state.jobs.shift_remove(id).ok_or_else(|| JobError::NotFound(id.into()))?;
        if let Some(handle) = state.handles.remove(id) {
            handle.cancel();
        }
        Ok(record)
    }

    /// Snapshot of all records in creation order.
    pub fn list(&self) -> Vec<JobRecord> {
        self.state.lock().jobs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().jobs.is_empty()
    }

    pub fn has_handle(&self, id: &str) -> bool {
        self.state.lock().handles.contains_key(id)
    }

    pub fn handle_count(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// Register the execution handle of a live job.
    pub(crate) fn attach_handle(&self, id: &JobId, handle: ExecutionHandle) -> Result<(), JobError> {
        let mut state = self.state.lock();
        let record = state.jobs.get(id).ok_or_else(|| JobError::NotFound(id.clone()))?;
        if record.is_terminal() {
            return Err(JobError::AlreadyTerminal(id.clone(), record.status()));
        }
        state.handles.insert(id.clone(), handle);
        Ok(())
    }

    /// Apply a terminal transition and drop the job's handle atomically.
    ///
    /// A stale handle is dropped even when the transition is rejected, so a
    /// terminal record never keeps one.
    pub(crate) fn finish(
        &self,
        id: &str,
        transition: impl FnOnce(&mut JobRecord) -> Result<(), TransitionError>,
    ) -> Result<JobRecord, JobError> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let record = state.jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.into()))?;
        let applied = transition(record);
        if record.is_terminal() {
            state.handles.remove(id);
        }
        applied?;
        Ok(record.clone())
    }

    /// Cancel a live job: mark it `cancelled` and hand back its handle so the
    /// caller can signal the execution.
    ///
    /// Fails with `NotFound` when the job is unknown or has no handle yet, and
    /// with `AlreadyTerminal` when it has already finished.
    pub(crate) fn cancel(
        &self,
        id: &str,
        message: &str,
        at_ms: u64,
    ) -> Result<(JobRecord, ExecutionHandle), JobError> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let record = state.jobs.get_mut(id).ok_or_else(|| JobError::NotFound(id.into()))?;
        if record.is_terminal() {
            return Err(JobError::AlreadyTerminal(record.id().clone(), record.status()));
        }
        if !state.handles.contains_key(id) {
            return Err(JobError::NotFound(record.id().clone()));
        }
        record.cancel(message, at_ms)?;
        let snapshot = record.clone();
        let handle = state.handles.remove(id).ok_or_else(|| JobError::NotFound(id.into()))?;
        Ok((snapshot, handle))
    }

    /// Ids of jobs that still have a handle.
    pub(crate) fn live_ids(&self) -> Vec<JobId> {
        self.state.lock().handles.keys().cloned().collect()
    }

    /// Remove every record matching `pred`, returning their ids.
    pub(crate) fn remove_where(&self, pred: impl Fn(&JobRecord) -> bool) -> Vec<JobId> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let mut removed = Vec::new();
        state.jobs.retain(|id, record| {
            if pred(record) {
                removed.push(id.clone());
                false
            } else {
                true
            }
        });
        for id in &removed {
            if let Some(handle) = state.handles.remove(id) {
                handle.cancel();
            }
        }
        removed
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
