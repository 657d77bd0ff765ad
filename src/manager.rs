use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::api::TaskGateway;
use crate::error::TaskFlowError;
use crate::models::{Scope, Task, TaskCreateInput, TaskPatch, TaskStatus, TEMP_ID_PREFIX};
use crate::store::StatusCache;

/// What `fetch` does when the gateway listing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFailureMode {
    /// Degrade to an empty collection; the error is still recorded in the
    /// error slot so callers with an error channel can tell "no tasks" from
    /// "fetch failed".
    #[default]
    EmptyCollection,
    /// Leave the collection untouched and surface the error.
    Propagate,
}

#[derive(Debug, Clone, Default)]
pub struct ManagerConfig {
    pub list_failure: ListFailureMode,
}

#[derive(Default)]
struct ManagerState {
    tasks: Vec<Task>,
    scope: Option<Scope>,
    last_error: Option<String>,
    /// Latest issued request sequence number, per task id.
    seqs: HashMap<String, u64>,
    /// Latest issued whole-collection fetch sequence number.
    fetch_seq: u64,
}

impl ManagerState {
    fn next_seq(&mut self, task_id: &str) -> u64 {
        let seq = self.seqs.entry(task_id.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }

    fn is_latest(&self, task_id: &str, seq: u64) -> bool {
        self.seqs.get(task_id).copied() == Some(seq)
    }

    fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// Sole mutator of the in-memory task collection.
///
/// Every mutation is applied locally first, then reconciled with the server
/// response or rolled back to the pre-call snapshot on failure. Responses that
/// are no longer the latest issued request for their key do not commit, so a
/// slow stale reply cannot overwrite fresher state.
///
/// Locks are only held between awaits, never across them, so operations may
/// overlap freely on a shared manager.
pub struct TaskManager<G> {
    gateway: G,
    cache: StatusCache,
    config: ManagerConfig,
    state: Mutex<ManagerState>,
}

impl<G: TaskGateway> TaskManager<G> {
    pub fn new(gateway: G, cache: StatusCache) -> Self {
        Self::with_config(gateway, cache, ManagerConfig::default())
    }

    pub fn with_config(gateway: G, cache: StatusCache, config: ManagerConfig) -> Self {
        Self {
            gateway,
            cache,
            config,
            state: Mutex::new(ManagerState::default()),
        }
    }

    /// Snapshot of the current collection, newest-created first.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Message recorded by the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn scope(&self) -> Option<Scope> {
        self.state.lock().scope.clone()
    }

    pub fn set_scope(&self, scope: Scope) {
        self.state.lock().scope = Some(scope);
    }

    /// Replace the collection with the remote listing. Per-task status is
    /// resolved cache entry → server status → derived from `is_completed`.
    pub async fn fetch(&self, scope: &Scope) -> Result<Vec<Task>, TaskFlowError> {
        let seq = {
            let mut st = self.state.lock();
            st.last_error = None;
            st.scope = Some(scope.clone());
            st.fetch_seq += 1;
            st.fetch_seq
        };

        match self.gateway.list(scope).await {
            Ok(remote) => {
                let saved = self.cache.read();
                let mut st = self.state.lock();
                if seq != st.fetch_seq {
                    debug!(seq, latest = st.fetch_seq, "discarding stale fetch response");
                    return Ok(st.tasks.clone());
                }
                let merged: Vec<Task> = remote
                    .into_iter()
                    .map(|mut t| {
                        let status = saved
                            .get(&t.id)
                            .copied()
                            .unwrap_or_else(|| t.effective_status());
                        t.status = Some(status);
                        t
                    })
                    .collect();
                st.tasks = merged.clone();
                Ok(merged)
            }
            Err(e) => {
                let mut st = self.state.lock();
                st.last_error = Some(e.to_string());
                match self.config.list_failure {
                    ListFailureMode::EmptyCollection => {
                        warn!(err = %e, "task listing failed, degrading to empty collection");
                        if seq == st.fetch_seq {
                            st.tasks.clear();
                        }
                        Ok(Vec::new())
                    }
                    ListFailureMode::Propagate => Err(e),
                }
            }
        }
    }

    /// Optimistically insert a temporary task at the head of the collection,
    /// then swap it for the server record once the create call resolves.
    ///
    /// Fails synchronously, with no optimistic insert, when no scope is
    /// resolvable or the input is invalid.
    pub async fn create(
        &self,
        input: TaskCreateInput,
        scope: Option<Scope>,
    ) -> Result<Task, TaskFlowError> {
        self.state.lock().last_error = None;

        if let Err(e) = input.validate() {
            return Err(self.record(e));
        }
        let scope = match scope.or_else(|| self.state.lock().scope.clone()) {
            Some(s) => s,
            None => return Err(self.record(TaskFlowError::no_scope())),
        };

        let temp_id = format!("{TEMP_ID_PREFIX}{}", ulid::Ulid::new());
        let now = Utc::now().to_rfc3339();
        let optimistic = Task {
            id: temp_id.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            is_completed: false,
            status: Some(input.status.unwrap_or(TaskStatus::ToDo)),
            priority: None,
            created_at: now.clone(),
            updated_at: now,
            user_id: match &scope {
                Scope::User(id) => Some(id.clone()),
                Scope::Workspace(_) => None,
            },
            workspace_id: scope.workspace_id().map(str::to_string),
        };

        {
            let mut st = self.state.lock();
            st.scope = Some(scope.clone());
            st.tasks.insert(0, optimistic);
        }

        match self.gateway.create(&input, &scope).await {
            Ok(mut server) => {
                server.status = Some(server.effective_status());
                let mut st = self.state.lock();
                match st.position(&temp_id) {
                    Some(pos) => st.tasks[pos] = server.clone(),
                    // Temp entry already purged by a concurrent failure.
                    None => st.tasks.insert(0, server.clone()),
                }
                Ok(server)
            }
            Err(e) => {
                let mut st = self.state.lock();
                st.tasks.retain(|t| !t.is_temporary());
                st.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Flip a task's completion flag. Completing lands in DONE; un-completing
    /// always resets to TO_DO, discarding any prior IN_PROGRESS/REVIEW state.
    ///
    /// An id absent from the collection is a silent no-op.
    pub async fn toggle_complete(&self, task_id: &str) -> Result<Option<Task>, TaskFlowError> {
        let (snapshot, new_status, seq) = {
            let mut st = self.state.lock();
            st.last_error = None;
            let Some(pos) = st.position(task_id) else {
                return Ok(None);
            };
            let snapshot = st.tasks[pos].clone();
            let completed = !snapshot.is_completed;
            let new_status = if completed {
                TaskStatus::Done
            } else {
                TaskStatus::ToDo
            };
            let t = &mut st.tasks[pos];
            t.is_completed = completed;
            t.status = Some(new_status);
            let seq = st.next_seq(task_id);
            (snapshot, new_status, seq)
        };

        self.cache_write(task_id, new_status);

        match self.gateway.toggle_complete(task_id).await {
            Ok(mut server) => {
                // The locally computed status wins over the gateway's derived one.
                server.status = Some(new_status);
                let mut st = self.state.lock();
                if !st.is_latest(task_id, seq) {
                    debug!(task_id, seq, "discarding stale toggle response");
                    return Ok(st.tasks.iter().find(|t| t.id == task_id).cloned());
                }
                if let Some(pos) = st.position(task_id) {
                    st.tasks[pos] = server.clone();
                }
                Ok(Some(server))
            }
            Err(e) => {
                {
                    let mut st = self.state.lock();
                    if st.is_latest(task_id, seq) {
                        if let Some(pos) = st.position(task_id) {
                            st.tasks[pos] = snapshot.clone();
                        }
                    }
                    st.last_error = Some(e.to_string());
                }
                self.cache_write(task_id, snapshot.effective_status());
                Err(e)
            }
        }
    }

    /// Merge a patch into an existing task, restoring the exact pre-call
    /// value on failure. The task must exist locally.
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> Result<Task, TaskFlowError> {
        self.state.lock().last_error = None;

        if let Err(e) = patch.validate() {
            return Err(self.record(e));
        }

        let (snapshot, seq) = {
            let mut st = self.state.lock();
            let Some(pos) = st.position(task_id) else {
                let e = TaskFlowError::task_not_found_locally(task_id);
                st.last_error = Some(e.to_string());
                return Err(e);
            };
            let snapshot = st.tasks[pos].clone();
            let t = &mut st.tasks[pos];
            if let Some(ref title) = patch.title {
                t.title = title.clone();
            }
            if let Some(ref description) = patch.description {
                t.description = Some(description.clone());
            }
            if let Some(status) = patch.status {
                t.status = Some(status);
                t.is_completed = status == TaskStatus::Done;
            }
            let seq = st.next_seq(task_id);
            (snapshot, seq)
        };

        match self.gateway.update(task_id, &patch).await {
            Ok(mut server) => {
                server.status = Some(server.effective_status());
                let mut st = self.state.lock();
                if !st.is_latest(task_id, seq) {
                    debug!(task_id, seq, "discarding stale update response");
                    return Ok(st
                        .tasks
                        .iter()
                        .find(|t| t.id == task_id)
                        .cloned()
                        .unwrap_or(server));
                }
                if let Some(pos) = st.position(task_id) {
                    st.tasks[pos] = server.clone();
                }
                Ok(server)
            }
            Err(e) => {
                let mut st = self.state.lock();
                if st.is_latest(task_id, seq) {
                    if let Some(pos) = st.position(task_id) {
                        st.tasks[pos] = snapshot;
                    }
                }
                st.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Optimistically remove a task. On failure the entire pre-call
    /// collection is restored, putting the entry back at its original
    /// position.
    pub async fn delete(&self, task_id: &str) -> Result<(), TaskFlowError> {
        let (snapshot, seq) = {
            let mut st = self.state.lock();
            st.last_error = None;
            let snapshot = st.tasks.clone();
            st.tasks.retain(|t| t.id != task_id);
            let seq = st.next_seq(task_id);
            (snapshot, seq)
        };

        match self.gateway.delete(task_id).await {
            Ok(()) => {
                if let Err(e) = self.cache.remove(task_id) {
                    warn!(err = %e, "status cache prune failed");
                }
                Ok(())
            }
            Err(e) => {
                let mut st = self.state.lock();
                if st.is_latest(task_id, seq) {
                    st.tasks = snapshot;
                }
                st.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Kanban drag-drop: move a task to a column. Requires a workspace scope
    /// (resolved from the last fetch/create) and the task to exist locally.
    pub async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskFlowError> {
        self.state.lock().last_error = None;

        let Some(scope) = self.state.lock().scope.clone() else {
            return Err(self.record(TaskFlowError::no_scope()));
        };

        let (snapshot, seq) = {
            let mut st = self.state.lock();
            let Some(pos) = st.position(task_id) else {
                let e = TaskFlowError::task_not_found_locally(task_id);
                st.last_error = Some(e.to_string());
                return Err(e);
            };
            let snapshot = st.tasks[pos].clone();
            let t = &mut st.tasks[pos];
            t.status = Some(status);
            t.is_completed = status == TaskStatus::Done;
            let seq = st.next_seq(task_id);
            (snapshot, seq)
        };

        self.cache_write(task_id, status);

        match self.gateway.update_status(&scope, task_id, status).await {
            Ok(mut server) => {
                server.status = Some(server.effective_status());
                let mut st = self.state.lock();
                if !st.is_latest(task_id, seq) {
                    debug!(task_id, seq, "discarding stale status response");
                    return Ok(st
                        .tasks
                        .iter()
                        .find(|t| t.id == task_id)
                        .cloned()
                        .unwrap_or(server));
                }
                if let Some(pos) = st.position(task_id) {
                    st.tasks[pos] = server.clone();
                }
                Ok(server)
            }
            Err(e) => {
                {
                    let mut st = self.state.lock();
                    if st.is_latest(task_id, seq) {
                        if let Some(pos) = st.position(task_id) {
                            st.tasks[pos] = snapshot.clone();
                        }
                    }
                    st.last_error = Some(e.to_string());
                }
                self.cache_write(task_id, snapshot.effective_status());
                Err(e)
            }
        }
    }

    fn record(&self, e: TaskFlowError) -> TaskFlowError {
        self.state.lock().last_error = Some(e.to_string());
        e
    }

    // Cache writes are advisory; a failure must not fail the mutation.
    fn cache_write(&self, task_id: &str, status: TaskStatus) {
        if let Err(e) = self.cache.write(task_id, status) {
            warn!(err = %e, "status cache write failed");
        }
    }
}
