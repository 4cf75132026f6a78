//! In-memory session store

use chrono::{DateTime, Utc};
use pleading_core::WorkflowState;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

/// Per-session workflow state keyed by session id.
///
/// Each state sits behind its own mutex so updates to one session are
/// serialized without blocking others. The map lock is held for the length
/// of an access, which keeps the sweeper from evicting a state mid-update.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Mutex<WorkflowState>>>,
    ttl: chrono::Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(chrono::Duration::hours(24))
    }
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl` of inactivity
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Snapshot of the session's state, creating a fresh one if needed.
    pub async fn get(&self, id: &str) -> WorkflowState {
        self.get_at(id, Utc::now()).await
    }

    pub async fn get_at(&self, id: &str, now: DateTime<Utc>) -> WorkflowState {
        self.access(id, now, |state| state.clone()).await
    }

    /// Runs `f` under the session's lock and stamps the state as updated.
    pub async fn update<F, R>(&self, id: &str, f: F) -> R
    where
        F: FnOnce(&mut WorkflowState) -> R,
    {
        self.update_at(id, Utc::now(), f).await
    }

    pub async fn update_at<F, R>(&self, id: &str, now: DateTime<Utc>, f: F) -> R
    where
        F: FnOnce(&mut WorkflowState) -> R,
    {
        self.access(id, now, |state| {
            let result = f(state);
            state.touch(now);
            result
        })
        .await
    }

    async fn access<F, R>(&self, id: &str, now: DateTime<Utc>, f: F) -> R
    where
        F: FnOnce(&mut WorkflowState) -> R,
    {
        {
            let sessions = self.sessions.read().await;
            if let Some(slot) = sessions.get(id) {
                let mut state = slot.lock().await;
                self.reset_if_expired(id, &mut state, now);
                return f(&mut state);
            }
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id = %id, "Created session");
            Mutex::new(WorkflowState::created_at(now))
        });
        let state = slot.get_mut();
        self.reset_if_expired(id, state, now);
        f(state)
    }

    fn reset_if_expired(&self, id: &str, state: &mut WorkflowState, now: DateTime<Utc>) {
        if state.is_expired(now, self.ttl) {
            tracing::info!(session_id = %id, "Session expired, starting over");
            *state = WorkflowState::created_at(now);
        }
    }

    #[cfg(test)]
    pub(crate) async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every session idle longer than the TTL, returning how many went.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, slot| !slot.get_mut().is_expired(now, ttl));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pleading_core::Step;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_creates_fresh_state() {
        let store = SessionStore::default();
        let state = store.get("abc").await;
        assert!(state.is_pristine());
        assert_eq!(state.current_step(), Step::CaseSetup);
        assert!(store.contains("abc").await);
    }

    #[tokio::test]
    async fn test_update_persists_and_touches() {
        let store = SessionStore::default();
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::minutes(5);
        store.get_at("abc", t0).await;

        let advanced = store
            .update_at("abc", t1, |state| {
                state.select_case_folder("/Cases/Smith");
                state.advance_to(Step::DocumentSelection)
            })
            .await;
        assert!(advanced);

        let state = store.get_at("abc", t1).await;
        assert_eq!(state.selected_case_folder(), Some("/Cases/Smith"));
        assert_eq!(state.current_step(), Step::DocumentSelection);
        assert_eq!(state.last_updated(), t1);
    }

    #[tokio::test]
    async fn test_expired_state_is_replaced() {
        let store = SessionStore::new(chrono::Duration::hours(1));
        let t0 = Utc::now();
        store
            .update_at("abc", t0, |state| {
                state.advance_to(Step::Review);
            })
            .await;

        let later = t0 + chrono::Duration::hours(1) + chrono::Duration::seconds(1);
        let state = store.get_at("abc", later).await;
        assert!(state.is_pristine());

        let exactly_ttl = t0 + chrono::Duration::hours(1);
        store
            .update_at("xyz", t0, |state| {
                state.advance_to(Step::Review);
            })
            .await;
        assert_eq!(store.get_at("xyz", exactly_ttl).await.current_step(), Step::Review);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = SessionStore::new(chrono::Duration::minutes(10));
        let t0 = Utc::now();
        store.update_at("old", t0, |_| ()).await;
        store
            .update_at("new", t0 + chrono::Duration::minutes(8), |_| ())
            .await;

        let removed = store
            .sweep_expired_at(t0 + chrono::Duration::minutes(11))
            .await;
        assert_eq!(removed, 1);
        assert!(!store.contains("old").await);
        assert!(store.contains("new").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let store = Arc::new(SessionStore::default());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update("shared", move |state| {
                        let mut docs = state.selected_documents().to_vec();
                        docs.push(format!("/Cases/Smith/doc_{}.pdf", i));
                        state.select_documents(docs);
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = store.get("shared").await;
        assert_eq!(state.selected_documents().len(), 64);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        store
            .update("a", |state| state.select_parent_folder("/Cases"))
            .await;
        assert_eq!(store.get("b").await.selected_parent_folder(), None);
        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
    }
}
