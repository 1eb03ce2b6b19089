//! Per-user conversation state and the registry of running file jobs.

use std::collections::HashMap;

use dyxless_client::QueryType;
use tokio::sync::RwLock;

/// Where a user is in the conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    WaitingForFile,
    WaitingForSingleQuery { query_type: QueryType },
}

#[derive(Debug, Default)]
pub struct SessionStore {
    states: RwLock<HashMap<i64, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> SessionState {
        self.states
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, user_id: i64, state: SessionState) {
        let mut states = self.states.write().await;
        if state == SessionState::Idle {
            states.remove(&user_id);
        } else {
            states.insert(user_id, state);
        }
    }

    /// Returns the previous state.
    pub async fn reset(&self, user_id: i64) -> SessionState {
        self.states
            .write()
            .await
            .remove(&user_id)
            .unwrap_or_default()
    }
}

/// User id → checkpoint id of the file job that user is running.
#[derive(Debug, Default)]
pub struct ActiveTasks {
    tasks: RwLock<HashMap<i64, String>>,
}

impl ActiveTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job; `false` when the user already has one.
    pub async fn try_register(&self, user_id: i64, checkpoint_id: &str) -> bool {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&user_id) {
            return false;
        }
        tasks.insert(user_id, checkpoint_id.to_string());
        true
    }

    pub async fn get(&self, user_id: i64) -> Option<String> {
        self.tasks.read().await.get(&user_id).cloned()
    }

    pub async fn is_active(&self, user_id: i64) -> bool {
        self.tasks.read().await.contains_key(&user_id)
    }

    pub async fn clear(&self, user_id: i64) {
        self.tasks.write().await.remove(&user_id);
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_defaults_to_idle() {
        let store = SessionStore::new();
        assert_eq!(store.get(1).await, SessionState::Idle);

        store.set(1, SessionState::WaitingForFile).await;
        assert_eq!(store.get(1).await, SessionState::WaitingForFile);
        assert_eq!(store.get(2).await, SessionState::Idle);

        assert_eq!(store.reset(1).await, SessionState::WaitingForFile);
        assert_eq!(store.reset(1).await, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_one_task_per_user() {
        let tasks = ActiveTasks::new();
        assert!(tasks.try_register(1, "aaa").await);
        assert!(!tasks.try_register(1, "bbb").await);
        assert!(tasks.try_register(2, "ccc").await);
        assert_eq!(tasks.get(1).await.as_deref(), Some("aaa"));

        tasks.clear(1).await;
        assert!(!tasks.is_active(1).await);
        assert_eq!(tasks.len().await, 1);
    }
}
