//! Account session registry enforcing a single live session per account.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Tracks which accounts currently hold a live connection.
///
/// Registration is first-wins: a second connection for an account that
/// already holds a session is rejected, and the caller is expected to close
/// it. A secondary name index supports removal by display name, used when a
/// moderation action only knows the name.
pub struct SessionRegistry {
    inner: Mutex<SessionRegistryInner>,
}

#[derive(Default)]
struct SessionRegistryInner {
    by_account: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SessionRegistryInner::default()),
        }
    }

    /// Atomically claims a session for the account. Returns `false` when the
    /// account already holds one; the registry is left unchanged in that case.
    pub async fn try_register(&self, account_id: i64, account_name: &str) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.by_account.contains_key(&account_id) {
            return false;
        }
        let normalized = normalize_name(account_name);
        inner.by_account.insert(account_id, normalized.clone());
        if !normalized.is_empty() {
            inner.by_name.insert(normalized, account_id);
        }
        true
    }

    pub async fn has_active_session(&self, account_id: i64) -> bool {
        self.inner.lock().await.by_account.contains_key(&account_id)
    }

    /// Removes the account's session. Idempotent.
    pub async fn remove(&self, account_id: i64) {
        let mut inner = self.inner.lock().await;
        if let Some(name) = inner.by_account.remove(&account_id) {
            // Only drop the name entry if it still points at this account.
            if inner.by_name.get(&name) == Some(&account_id) {
                inner.by_name.remove(&name);
            }
        }
    }

    /// Removes the session of the account with the given display name,
    /// case-insensitively. Blank names are a silent no-op.
    pub async fn remove_by_name(&self, account_name: &str) {
        let normalized = normalize_name(account_name);
        if normalized.is_empty() {
            return;
        }
        let mut inner = self.inner.lock().await;
        if let Some(account_id) = inner.by_name.remove(&normalized) {
            inner.by_account.remove(&account_id);
        }
    }

    pub async fn count(&self) -> usize {
        self.inner.lock().await.by_account.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
