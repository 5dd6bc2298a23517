//! Fan-out of notifications over registry snapshots.
//!
//! Delivery is fire-and-forget: no retries, no backoff. A failing handle
//! never aborts delivery to the remaining handles; instead it lands on the
//! returned prune list, and the owning component decides the cascade.

use std::future::Future;

use crate::domain::error::NotifyError;

/// How a delivery failed. Controls log severity only; both kinds are pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    Unexpected,
}

impl From<&NotifyError> for FailureKind {
    fn from(error: &NotifyError) -> Self {
        match error {
            NotifyError::Unreachable(_) => Self::Unreachable,
            NotifyError::Unexpected(_) => Self::Unexpected,
        }
    }
}

/// A handle that failed during fan-out, identified by key and the
/// generation of the registration the snapshot was taken from.
#[derive(Debug, Clone)]
pub struct PrunedHandle<K> {
    pub key: K,
    pub generation: u64,
    pub kind: FailureKind,
}

/// Invokes `action` once per snapshot entry and collects the failures.
///
/// The action receives a copy of the entry's key so payloads can differ per
/// recipient. The snapshot comes from [`HandleRegistry::snapshot`], so
/// entries removed or replaced concurrently are still attempted here; the
/// generation stamp on the prune list lets the owner discard stale removals.
///
/// [`HandleRegistry::snapshot`]: crate::infrastructure::registry::HandleRegistry::snapshot
pub async fn dispatch_to_all<K, H, F, Fut>(
    snapshot: Vec<(K, H, u64)>,
    mut action: F,
) -> Vec<PrunedHandle<K>>
where
    K: std::fmt::Display + Clone,
    F: FnMut(K, H) -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    let mut pruned = Vec::new();
    for (key, handle, generation) in snapshot {
        match action(key.clone(), handle).await {
            Ok(()) => {}
            Err(error) => {
                let kind = FailureKind::from(&error);
                match kind {
                    FailureKind::Unreachable => {
                        tracing::warn!(key = %key, error = %error, "notification target unreachable, pruning");
                    }
                    FailureKind::Unexpected => {
                        tracing::error!(key = %key, error = %error, "notification delivery failed, pruning");
                    }
                }
                pruned.push(PrunedHandle {
                    key,
                    generation,
                    kind,
                });
            }
        }
    }
    pruned
}

/// Delivers to a single handle, reporting success.
pub async fn dispatch_to_one<H, F, Fut>(handle: H, action: F) -> bool
where
    F: FnOnce(H) -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    match action(handle).await {
        Ok(()) => true,
        Err(error) => {
            match FailureKind::from(&error) {
                FailureKind::Unreachable => {
                    tracing::warn!(error = %error, "notification target unreachable");
                }
                FailureKind::Unexpected => {
                    tracing::error!(error = %error, "notification delivery failed");
                }
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    enum FakeHandle {
        Healthy,
        Closed,
        Broken,
    }

    async fn deliver(handle: FakeHandle) -> Result<(), NotifyError> {
        match handle {
            FakeHandle::Healthy => Ok(()),
            FakeHandle::Closed => Err(NotifyError::Unreachable("channel closed".to_string())),
            FakeHandle::Broken => Err(NotifyError::Unexpected("serialization failed".to_string())),
        }
    }

    #[tokio::test]
    async fn test_one_bad_handle_does_not_abort_the_fan_out() {
        // given: a healthy handle on each side of a dead one
        let snapshot = vec![
            ("a".to_string(), FakeHandle::Healthy, 1),
            ("b".to_string(), FakeHandle::Closed, 2),
            ("c".to_string(), FakeHandle::Healthy, 3),
        ];

        // when:
        let pruned = dispatch_to_all(snapshot, |_key, handle| deliver(handle)).await;

        // then: only the dead handle is reported, with its generation
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].key, "b");
        assert_eq!(pruned[0].generation, 2);
        assert_eq!(pruned[0].kind, FailureKind::Unreachable);
    }

    #[tokio::test]
    async fn test_failures_are_classified_by_error_kind() {
        // given:
        let snapshot = vec![
            ("closed".to_string(), FakeHandle::Closed, 1),
            ("broken".to_string(), FakeHandle::Broken, 2),
        ];

        // when:
        let pruned = dispatch_to_all(snapshot, |_key, handle| deliver(handle)).await;

        // then:
        assert_eq!(pruned[0].kind, FailureKind::Unreachable);
        assert_eq!(pruned[1].kind, FailureKind::Unexpected);
    }

    #[tokio::test]
    async fn test_dispatch_to_one_reports_success() {
        // then:
        assert!(dispatch_to_one(FakeHandle::Healthy, deliver).await);
        assert!(!dispatch_to_one(FakeHandle::Closed, deliver).await);
    }

    #[tokio::test]
    async fn test_empty_snapshot_yields_no_prunes() {
        // given:
        let snapshot: Vec<(String, FakeHandle, u64)> = Vec::new();

        // when:
        let pruned = dispatch_to_all(snapshot, |_key, handle| deliver(handle)).await;

        // then:
        assert!(pruned.is_empty());
    }
}
