//! Retry decorator for the inventory collaborators.
//!
//! Wraps a `CandidateSource` / `ActionInvoker` and re-attempts failures the
//! error marks as retryable. The event loop itself makes exactly one call per
//! collaborator; any retrying happens in here.
//!
//! Every interrupt attempt gets the full action timeout, so the loop's
//! deadline for a retried interrupt covers all attempts plus the backoff
//! between them (see `RetryPolicy::deadline`).

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;

use crate::core::config::RetryPolicy;
use crate::core::error::{ActionError, SourceError};
use crate::core::selection::Candidate;
use crate::inventory::{ActionInvoker, CandidateSource};

pub struct Retrying<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> Retrying<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

async fn with_retry<F, Fut, V, E>(
    what: &str,
    policy: RetryPolicy,
    retryable: impl Fn(&E) -> bool,
    mut call: F,
) -> Result<V, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<V, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match call().await {
            Err(e) if attempt < attempts && retryable(&e) => {
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    what, attempt, attempts, e, policy.backoff
                );
                if policy.backoff > Duration::ZERO {
                    tokio::time::sleep(policy.backoff).await;
                }
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[async_trait]
impl<T: CandidateSource> CandidateSource for Retrying<T> {
    async fn list(&self) -> Result<Vec<Candidate>, SourceError> {
        with_retry("list", self.policy, SourceError::is_retryable, || {
            self.inner.list()
        })
        .await
    }
}

#[async_trait]
impl<T: ActionInvoker> ActionInvoker for Retrying<T> {
    async fn interrupt(
        &self,
        ids: &HashSet<String>,
        timeout: Duration,
        force: bool,
    ) -> Result<(), ActionError> {
        with_retry("interrupt", self.policy, ActionError::is_retryable, || {
            self.inner.interrupt(ids, timeout, force)
        })
        .await
    }

    fn deadline(&self, timeout: Duration) -> Duration {
        self.policy.deadline(self.inner.deadline(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fails with the queued errors first, then succeeds.
    struct Flaky {
        source_errors: Mutex<Vec<SourceError>>,
        action_errors: Mutex<Vec<ActionError>>,
        calls: Mutex<u32>,
    }

    impl Flaky {
        fn new(source_errors: Vec<SourceError>, action_errors: Vec<ActionError>) -> Self {
            Self {
                source_errors: Mutex::new(source_errors),
                action_errors: Mutex::new(action_errors),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CandidateSource for Flaky {
        async fn list(&self) -> Result<Vec<Candidate>, SourceError> {
            *self.calls.lock().unwrap() += 1;
            match self.source_errors.lock().unwrap().pop() {
                Some(e) => Err(e),
                None => Ok(vec![Candidate::new("i-1", "web")]),
            }
        }
    }

    #[async_trait]
    impl ActionInvoker for Flaky {
        async fn interrupt(
            &self,
            _ids: &HashSet<String>,
            _timeout: Duration,
            _force: bool,
        ) -> Result<(), ActionError> {
            *self.calls.lock().unwrap() += 1;
            match self.action_errors.lock().unwrap().pop() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_deadline_covers_every_attempt_and_backoff() {
        let flaky = Flaky::new(Vec::new(), Vec::new());
        let retrying = Retrying::new(
            flaky,
            RetryPolicy {
                attempts: 3,
                backoff: Duration::from_millis(500),
            },
        );
        assert_eq!(
            retrying.deadline(Duration::from_secs(15)),
            Duration::from_secs(46)
        );
        let single = Retrying::new(Flaky::new(Vec::new(), Vec::new()), policy(1));
        assert_eq!(single.deadline(Duration::from_secs(15)), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_retries_retryable_source_errors() {
        let flaky = Flaky::new(
            vec![
                SourceError::Network("reset".into()),
                SourceError::Status {
                    status: 503,
                    message: "busy".into(),
                },
            ],
            Vec::new(),
        );
        let retrying = Retrying::new(flaky, policy(3));
        let list = retrying.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(retrying.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let flaky = Flaky::new(
            vec![
                SourceError::Network("third".into()),
                SourceError::Network("second".into()),
                SourceError::Network("first".into()),
            ],
            Vec::new(),
        );
        let retrying = Retrying::new(flaky, policy(2));
        let err = retrying.list().await.unwrap_err();
        assert_eq!(err, SourceError::Network("second".into()));
        assert_eq!(retrying.inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let flaky = Flaky::new(
            Vec::new(),
            vec![ActionError::Status {
                status: 403,
                message: "denied".into(),
            }],
        );
        let retrying = Retrying::new(flaky, policy(5));
        let ids: HashSet<String> = ["i-1".to_string()].into();
        let result = retrying
            .interrupt(&ids, Duration::from_secs(15), true)
            .await;
        assert!(matches!(result, Err(ActionError::Status { status: 403, .. })));
        assert_eq!(retrying.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_calls_once() {
        let flaky = Flaky::new(vec![SourceError::Network("down".into())], Vec::new());
        let retrying = Retrying::new(flaky, policy(1));
        assert!(retrying.list().await.is_err());
        assert_eq!(retrying.inner.calls(), 1);
    }
}
