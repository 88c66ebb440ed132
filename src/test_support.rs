//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{ActionError, SourceError};
use crate::core::selection::Candidate;
use crate::inventory::{ActionInvoker, CandidateSource, Collaborators};

/// Answers immediately with a fixed list, or a fixed error.
pub struct StaticSource(pub Result<Vec<Candidate>, SourceError>);

#[async_trait]
impl CandidateSource for StaticSource {
    async fn list(&self) -> Result<Vec<Candidate>, SourceError> {
        self.0.clone()
    }
}

/// Never answers. Lets a test feed `CandidatesLoaded` itself.
pub struct PendingSource;

#[async_trait]
impl CandidateSource for PendingSource {
    async fn list(&self) -> Result<Vec<Candidate>, SourceError> {
        std::future::pending().await
    }
}

/// One recorded `interrupt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptCall {
    pub ids: HashSet<String>,
    pub timeout: Duration,
    pub force: bool,
}

/// Records every call, optionally sleeps, then returns a fixed result.
pub struct RecordingInvoker {
    pub calls: Mutex<Vec<InterruptCall>>,
    result: Result<(), ActionError>,
    delay: Duration,
}

impl RecordingInvoker {
    pub fn ok() -> Self {
        Self::returning(Ok(()))
    }

    pub fn returning(result: Result<(), ActionError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result,
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> Vec<InterruptCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionInvoker for RecordingInvoker {
    async fn interrupt(
        &self,
        ids: &HashSet<String>,
        timeout: Duration,
        force: bool,
    ) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(InterruptCall {
            ids: ids.clone(),
            timeout,
            force,
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

pub fn collaborators(
    source: impl CandidateSource + 'static,
    invoker: Arc<RecordingInvoker>,
) -> Collaborators {
    Collaborators {
        source: Arc::new(source),
        invoker,
    }
}

pub fn three_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("i-1", "web"),
        Candidate::new("i-2", ""),
        Candidate::new("i-3", "db"),
    ]
}
