//! # Inventory
//!
//! The two collaborators the selector talks to: something that lists
//! candidates and something that interrupts them. The core only ever sees
//! these traits.

pub mod http;
pub mod retry;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::error::{ActionError, SourceError};
use crate::core::selection::Candidate;

pub use http::HttpInventory;
pub use retry::Retrying;

#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Returns the instances that can currently be interrupted, in display order.
    async fn list(&self) -> Result<Vec<Candidate>, SourceError>;
}

#[async_trait]
pub trait ActionInvoker: Send + Sync {
    /// Interrupts every instance in `ids`. `timeout` bounds the whole call;
    /// `force` is passed through to the inventory untouched.
    async fn interrupt(
        &self,
        ids: &HashSet<String>,
        timeout: Duration,
        force: bool,
    ) -> Result<(), ActionError>;

    /// How long the event loop waits for `interrupt` before giving up.
    /// Implementations that call out more than once stretch this.
    fn deadline(&self, timeout: Duration) -> Duration {
        timeout
    }
}

/// The pair of collaborators one session runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn CandidateSource>,
    pub invoker: Arc<dyn ActionInvoker>,
}

/// Build the HTTP inventory from resolved config, wrapped in the retry
/// decorator when more than one attempt is configured.
pub fn build_collaborators(config: &ResolvedConfig) -> Collaborators {
    let inventory = HttpInventory::new(config.base_url.clone());
    if config.retry.attempts > 1 {
        info!(
            "Retrying inventory calls up to {} times ({:?} backoff)",
            config.retry.attempts, config.retry.backoff
        );
        let retrying = Arc::new(Retrying::new(inventory, config.retry));
        Collaborators {
            source: retrying.clone(),
            invoker: retrying,
        }
    } else {
        let inventory = Arc::new(inventory);
        Collaborators {
            source: inventory.clone(),
            invoker: inventory,
        }
    }
}
