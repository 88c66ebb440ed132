//! JSON-over-HTTP inventory.
//!
//! Talks to a small inventory service that fronts the cloud API:
//! - `GET  {base}/instances` lists running Spot instances
//! - `POST {base}/interrupt` interrupts a set of them

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::error::{ActionError, SourceError};
use crate::core::selection::Candidate;
use crate::inventory::{ActionInvoker, CandidateSource};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct Tag {
    key: String,
    value: String,
}

#[derive(Deserialize, Debug)]
struct Instance {
    instance_id: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl Instance {
    /// The value of the `Name` tag, or empty when there is none.
    fn name(&self) -> &str {
        self.tags
            .iter()
            .find(|tag| tag.key == "Name")
            .map(|tag| tag.value.as_str())
            .unwrap_or("")
    }
}

impl From<Instance> for Candidate {
    fn from(instance: Instance) -> Self {
        let label = instance.name().to_string();
        Candidate {
            id: instance.instance_id,
            label,
        }
    }
}

#[derive(Serialize, Debug)]
struct InterruptRequest<'a> {
    instance_ids: Vec<&'a str>,
    timeout_secs: u64,
    force: bool,
}

// ============================================================================
// Client
// ============================================================================

pub struct HttpInventory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpInventory {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CandidateSource for HttpInventory {
    async fn list(&self) -> Result<Vec<Candidate>, SourceError> {
        let url = self.url("instances");
        info!("Listing Spot instances from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_builder() {
                SourceError::Config(e.to_string())
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let instances: Vec<Instance> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        debug!("Inventory returned {} instances", instances.len());

        Ok(instances.into_iter().map(Candidate::from).collect())
    }
}

#[async_trait]
impl ActionInvoker for HttpInventory {
    async fn interrupt(
        &self,
        ids: &HashSet<String>,
        timeout: Duration,
        force: bool,
    ) -> Result<(), ActionError> {
        let url = self.url("interrupt");
        let mut instance_ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        instance_ids.sort_unstable();
        info!(
            "Interrupting {} instances via {} (force={})",
            instance_ids.len(),
            url,
            force
        );

        let body = InterruptRequest {
            instance_ids,
            timeout_secs: timeout.as_secs(),
            force,
        };

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ActionError::TimedOut(timeout)
                } else {
                    ActionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ActionError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
