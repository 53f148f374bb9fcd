use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationState {
    Ready,
    NotConfigured,
}

impl IntegrationState {
    pub fn from_configured(configured: bool) -> Self {
        if configured {
            IntegrationState::Ready
        } else {
            IntegrationState::NotConfigured
        }
    }
}

/// Which external integrations are wired in the current configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub services: BTreeMap<String, IntegrationState>,
}
