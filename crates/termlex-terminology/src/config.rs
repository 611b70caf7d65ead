//! Terminology service configuration

use serde::{Deserialize, Serialize};

/// Configuration for value-set resolution and concept expansion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminologyConfig {
    /// Base URL of the value-set source (documents fetched as `{base}/{oid}`)
    #[serde(default = "default_value_set_base_url")]
    pub value_set_base_url: String,

    /// Base URL of the concept service REST API
    #[serde(default = "default_concept_base_url")]
    pub concept_base_url: String,

    /// Base URL of the ticket-granting endpoint
    #[serde(default = "default_ticket_base_url")]
    pub ticket_base_url: String,

    /// Maximum entries per memoized lookup cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Seconds a cache entry may sit unused before eviction
    #[serde(default = "default_cache_idle_secs")]
    pub cache_idle_secs: u64,

    /// Per-request timeout for outbound calls (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Concurrent workers when expanding a value set's coded elements
    #[serde(default = "default_expansion_concurrency")]
    pub expansion_concurrency: usize,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            value_set_base_url: default_value_set_base_url(),
            concept_base_url: default_concept_base_url(),
            ticket_base_url: default_ticket_base_url(),
            cache_capacity: default_cache_capacity(),
            cache_idle_secs: default_cache_idle_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            expansion_concurrency: default_expansion_concurrency(),
        }
    }
}

fn default_value_set_base_url() -> String {
    "https://cts.nlm.nih.gov/fhir/ValueSet".to_string()
}

fn default_concept_base_url() -> String {
    "https://uts-ws.nlm.nih.gov/rest".to_string()
}

fn default_ticket_base_url() -> String {
    "https://utslogin.nlm.nih.gov/cas/v1/tickets".to_string()
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_cache_idle_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_expansion_concurrency() -> usize {
    8
}

/// Static credential pair for the value-set source (basic auth, not ticket
/// protected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}
