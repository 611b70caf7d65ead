//! Synonym resolution pipeline
//!
//! Ties the pieces together: a value set's OID is flattened to coded
//! elements, each element is expanded to its concept identifiers, and each
//! identifier is resolved to display names; the union is the synonym set an
//! NLP pipeline matches against free text.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{StreamExt, stream};

use termlex_auth::{Credentials, TicketProvider};
use termlex_core::CodedElement;

use crate::config::{BasicCredentials, TerminologyConfig};
use crate::error::{TerminologyError, TerminologyResult};
use crate::umls::ConceptExpander;
use crate::vsac::ValueSetResolver;

/// End-to-end resolver from value-set OIDs to synonym sets.
pub struct SynonymService {
    resolver: ValueSetResolver,
    expander: ConceptExpander,
    concurrency: usize,
}

impl SynonymService {
    /// Build the service from configuration and the two credential sets: a
    /// static basic-auth pair for the value-set source and ticket-exchange
    /// credentials for the concept service.
    pub fn new(
        config: &TerminologyConfig,
        value_set_credentials: BasicCredentials,
        concept_credentials: Credentials,
    ) -> TerminologyResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TerminologyError::HttpClient)?;

        let tickets = Arc::new(TicketProvider::new(
            http.clone(),
            &config.ticket_base_url,
            concept_credentials,
        ));
        let resolver = ValueSetResolver::new(
            http.clone(),
            &config.value_set_base_url,
            value_set_credentials,
        );
        let expander = ConceptExpander::new(
            http,
            &config.concept_base_url,
            tickets,
            config.cache_capacity,
            Duration::from_secs(config.cache_idle_secs),
        );

        Ok(Self {
            resolver,
            expander,
            concurrency: config.expansion_concurrency.max(1),
        })
    }

    /// Assemble from already-built parts; test and embedding use.
    pub fn from_parts(
        resolver: ValueSetResolver,
        expander: ConceptExpander,
        concurrency: usize,
    ) -> Self {
        Self {
            resolver,
            expander,
            concurrency: concurrency.max(1),
        }
    }

    /// The flat coded elements of the value set behind `oid`.
    pub async fn codes_for_oid(&self, oid: &str) -> TerminologyResult<HashSet<CodedElement>> {
        self.resolver.resolve_codes(oid).await
    }

    /// The display names the value-set documents themselves carry.
    pub async fn names_for_oid(&self, oid: &str) -> TerminologyResult<HashSet<String>> {
        self.resolver.resolve_display_names(oid).await
    }

    /// Full pipeline: codes, concept expansion, display-name union.
    ///
    /// Expansion fans out over the value set's elements with bounded
    /// concurrency. An element whose expansion fails transiently is skipped
    /// with a warning; authentication failures abort the whole resolution.
    pub async fn synonyms_for_oid(
        &self,
        oid: &str,
        traverse_hierarchy: bool,
    ) -> TerminologyResult<HashSet<String>> {
        let elements = self.resolver.resolve_codes(oid).await?;
        tracing::info!(oid, elements = elements.len(), "resolved value set, expanding concepts");

        let concepts = self.expand_all(elements, traverse_hierarchy).await?;
        tracing::info!(oid, concepts = concepts.len(), "expansion complete, resolving display names");

        let mut lookups = stream::iter(concepts.into_iter().map(|concept| async move {
            self.expander.display_names(&concept.code).await
        }))
        .buffer_unordered(self.concurrency);

        let mut synonyms = HashSet::new();
        while let Some(outcome) = lookups.next().await {
            synonyms.extend(outcome?.iter().cloned());
        }

        tracing::info!(oid, synonyms = synonyms.len(), "synonym resolution complete");
        Ok(synonyms)
    }

    async fn expand_all(
        &self,
        elements: HashSet<CodedElement>,
        traverse_hierarchy: bool,
    ) -> TerminologyResult<HashSet<CodedElement>> {
        let mut expansions = stream::iter(elements.into_iter().map(|element| async move {
            let expanded = self
                .expander
                .expand_concepts(&element, traverse_hierarchy)
                .await;
            (element, expanded)
        }))
        .buffer_unordered(self.concurrency);

        let mut concepts = HashSet::new();
        while let Some((element, expanded)) = expansions.next().await {
            match expanded {
                Ok(found) => concepts.extend(found),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::warn!(element = %element, %error, "concept expansion failed, skipping element");
                }
            }
        }
        Ok(concepts)
    }
}
