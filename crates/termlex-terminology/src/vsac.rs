//! Value-set graph resolution
//!
//! Fetches value-set documents by OID from the value-set source and flattens
//! the composition graph (includes, excludes, references to other value sets,
//! possibly cyclic) into a plain set of coded elements or display names.
//!
//! Traversal state is explicit: the visited-OID set is a parameter threaded
//! through the recursion, created fresh for every top-level call, so two
//! independent resolutions of the same OID never interfere. Documents without
//! an id cannot be marked visited and are therefore never descended into;
//! they contribute their direct concepts only.

use std::collections::HashSet;

use termlex_core::{CodedElement, ValueSetDocument, last_segment, validate_oid};

use crate::config::BasicCredentials;
use crate::error::{TerminologyError, TerminologyResult};

/// Resolves value-set composition graphs against a document source.
///
/// The source is authenticated with a static basic-auth pair; it is not part
/// of the ticket-protected concept service.
pub struct ValueSetResolver {
    http: reqwest::Client,
    base_url: String,
    credentials: BasicCredentials,
}

impl ValueSetResolver {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: BasicCredentials,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Fetch the document for one OID.
    pub async fn fetch(&self, oid: &str) -> TerminologyResult<ValueSetDocument> {
        validate_oid(oid)?;
        let url = format!("{}/{}", self.base_url, oid);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TerminologyError::value_set_source(oid, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| TerminologyError::value_set_source(oid, e))?;
        Ok(ValueSetDocument::from_json(&body)?)
    }

    /// Flatten the value set behind `oid` to its coded elements.
    pub async fn resolve_codes(&self, oid: &str) -> TerminologyResult<HashSet<CodedElement>> {
        let document = self.fetch(oid).await?;
        let mut result = HashSet::new();
        let mut visited = HashSet::new();
        self.resolve_codes_recurs(&document, &mut result, &mut visited)
            .await;
        Ok(result)
    }

    /// Flatten the value set behind `oid` to the display names it carries.
    pub async fn resolve_display_names(&self, oid: &str) -> TerminologyResult<HashSet<String>> {
        let document = self.fetch(oid).await?;
        let mut result = HashSet::new();
        let mut visited = HashSet::new();
        self.resolve_names_recurs(&document, &mut result, &mut visited)
            .await;
        Ok(result)
    }

    async fn resolve_codes_recurs(
        &self,
        document: &ValueSetDocument,
        result: &mut HashSet<CodedElement>,
        visited: &mut HashSet<String>,
    ) {
        let Some(id) = document.id.as_deref() else {
            // Cannot be marked visited, so never descend: an anonymous node in
            // a cycle would otherwise recurse forever. Its direct concepts are
            // still real data.
            tracing::warn!(
                "value set document has no id; keeping direct concepts, not descending"
            );
            for entry in &document.compose.include {
                result.extend(entry.coded_elements());
            }
            for entry in &document.compose.exclude {
                for element in entry.coded_elements() {
                    result.remove(&element);
                }
            }
            return;
        };
        if !visited.insert(id.to_string()) {
            return;
        }

        // All includes land before any exclude is applied, so excludes strip
        // from this node's own union, not from an ancestor's.
        for entry in &document.compose.include {
            result.extend(entry.coded_elements());
            for reference in &entry.value_set {
                let mut child = HashSet::new();
                self.resolve_child_codes(reference, &mut child, visited).await;
                result.extend(child);
            }
        }
        for entry in &document.compose.exclude {
            for element in entry.coded_elements() {
                result.remove(&element);
            }
            for reference in &entry.value_set {
                let mut child = HashSet::new();
                self.resolve_child_codes(reference, &mut child, visited).await;
                for element in &child {
                    result.remove(element);
                }
            }
        }
    }

    async fn resolve_child_codes(
        &self,
        reference: &str,
        into: &mut HashSet<CodedElement>,
        visited: &mut HashSet<String>,
    ) {
        let oid = last_segment(reference);
        match self.fetch(oid).await {
            Ok(document) => {
                Box::pin(self.resolve_codes_recurs(&document, into, visited)).await;
            }
            Err(error) => {
                tracing::warn!(oid, %error, "failed to fetch referenced value set, treating as empty");
            }
        }
    }

    async fn resolve_names_recurs(
        &self,
        document: &ValueSetDocument,
        result: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) {
        let Some(id) = document.id.as_deref() else {
            tracing::warn!(
                "value set document has no id; keeping direct concepts, not descending"
            );
            for entry in &document.compose.include {
                result.extend(entry.display_names().map(str::to_string));
            }
            for entry in &document.compose.exclude {
                for name in entry.display_names() {
                    result.remove(name);
                }
            }
            return;
        };
        if !visited.insert(id.to_string()) {
            return;
        }

        for entry in &document.compose.include {
            result.extend(entry.display_names().map(str::to_string));
            for reference in &entry.value_set {
                let mut child = HashSet::new();
                self.resolve_child_names(reference, &mut child, visited).await;
                result.extend(child);
            }
        }
        for entry in &document.compose.exclude {
            for name in entry.display_names() {
                result.remove(name);
            }
            for reference in &entry.value_set {
                let mut child = HashSet::new();
                self.resolve_child_names(reference, &mut child, visited).await;
                for name in &child {
                    result.remove(name);
                }
            }
        }
    }

    async fn resolve_child_names(
        &self,
        reference: &str,
        into: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) {
        let oid = last_segment(reference);
        match self.fetch(oid).await {
            Ok(document) => {
                Box::pin(self.resolve_names_recurs(&document, into, visited)).await;
            }
            Err(error) => {
                tracing::warn!(oid, %error, "failed to fetch referenced value set, treating as empty");
            }
        }
    }
}
