//! Concept expansion against the concept service
//!
//! Maps a coded element to its canonical concept identifiers via exact
//! source-vocabulary search, then walks broader-than relations to close the
//! set, and resolves each identifier to its English display names through the
//! paginated atom listing.
//!
//! Relation and display-name lookups are memoized in two independent caches.
//! A transient lookup failure is cached as a failure marker and surfaces as
//! an empty result so one unreachable concept never aborts a bulk expansion;
//! authentication failures abort immediately and are never cached.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use termlex_auth::TicketProvider;
use termlex_core::{CodedElement, UMLS_CONCEPT_NONE, last_segment};

use crate::cache::{Lookup, Memo};
use crate::error::{TerminologyError, TerminologyResult};

/// Relation label denoting "broader than" in the concept service.
const BROADER_THAN: &str = "RB";

/// One entry from a concept's relation listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelation {
    pub relation_label: String,
    /// URL whose final path segment is the related concept identifier.
    pub related_id: String,
}

impl ConceptRelation {
    pub fn is_broader(&self) -> bool {
        self.relation_label.eq_ignore_ascii_case(BROADER_THAN)
    }

    /// The related concept identifier (final path segment of `related_id`).
    pub fn related_concept(&self) -> &str {
        last_segment(&self.related_id)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    ui: String,
}

#[derive(Debug, Default, Deserialize)]
struct RelationsResponse {
    #[serde(default)]
    result: Vec<ConceptRelation>,
}

#[derive(Debug, Default, Deserialize)]
struct AtomsResponse {
    #[serde(default)]
    result: Vec<Atom>,
}

#[derive(Debug, Deserialize)]
struct Atom {
    ui: String,
    name: String,
}

/// Expands coded elements through the concept-relation graph.
///
/// Every outbound call is authenticated with a fresh single-use service
/// ticket from the shared [`TicketProvider`].
pub struct ConceptExpander {
    http: reqwest::Client,
    base_url: String,
    tickets: Arc<TicketProvider>,
    relations_cache: Memo<CodedElement, Vec<ConceptRelation>>,
    names_cache: Memo<String, HashSet<String>>,
}

impl ConceptExpander {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tickets: Arc<TicketProvider>,
        cache_capacity: u64,
        cache_idle: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tickets,
            relations_cache: Memo::new(cache_capacity, cache_idle),
            names_cache: Memo::new(cache_capacity, cache_idle),
        }
    }

    /// Resolve `element` to the closed set of its concept identifiers.
    ///
    /// Elements already in the concept-identifier system resolve to
    /// themselves. With `traverse_hierarchy`, every newly discovered
    /// identifier's broader-than relations are followed; recursion only
    /// enters identifiers not yet in the result set, so a cyclic relation
    /// graph still terminates.
    pub async fn expand_concepts(
        &self,
        element: &CodedElement,
        traverse_hierarchy: bool,
    ) -> TerminologyResult<HashSet<CodedElement>> {
        let mut result = HashSet::new();
        self.expand_recurs(element, traverse_hierarchy, &mut result)
            .await?;
        Ok(result)
    }

    async fn expand_recurs(
        &self,
        element: &CodedElement,
        traverse_hierarchy: bool,
        result: &mut HashSet<CodedElement>,
    ) -> TerminologyResult<()> {
        let mut discovered = Vec::new();
        if element.is_concept_identifier() {
            if result.insert(element.clone()) {
                discovered.push(element.clone());
            }
        } else {
            let Some(vocabulary) = element.system.source_vocabulary() else {
                tracing::warn!(element = %element, "no source vocabulary for element, skipping concept search");
                return Ok(());
            };
            for ui in self.search_concept_ids(vocabulary, &element.code).await? {
                if ui.eq_ignore_ascii_case(UMLS_CONCEPT_NONE) {
                    return Ok(());
                }
                let concept = CodedElement::concept(ui);
                if result.insert(concept.clone()) {
                    discovered.push(concept);
                }
            }
        }

        if traverse_hierarchy {
            for concept in discovered {
                let relations = self.relations(&concept).await?;
                for relation in relations.iter().filter(|r| r.is_broader()) {
                    let related = CodedElement::concept(relation.related_concept());
                    if !result.contains(&related) {
                        Box::pin(self.expand_recurs(&related, true, result)).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// English display names for one concept identifier, lowercased.
    ///
    /// Served from cache; a concept whose lookup previously failed yields an
    /// empty set until the failure marker is evicted.
    pub async fn display_names(&self, cui: &str) -> TerminologyResult<Arc<HashSet<String>>> {
        let outcome = self
            .names_cache
            .get_or_load(cui.to_string(), async {
                match self.fetch_display_names(cui).await {
                    Ok(names) => Ok(Lookup::found(names)),
                    Err(error) if error.is_fatal() => Err(error),
                    Err(error) => {
                        tracing::warn!(cui, %error, "display-name lookup failed");
                        Ok(Lookup::Failed)
                    }
                }
            })
            .await?;
        Ok(outcome.value().unwrap_or_default())
    }

    /// Uncached, exhaustive walk of the concept's atom pages.
    ///
    /// Stops on an empty page or the `NONE` sentinel. A page failure fails
    /// the whole walk; a partial name set is worse than none.
    async fn fetch_display_names(&self, cui: &str) -> TerminologyResult<HashSet<String>> {
        let raw = format!("{}/content/current/CUI/{}/atoms", self.base_url, cui);
        let mut names = HashSet::new();
        let mut page = 1u32;
        loop {
            let mut url = self.tickets.authenticate(&raw).await?;
            url.query_pairs_mut()
                .append_pair("language", "ENG")
                .append_pair("pageNumber", &page.to_string());
            let response = self
                .http
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(TerminologyError::ConceptSource)?;
            let body: AtomsResponse = response
                .json()
                .await
                .map_err(TerminologyError::ConceptSource)?;
            if body.result.is_empty() {
                break;
            }
            for atom in body.result {
                if atom.ui.eq_ignore_ascii_case(UMLS_CONCEPT_NONE) {
                    return Ok(names);
                }
                names.insert(atom.name.to_lowercase());
            }
            page += 1;
        }
        Ok(names)
    }

    /// Exact-match search from a source vocabulary code to concept identifiers.
    async fn search_concept_ids(
        &self,
        vocabulary: &str,
        code: &str,
    ) -> TerminologyResult<Vec<String>> {
        let raw = format!("{}/search/current", self.base_url);
        let mut url = self.tickets.authenticate(&raw).await?;
        url.query_pairs_mut()
            .append_pair("sabs", vocabulary)
            .append_pair("inputType", "sourceUi")
            .append_pair("string", code)
            .append_pair("returnIdType", "concept")
            .append_pair("searchType", "exact");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(TerminologyError::ConceptSource)?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(TerminologyError::ConceptSource)?;
        Ok(body.result.results.into_iter().map(|hit| hit.ui).collect())
    }

    /// Memoized relation listing for one concept identifier.
    async fn relations(
        &self,
        concept: &CodedElement,
    ) -> TerminologyResult<Arc<Vec<ConceptRelation>>> {
        let outcome = self
            .relations_cache
            .get_or_load(concept.clone(), async {
                match self.fetch_relations(&concept.code).await {
                    Ok(relations) => Ok(Lookup::found(relations)),
                    Err(error) if error.is_fatal() => Err(error),
                    Err(error) => {
                        tracing::warn!(concept = %concept, %error, "relation lookup failed");
                        Ok(Lookup::Failed)
                    }
                }
            })
            .await?;
        Ok(outcome.value().unwrap_or_default())
    }

    async fn fetch_relations(&self, cui: &str) -> TerminologyResult<Vec<ConceptRelation>> {
        let raw = format!("{}/content/current/CUI/{}/relations", self.base_url, cui);
        let url = self.tickets.authenticate(&raw).await?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(TerminologyError::ConceptSource)?;
        let body: RelationsResponse = response
            .json()
            .await
            .map_err(TerminologyError::ConceptSource)?;
        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broader_than_label_is_case_insensitive() {
        let relation = ConceptRelation {
            relation_label: "rb".to_string(),
            related_id: "https://concepts.example.org/rest/content/current/CUI/C0011849"
                .to_string(),
        };
        assert!(relation.is_broader());
        assert_eq!(relation.related_concept(), "C0011849");

        let narrower = ConceptRelation {
            relation_label: "RN".to_string(),
            related_id: "C1".to_string(),
        };
        assert!(!narrower.is_broader());
    }

    #[test]
    fn test_search_response_shape() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"result": {"results": [{"ui": "C0004238", "name": "Atrial fibrillation"}]}}"#,
        )
        .unwrap();
        assert_eq!(body.result.results[0].ui, "C0004238");
    }

    #[test]
    fn test_relations_response_tolerates_missing_result() {
        let body: RelationsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.result.is_empty());
    }

    #[test]
    fn test_atoms_response_shape() {
        let body: AtomsResponse = serde_json::from_str(
            r#"{"result": [{"ui": "A0027665", "name": "Diabetes"}]}"#,
        )
        .unwrap();
        assert_eq!(body.result[0].name, "Diabetes");
    }
}
