//! Value-set document model
//!
//! Typed view over the subset of a FHIR-shaped ValueSet document the resolver
//! consumes: the `compose` component with its `include`/`exclude` entries.
//! Entries either list concepts inline (`system` + `concept[]`) or reference
//! other value sets by canonical URL (`valueSet[]`); everything else in the
//! document is ignored on parse.

use serde::{Deserialize, Serialize};

use crate::code_system::CodeSystem;
use crate::element::CodedElement;

/// A value-set document fetched from the value-set source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueSetDocument {
    /// Identifier unique within the retrieval origin. Anonymous documents
    /// (no id) are treated as unexpandable leaves by the resolver.
    pub id: Option<String>,
    pub name: Option<String>,
    pub compose: Compose,
}

/// The `compose` component: what the value set includes and excludes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Compose {
    pub include: Vec<ComposeEntry>,
    pub exclude: Vec<ComposeEntry>,
}

/// One include or exclude entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposeEntry {
    /// Code-system URI for the inline concepts, if any.
    pub system: Option<String>,
    /// Inline concepts.
    pub concept: Vec<ConceptRef>,
    /// Canonical URLs of referenced value sets; the final path segment of
    /// each is the child OID.
    pub value_set: Vec<String>,
}

impl ComposeEntry {
    /// The code system of this entry's inline concepts.
    ///
    /// Entries without a `system` resolve to [`CodeSystem::Unspecified`], as
    /// do URIs outside the registry.
    pub fn code_system(&self) -> CodeSystem {
        self.system
            .as_deref()
            .map(CodeSystem::from_url)
            .unwrap_or(CodeSystem::Unspecified)
    }

    /// Coded elements for the inline concepts that carry a code.
    pub fn coded_elements(&self) -> impl Iterator<Item = CodedElement> + '_ {
        let system = self.code_system();
        self.concept
            .iter()
            .filter_map(move |c| c.code.as_deref().map(|code| CodedElement::new(system, code)))
    }

    /// Display names for the inline concepts that carry one.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.concept.iter().filter_map(|c| c.display.as_deref())
    }
}

/// An inline concept: code and/or display text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptRef {
    pub code: Option<String>,
    pub display: Option<String>,
}

impl ValueSetDocument {
    /// Parse a serialized document, ignoring unknown fields.
    pub fn from_json(raw: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
