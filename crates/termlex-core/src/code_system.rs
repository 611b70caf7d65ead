//! Code system registry
//!
//! Closed enumeration of the terminology systems a value-set document can
//! reference. Each system carries the canonical URI strings documents use to
//! denote it and the source-vocabulary abbreviation (`sabs`) the concept
//! service expects. The URL registry is an immutable map built once at first
//! use; URLs outside the registry resolve to [`CodeSystem::Unspecified`] so a
//! single unknown system never aborts a whole value-set resolution.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Sentinel identifier the concept service returns when a lookup has no match.
pub const UMLS_CONCEPT_NONE: &str = "NONE";

/// A terminology system referenced by value-set documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeSystem {
    /// Current Procedural Terminology (AMA)
    Cpt,
    /// ICD-9 Clinical Modification
    Icd9Cm,
    /// ICD-10 Clinical Modification
    Icd10Cm,
    /// ICD-10 Procedure Coding System
    Icd10Pcs,
    /// Logical Observation Identifiers Names and Codes
    Loinc,
    /// RxNorm drug vocabulary
    RxNorm,
    /// SNOMED Clinical Terms (US edition)
    SnomedCt,
    /// The UMLS concept-identifier space (CUIs)
    Umls,
    /// Sentinel for URLs the registry does not know
    Unspecified,
}

impl CodeSystem {
    /// The source-vocabulary abbreviation used in concept-search requests.
    ///
    /// Returns `None` for [`CodeSystem::Umls`] (elements there are already
    /// concept identifiers and are never searched) and for
    /// [`CodeSystem::Unspecified`] (nothing meaningful to search by).
    pub fn source_vocabulary(&self) -> Option<&'static str> {
        match self {
            Self::Cpt => Some("CPT"),
            Self::Icd9Cm => Some("ICD9CM"),
            Self::Icd10Cm => Some("ICD10CM"),
            Self::Icd10Pcs => Some("ICD10PCS"),
            Self::Loinc => Some("LNC"),
            Self::RxNorm => Some("RXNORM"),
            Self::SnomedCt => Some("SNOMEDCT_US"),
            Self::Umls | Self::Unspecified => None,
        }
    }

    /// Canonical URIs value-set documents use for this system.
    pub fn urls(&self) -> &'static [&'static str] {
        match self {
            Self::Cpt => &["http://www.ama-assn.org/go/cpt"],
            Self::Icd9Cm => &["http://hl7.org/fhir/sid/icd-9-cm"],
            Self::Icd10Cm => &["http://hl7.org/fhir/sid/icd-10-cm"],
            Self::Icd10Pcs => &["http://www.icd10data.com/icd10pcs"],
            Self::Loinc => &["http://loinc.org"],
            Self::RxNorm => &["http://www.nlm.nih.gov/research/umls/rxnorm"],
            Self::SnomedCt => &["http://snomed.info/sct"],
            Self::Umls => &["http://www.nlm.nih.gov/research/umls"],
            Self::Unspecified => &[],
        }
    }

    /// Look up a system by the URI a document used for it.
    ///
    /// Surrounding whitespace is tolerated; some published value sets carry
    /// padded system URIs.
    pub fn from_url(url: &str) -> Self {
        URL_REGISTRY
            .get(url.trim())
            .copied()
            .unwrap_or(Self::Unspecified)
    }

    fn all() -> &'static [CodeSystem] {
        &[
            Self::Cpt,
            Self::Icd9Cm,
            Self::Icd10Cm,
            Self::Icd10Pcs,
            Self::Loinc,
            Self::RxNorm,
            Self::SnomedCt,
            Self::Umls,
        ]
    }
}

static URL_REGISTRY: LazyLock<HashMap<&'static str, CodeSystem>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for system in CodeSystem::all() {
        for url in system.urls() {
            map.insert(*url, *system);
        }
    }
    map
});
