//! Coded elements
//!
//! A [`CodedElement`] is a `(system, code)` pair identifying a single clinical
//! concept in its native terminology. Equality and hashing are structural:
//! elements are the key type for every visited set and cache in the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code_system::CodeSystem;

/// A single coded concept from a value set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodedElement {
    pub system: CodeSystem,
    pub code: String,
}

impl CodedElement {
    pub fn new(system: CodeSystem, code: impl Into<String>) -> Self {
        Self {
            system,
            code: code.into(),
        }
    }

    /// A concept identifier in the canonical cross-system space.
    pub fn concept(cui: impl Into<String>) -> Self {
        Self::new(CodeSystem::Umls, cui)
    }

    /// Whether this element already lives in the concept-identifier space.
    pub fn is_concept_identifier(&self) -> bool {
        self.system == CodeSystem::Umls
    }
}

impl fmt::Display for CodedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.system.source_vocabulary() {
            Some(sab) => write!(f, "{}:{}", sab, self.code),
            None => match self.system {
                CodeSystem::Umls => write!(f, "UMLS:{}", self.code),
                _ => write!(f, "UNSPECIFIED:{}", self.code),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = CodedElement::new(CodeSystem::SnomedCt, "44054006");
        let b = CodedElement::new(CodeSystem::SnomedCt, "44054006");
        let c = CodedElement::new(CodeSystem::Icd10Cm, "44054006");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    #[test]
    fn test_concept_constructor() {
        let cui = CodedElement::concept("C0004238");
        assert!(cui.is_concept_identifier());
        assert_eq!(cui.code, "C0004238");
        assert_eq!(cui.to_string(), "UMLS:C0004238");
    }

    #[test]
    fn test_display_uses_source_vocabulary() {
        let el = CodedElement::new(CodeSystem::Loinc, "2345-7");
        assert_eq!(el.to_string(), "LNC:2345-7");
    }
}
