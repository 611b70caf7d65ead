pub mod code_system;
pub mod element;
pub mod error;
pub mod reference;
pub mod valueset;

pub use code_system::{CodeSystem, UMLS_CONCEPT_NONE};
pub use element::CodedElement;
pub use error::{CoreError, Result, validate_oid};
pub use reference::last_segment;
pub use valueset::{Compose, ComposeEntry, ConceptRef, ValueSetDocument};
