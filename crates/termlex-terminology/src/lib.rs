//! Value-set resolution and concept expansion.
//!
//! Turns a clinical value set (an OID against the value-set source) into the
//! set of natural-language synonyms its concepts are known by:
//!
//! 1. [`vsac::ValueSetResolver`] flattens the value set's composition graph
//!    (includes, excludes, nested value sets) into coded elements.
//! 2. [`umls::ConceptExpander`] maps each element to canonical concept
//!    identifiers, optionally closing over broader-than relations, and
//!    resolves identifiers to display names.
//! 3. [`service::SynonymService`] drives the pipeline with bounded
//!    concurrency and unions the results per OID.
//!
//! All resolution is pull-based and in-memory; the memoized lookup caches in
//! [`cache`] are lossy across restarts by design.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod umls;
pub mod vsac;

pub use cache::{Lookup, Memo};
pub use config::{BasicCredentials, TerminologyConfig};
pub use error::{TerminologyError, TerminologyResult};
pub use service::SynonymService;
pub use umls::{ConceptExpander, ConceptRelation};
pub use vsac::ValueSetResolver;
