use std::collections::BTreeMap;

use anyhow::Result;

use termlex_terminology::SynonymService;

use crate::cli::OutputFormat;
use crate::output;

/// Resolve each OID to its synonym set and print the lexicon.
pub async fn resolve(
    service: &SynonymService,
    oids: &[String],
    hierarchy: bool,
    names_only: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut lexicon = BTreeMap::new();
    for oid in oids {
        let names = if names_only {
            service.names_for_oid(oid).await?
        } else {
            service.synonyms_for_oid(oid, hierarchy).await?
        };
        let mut sorted: Vec<_> = names.into_iter().collect();
        sorted.sort();
        lexicon.insert(oid.clone(), sorted);
    }
    output::print_lexicon(&lexicon, format);
    Ok(())
}

/// Resolve each OID to its flat code list and print it.
pub async fn codes(service: &SynonymService, oids: &[String], format: OutputFormat) -> Result<()> {
    let mut lexicon = BTreeMap::new();
    for oid in oids {
        let elements = service.codes_for_oid(oid).await?;
        let mut sorted: Vec<_> = elements.iter().map(ToString::to_string).collect();
        sorted.sort();
        lexicon.insert(oid.clone(), sorted);
    }
    output::print_lexicon(&lexicon, format);
    Ok(())
}
