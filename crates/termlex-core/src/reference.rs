//! Reference-string utilities.
//!
//! Value-set documents point at child value sets with canonical URLs, and the
//! concept service returns related concepts as URLs; in both cases the
//! identifier of interest is the final path segment.

/// Returns the final `/`-separated segment of a reference string.
///
/// Trailing slashes are ignored, so `.../ValueSet/2.16.840.1/` and
/// `.../ValueSet/2.16.840.1` both yield `2.16.840.1`. A string with no `/`
/// is returned whole.
pub fn last_segment(reference: &str) -> &str {
    reference
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment_of_url() {
        assert_eq!(
            last_segment("https://cts.nlm.nih.gov/fhir/ValueSet/2.16.840.1.113762.1.4.1223.9"),
            "2.16.840.1.113762.1.4.1223.9"
        );
    }

    #[test]
    fn test_last_segment_trailing_slash() {
        assert_eq!(
            last_segment("https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0004238/"),
            "C0004238"
        );
    }

    #[test]
    fn test_last_segment_bare_identifier() {
        assert_eq!(last_segment("C0004238"), "C0004238");
    }
}
