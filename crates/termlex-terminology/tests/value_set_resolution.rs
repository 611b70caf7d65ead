//! Value-set graph resolution against a mock document source.

mod support;

use std::collections::HashSet;

use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use termlex_core::{CodeSystem, CodedElement};
use termlex_terminology::TerminologyError;

use support::{mount_value_set, resolver};

const SNOMED: &str = "http://snomed.info/sct";

fn element(code: &str) -> CodedElement {
    CodedElement::new(CodeSystem::SnomedCt, code)
}

#[tokio::test]
async fn direct_concept_resolves_to_single_element() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.2.3",
        json!({
            "id": "1.2.3",
            "compose": {"include": [{
                "system": SNOMED,
                "concept": [{"code": "44054006", "display": "Diabetes"}]
            }]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.2.3").await.unwrap();
    assert_eq!(codes, HashSet::from([element("44054006")]));

    let names = resolver(&server)
        .resolve_display_names("1.2.3")
        .await
        .unwrap();
    assert_eq!(names, HashSet::from(["Diabetes".to_string()]));
}

#[tokio::test]
async fn excluding_an_included_pair_yields_empty_set() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.2.3",
        json!({
            "id": "1.2.3",
            "compose": {
                "include": [{
                    "system": SNOMED,
                    "concept": [{"code": "44054006", "display": "Diabetes"}]
                }],
                "exclude": [{
                    "system": SNOMED,
                    "concept": [{"code": "44054006", "display": "Diabetes"}]
                }]
            }
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.2.3").await.unwrap();
    assert!(codes.is_empty());
}

#[tokio::test]
async fn included_child_value_set_is_unioned() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {"include": [{
                "valueSet": [format!("{}/ValueSet/2.2", server.uri())]
            }]}
        }),
    )
    .await;
    mount_value_set(
        &server,
        "2.2",
        json!({
            "id": "2.2",
            "compose": {"include": [{
                "system": SNOMED,
                "concept": [{"code": "22298006"}]
            }]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(codes, HashSet::from([element("22298006")]));
}

#[tokio::test]
async fn excluded_child_value_set_strips_its_whole_result() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {
                "include": [{
                    "system": SNOMED,
                    "concept": [{"code": "44054006"}, {"code": "22298006"}]
                }],
                "exclude": [{
                    "valueSet": [format!("{}/ValueSet/2.2", server.uri())]
                }]
            }
        }),
    )
    .await;
    mount_value_set(
        &server,
        "2.2",
        json!({
            "id": "2.2",
            "compose": {"include": [{
                "system": SNOMED,
                "concept": [{"code": "22298006"}]
            }]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(codes, HashSet::from([element("44054006")]));
}

#[tokio::test]
async fn cyclic_references_terminate_with_the_union() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {"include": [
                {"system": SNOMED, "concept": [{"code": "1001"}]},
                {"valueSet": [format!("{}/ValueSet/2.2", server.uri())]}
            ]}
        }),
    )
    .await;
    mount_value_set(
        &server,
        "2.2",
        json!({
            "id": "2.2",
            "compose": {"include": [
                {"system": SNOMED, "concept": [{"code": "2002"}]},
                {"valueSet": [format!("{}/ValueSet/1.1", server.uri())]}
            ]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(codes, HashSet::from([element("1001"), element("2002")]));
}

#[tokio::test]
async fn anonymous_document_is_a_leaf_with_direct_concepts_only() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {"include": [{
                "valueSet": [format!("{}/ValueSet/2.2", server.uri())]
            }]}
        }),
    )
    .await;
    // No id: its direct concept is kept, but the reference back to 1.1 is
    // never followed.
    mount_value_set(
        &server,
        "2.2",
        json!({
            "compose": {"include": [
                {"system": SNOMED, "concept": [{"code": "2002"}]},
                {"valueSet": [format!("{}/ValueSet/1.1", server.uri())]}
            ]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(codes, HashSet::from([element("2002")]));
}

#[tokio::test]
async fn unknown_system_url_maps_to_unspecified() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {"include": [{
                "system": "http://example.org/private-codes",
                "concept": [{"code": "X1"}]
            }]}
        }),
    )
    .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(
        codes,
        HashSet::from([CodedElement::new(CodeSystem::Unspecified, "X1")])
    );
}

#[tokio::test]
async fn unreachable_child_branch_degrades_to_empty() {
    let server = MockServer::start().await;
    mount_value_set(
        &server,
        "1.1",
        json!({
            "id": "1.1",
            "compose": {"include": [
                {"system": SNOMED, "concept": [{"code": "1001"}]},
                {"valueSet": [format!("{}/ValueSet/9.9", server.uri())]}
            ]}
        }),
    )
    .await;
    // 9.9 is never mounted; the branch resolves to nothing.

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert_eq!(codes, HashSet::from([element("1001")]));
}

#[tokio::test]
async fn missing_root_document_is_an_error() {
    let server = MockServer::start().await;
    let err = resolver(&server).resolve_codes("9.9").await.unwrap_err();
    assert!(matches!(err, TerminologyError::ValueSetSource { .. }));
}

#[tokio::test]
async fn malformed_oid_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let err = resolver(&server)
        .resolve_codes("not-an-oid")
        .await
        .unwrap_err();
    assert!(matches!(err, TerminologyError::Core(_)));
}

#[tokio::test]
async fn document_requests_carry_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ValueSet/1.1"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "1.1", "compose": {"include": []}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let codes = resolver(&server).resolve_codes("1.1").await.unwrap();
    assert!(codes.is_empty());
}
