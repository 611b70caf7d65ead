//! Shared mock-server plumbing for terminology integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use termlex_auth::{Credentials, TicketProvider};
use termlex_terminology::{BasicCredentials, ConceptExpander, ValueSetResolver};

pub const GRANT: &str = "TGT-1234-abcdefgh";
pub const SERVICE_TICKET: &str = "ST-test-ticket";

/// Mounts the ticket-granting endpoints under `/cas`.
///
/// The grant response embeds the endpoint's public https URL, as the real
/// service does; only its final path segment (the grant) is used afterwards.
pub async fn mount_ticket_endpoints(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/cas/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<form action="https://auth.example.org/cas/v1/tickets/{GRANT}" method="POST">"#
        )))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/cas/{GRANT}/")))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERVICE_TICKET))
        .mount(server)
        .await;
}

/// Serves a value-set document under `/ValueSet/{oid}`.
pub async fn mount_value_set(server: &MockServer, oid: &str, document: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/ValueSet/{oid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(server)
        .await;
}

pub fn resolver(server: &MockServer) -> ValueSetResolver {
    ValueSetResolver::new(
        reqwest::Client::new(),
        format!("{}/ValueSet", server.uri()),
        BasicCredentials {
            username: "vs-user".to_string(),
            password: "vs-pass".to_string(),
        },
    )
}

pub fn expander(server: &MockServer) -> ConceptExpander {
    let http = reqwest::Client::new();
    let tickets = Arc::new(TicketProvider::new(
        http.clone(),
        format!("{}/cas", server.uri()),
        Credentials::ApiKey {
            api_key: "test-key".to_string(),
        },
    ));
    ConceptExpander::new(
        http,
        format!("{}/rest", server.uri()),
        tickets,
        100,
        Duration::from_secs(60),
    )
}
