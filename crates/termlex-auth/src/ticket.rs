//! Grant-ticket lifecycle and service-ticket issuance.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use tokio::sync::Mutex;
use url::Url;

use termlex_core::last_segment;

use crate::error::{AuthError, AuthResult};

/// Grant tickets are issued for eight hours; refresh an hour early so a held
/// grant never expires mid-request.
const GRANT_VALIDITY: Duration = Duration::from_secs(7 * 60 * 60);

/// Anything shorter than this cannot be a real grant ticket.
const MIN_GRANT_LEN: usize = 9;

/// Service identifier sent when exchanging a grant for a service ticket.
const SERVICE_ID: &str = "http://umlsks.nlm.nih.gov";

/// The granting endpoint answers with markup whose embedded URL ends in the
/// new grant ticket.
static GRANT_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("https[^\"]+").expect("grant URL pattern"));

/// Credentials accepted by the ticket-granting endpoint.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Account username and password.
    Password { username: String, password: String },
    /// API key tied to an account.
    ApiKey { api_key: String },
}

impl Credentials {
    fn form(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Password { username, password } => {
                vec![("username", username), ("password", password)]
            }
            Self::ApiKey { api_key } => vec![("apikey", api_key)],
        }
    }
}

#[derive(Debug, Default)]
struct GrantState {
    ticket: Option<String>,
    issued_at: Option<Instant>,
}

impl GrantState {
    fn valid_ticket(&self, validity: Duration) -> Option<&str> {
        let issued_at = self.issued_at?;
        let ticket = self.ticket.as_deref()?;
        (issued_at.elapsed() < validity).then_some(ticket)
    }
}

/// Issues single-use service tickets, refreshing the underlying grant ticket
/// when it is missing or past its validity window.
///
/// The grant is the only shared mutable state between concurrent workers; it
/// sits behind a mutex so exactly one worker performs a refresh while the
/// rest wait for the result.
pub struct TicketProvider {
    http: reqwest::Client,
    auth_base: String,
    credentials: Credentials,
    validity: Duration,
    grant: Mutex<GrantState>,
}

impl TicketProvider {
    pub fn new(
        http: reqwest::Client,
        auth_base: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self::with_validity(http, auth_base, credentials, GRANT_VALIDITY)
    }

    /// Construct with an explicit validity window. The window must stay
    /// conservatively under the real server-side expiry.
    pub fn with_validity(
        http: reqwest::Client,
        auth_base: impl Into<String>,
        credentials: Credentials,
        validity: Duration,
    ) -> Self {
        Self {
            http,
            auth_base: auth_base.into().trim_end_matches('/').to_string(),
            credentials,
            validity,
            grant: Mutex::new(GrantState::default()),
        }
    }

    /// Return `target` with a fresh single-use service ticket appended as a
    /// `ticket=` query parameter.
    pub async fn authenticate(&self, target: &str) -> AuthResult<Url> {
        let ticket = self.service_ticket().await?;
        let mut url = Url::parse(target)?;
        url.query_pairs_mut().append_pair("ticket", &ticket);
        Ok(url)
    }

    /// Exchange the held grant for a brand-new service ticket.
    ///
    /// Service tickets are single-use; this is called once per outbound
    /// request and the result is never stored.
    pub async fn service_ticket(&self) -> AuthResult<String> {
        let grant = self.current_grant().await?;
        let response = self
            .http
            .post(format!("{}/{}/", self.auth_base, grant))
            .form(&[("service", SERVICE_ID)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(AuthError::ServiceTicketRequest)?;
        let ticket = response
            .text()
            .await
            .map_err(AuthError::ServiceTicketRequest)?;
        Ok(ticket.trim().to_string())
    }

    /// Return the held grant ticket, refreshing first if it is missing or
    /// older than the validity window.
    async fn current_grant(&self) -> AuthResult<String> {
        let mut state = self.grant.lock().await;
        if let Some(ticket) = state.valid_ticket(self.validity) {
            return Ok(ticket.to_string());
        }

        tracing::debug!("grant ticket missing or expired, refreshing");
        let ticket = self.acquire_grant().await?;
        state.ticket = Some(ticket.clone());
        state.issued_at = Some(Instant::now());
        Ok(ticket)
    }

    async fn acquire_grant(&self) -> AuthResult<String> {
        let response = self
            .http
            .post(format!("{}/", self.auth_base))
            .form(&self.credentials.form())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(AuthError::GrantRequest)?;
        let body = response.text().await.map_err(AuthError::GrantRequest)?;
        extract_grant(&body).ok_or_else(|| {
            tracing::warn!("grant endpoint returned no usable ticket");
            AuthError::MalformedGrant
        })
    }
}

/// Pull the grant ticket out of a granting-endpoint response.
///
/// The endpoint embeds the ticket as the final path segment of a URL in its
/// response body; some deployments return the bare ticket instead. Anything
/// implausibly short is rejected as a failed authentication.
fn extract_grant(body: &str) -> Option<String> {
    let candidate = match GRANT_URL_PATTERN.find(body) {
        Some(m) => last_segment(m.as_str()),
        None => body.trim(),
    };
    (candidate.len() >= MIN_GRANT_LEN).then(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_grant_from_embedded_url() {
        let body = r#"<form action="https://auth.example.org/cas/v1/tickets/TGT-1234-abcdef" method="POST">"#;
        assert_eq!(extract_grant(body).as_deref(), Some("TGT-1234-abcdef"));
    }

    #[test]
    fn test_extract_grant_bare_ticket() {
        assert_eq!(
            extract_grant("TGT-98765-xyz\n").as_deref(),
            Some("TGT-98765-xyz")
        );
    }

    #[test]
    fn test_extract_grant_rejects_short_ticket() {
        assert_eq!(extract_grant("TGT"), None);
        assert_eq!(extract_grant(""), None);
        assert_eq!(
            extract_grant(r#"action="https://auth.example.org/t""#),
            None
        );
    }

    #[test]
    fn test_grant_state_validity() {
        let mut state = GrantState::default();
        assert!(state.valid_ticket(GRANT_VALIDITY).is_none());

        state.ticket = Some("TGT-1234-abcdef".to_string());
        state.issued_at = Some(Instant::now());
        assert!(state.valid_ticket(GRANT_VALIDITY).is_some());
        assert!(state.valid_ticket(Duration::ZERO).is_none());
    }
}
