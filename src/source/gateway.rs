use super::traits::{MemberStream, MembershipSource};
use super::types::{GroupEntity, MemberEntry, SourceError};
use async_trait::async_trait;
use futures::stream;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::debug;

/// Default base URL of the platform gateway.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8081";

/// Number of member entries requested per enumeration page.
const PAGE_LIMIT: usize = 200;

/// Wait applied when the gateway rate-limits without naming a duration.
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 60;

/// A membership source backed by an HTTP platform gateway.
///
/// The gateway owns the platform's wire protocol, session handshake, and
/// rate-limit accounting; this adapter only drives its JSON API:
///
/// - `POST session/start` begins a session from the configured credentials
///   and reports whether a verification code is still required.
/// - `POST session/verify` completes sign-in with an interactively entered
///   verification code.
/// - `GET entities?ref=...` resolves a group reference to an entity.
/// - `GET groups/{id}/members` pages through the member list using the
///   gateway's aggressive (exhaustive) enumeration strategy.
/// - `POST session/stop` releases the session.
///
/// A `429` response is surfaced as [`SourceError::RateLimited`] carrying the
/// wait duration from the `Retry-After` header or the response body.
pub struct GatewaySource {
    base_url: String,
    http: reqwest::Client,
    api_id: i64,
    api_hash: String,
    phone: String,
    session: Option<String>,
    code_prompt: Box<dyn Fn() -> std::io::Result<String> + Send + Sync>,
}

#[derive(Serialize)]
struct StartSessionRequest<'a> {
    api_id: i64,
    api_hash: &'a str,
    phone: &'a str,
}

#[derive(Serialize)]
struct VerifySessionRequest<'a> {
    login_token: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    authorized: bool,
    #[serde(default)]
    login_token: Option<String>,
    #[serde(default)]
    session_token: Option<String>,
}

#[derive(Deserialize)]
struct MemberPage {
    #[serde(default)]
    members: Vec<MemberEntry>,
    #[serde(default)]
    next_offset: Option<u64>,
}

#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: u64,
}

/// Paging state threaded through the lazy member stream.
struct PageCursor {
    offset: u64,
    buffered: VecDeque<MemberEntry>,
    done: bool,
}

impl GatewaySource {
    /// Creates a gateway source from credentials and a gateway base URL.
    ///
    /// The base URL is normalized to end with a trailing slash. No network
    /// activity happens until [`MembershipSource::connect`] is called.
    pub fn new(base_url: &str, api_id: i64, api_hash: &str, phone: &str) -> Self {
        Self {
            base_url: normalize_url(base_url),
            http: reqwest::Client::new(),
            api_id,
            api_hash: api_hash.to_string(),
            phone: phone.to_string(),
            session: None,
            code_prompt: Box::new(prompt_code_on_stdin),
        }
    }

    /// Replaces the interactive verification code prompt.
    ///
    /// Used by tests to script the sign-in flow without a terminal.
    pub fn with_code_prompt<F>(mut self, prompt: F) -> Self
    where
        F: Fn() -> std::io::Result<String> + Send + Sync + 'static,
    {
        self.code_prompt = Box::new(prompt);
        self
    }

    /// Builds a GET request with the session token attached once acquired.
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.session {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Builds a POST request with the session token attached once acquired.
    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.session {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Maps non-success statuses shared by all gateway endpoints.
    ///
    /// `404` is not handled here because only entity resolution gives it a
    /// meaning worth distinguishing.
    async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, SourceError> {
        match resp.status().as_u16() {
            401 => Err(SourceError::Auth(format!("{} rejected by gateway", what))),
            403 => Err(SourceError::AccessDenied),
            429 => Err(rate_limited(resp).await),
            status if !resp.status().is_success() => Err(SourceError::Protocol(format!(
                "{} returned status {}",
                what, status
            ))),
            _ => Ok(resp),
        }
    }

    /// Fetches one page of member entries for a group.
    async fn fetch_member_page(&self, group_id: i64, offset: u64) -> Result<MemberPage, SourceError> {
        let resp = self
            .get(&format!("groups/{}/members", group_id))
            .query(&[
                ("offset", offset.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
                ("aggressive", "true".to_string()),
            ])
            .send()
            .await?;
        let resp = Self::check(resp, "member enumeration").await?;
        let page: MemberPage = resp
            .json()
            .await
            .map_err(|e| SourceError::Protocol(format!("invalid member page: {}", e)))?;
        debug!(
            "Fetched member page at offset {} ({} entries)",
            offset,
            page.members.len()
        );
        Ok(page)
    }
}

#[async_trait]
impl MembershipSource for GatewaySource {
    async fn connect(&mut self) -> Result<(), SourceError> {
        let request = StartSessionRequest {
            api_id: self.api_id,
            api_hash: &self.api_hash,
            phone: &self.phone,
        };
        let resp = self.post("session/start").json(&request).send().await?;
        let resp = Self::check(resp, "session start").await?;
        let session: SessionResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Protocol(format!("invalid session response: {}", e)))?;

        if session.authorized {
            self.session = session.session_token;
            return Ok(());
        }

        // The gateway wants a verification code to finish signing in.
        let login_token = session.login_token.ok_or_else(|| {
            SourceError::Protocol("session not authorized and no login token offered".to_string())
        })?;
        let code = (self.code_prompt)()
            .map_err(|e| SourceError::Auth(format!("could not read verification code: {}", e)))?;
        let request = VerifySessionRequest {
            login_token: &login_token,
            code: code.trim(),
        };
        let resp = self.post("session/verify").json(&request).send().await?;
        let resp = Self::check(resp, "session verification").await?;
        let verified: SessionResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Protocol(format!("invalid session response: {}", e)))?;
        if !verified.authorized {
            return Err(SourceError::Auth("verification code rejected".to_string()));
        }
        self.session = verified.session_token;
        Ok(())
    }

    async fn resolve(&self, reference: &str) -> Result<GroupEntity, SourceError> {
        let resp = self
            .get("entities")
            .query(&[("ref", reference)])
            .send()
            .await?;
        if resp.status().as_u16() == 404 {
            return Err(SourceError::NotFound(reference.to_string()));
        }
        let resp = Self::check(resp, "entity resolution").await?;
        let entity: GroupEntity = resp
            .json()
            .await
            .map_err(|e| SourceError::Protocol(format!("invalid entity response: {}", e)))?;
        Ok(entity)
    }

    fn members<'a>(&'a self, group: &'a GroupEntity) -> MemberStream<'a> {
        let group_id = group.id;
        let cursor = PageCursor {
            offset: 0,
            buffered: VecDeque::new(),
            done: false,
        };
        Box::pin(stream::try_unfold(cursor, move |mut cursor| async move {
            loop {
                if let Some(entry) = cursor.buffered.pop_front() {
                    return Ok(Some((entry, cursor)));
                }
                if cursor.done {
                    return Ok(None);
                }
                let page = self.fetch_member_page(group_id, cursor.offset).await?;
                cursor.done = page.next_offset.is_none() || page.members.is_empty();
                if let Some(next) = page.next_offset {
                    cursor.offset = next;
                }
                cursor.buffered.extend(page.members);
            }
        }))
    }

    async fn disconnect(&mut self) -> Result<(), SourceError> {
        let resp = self.post("session/stop").send().await?;
        Self::check(resp, "session stop").await?;
        self.session = None;
        Ok(())
    }
}

/// Normalizes the base URL by ensuring it ends with a trailing slash.
fn normalize_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Extracts the mandated wait from a `429` response.
///
/// Prefers the `Retry-After` header, then a `{"retry_after": seconds}` body,
/// then a fixed default.
async fn rate_limited(resp: reqwest::Response) -> SourceError {
    let header_wait = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    let wait = match header_wait {
        Some(secs) => secs,
        None => resp
            .json::<RateLimitBody>()
            .await
            .map(|body| body.retry_after)
            .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS),
    };
    SourceError::RateLimited {
        wait: Duration::from_secs(wait),
    }
}

/// Reads a verification code from the terminal.
fn prompt_code_on_stdin() -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "Enter the verification code: ")?;
    stdout.flush()?;
    let mut code = String::new();
    std::io::stdin().lock().read_line(&mut code)?;
    Ok(code)
}
