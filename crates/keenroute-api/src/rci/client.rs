// RCI HTTP client
//
// Owns the authenticated session to one router. Every call first makes sure
// the session is authenticated; a 401 from a protected call invalidates the
// session, re-runs the handshake once, and retries the call once. Endpoint
// wrappers (routes, ...) live in sibling modules as inherent methods.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Where the client is in the challenge-response handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Raw response of one RCI call.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Session client for the Keenetic NDMS RCI API.
///
/// Not shareable across tasks: every call takes `&mut self` because the
/// session state changes in place as the handshake runs.
pub struct RciClient {
    http: reqwest::Client,
    base_url: Url,
    login: String,
    password: SecretString,
    state: SessionState,
}

impl RciClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the router's HTTP root, e.g. `http://192.168.1.1:280`.
    pub fn new(
        base_url: Url,
        login: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, login, password))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The client must have a cookie store, otherwise the session cookie
    /// set by the handshake is lost between calls.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        login: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            login: login.into(),
            password,
            state: SessionState::Unauthenticated,
        }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The login used for the handshake.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Current handshake state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        trace!(from = ?self.state, to = ?state, "session state change");
        self.state = state;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a router path, e.g. `rci/ip/route` or `auth`.
    ///
    /// The path is appended to the base URL verbatim (a trailing slash in
    /// `rci/` is preserved).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `path` and return the response body.
    pub async fn get(&mut self, path: &str) -> Result<String, Error> {
        self.request(path, None).await
    }

    /// POST `body` as JSON to `path` and return the response body.
    pub async fn post(
        &mut self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        let bytes = serde_json::to_vec(body)?;
        self.request(path, Some(bytes)).await
    }

    /// Run one call under the retry-once-after-reauth policy.
    ///
    /// GET when `body` is `None`, POST with a JSON body otherwise.
    async fn request(&mut self, path: &str, body: Option<Vec<u8>>) -> Result<String, Error> {
        self.ensure_authenticated().await?;
        let url = self.url(path)?;

        let mut resp = self.send(&url, body.as_deref()).await?;
        if resp.status == StatusCode::UNAUTHORIZED {
            debug!(path, "session rejected, re-authenticating");
            self.invalidate();
            self.ensure_authenticated().await?;
            resp = self.send(&url, body.as_deref()).await?;
            if resp.status == StatusCode::UNAUTHORIZED {
                self.invalidate();
                return Err(Error::Authentication {
                    message: format!("{path} still unauthorized after re-authentication"),
                });
            }
        }

        if resp.status != StatusCode::OK {
            return Err(Error::Request {
                path: path.to_owned(),
                status: resp.status.as_u16(),
                body: resp.body,
            });
        }
        Ok(resp.body)
    }

    /// Send a single request without any auth handling.
    async fn send(&self, url: &Url, body: Option<&[u8]>) -> Result<RawResponse, Error> {
        let builder = match body {
            None => {
                debug!("GET {}", url);
                self.http.request(Method::GET, url.clone())
            }
            Some(bytes) => {
                debug!("POST {} ({} bytes)", url, bytes.len());
                self.http
                    .request(Method::POST, url.clone())
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.to_vec())
            }
        };

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}
