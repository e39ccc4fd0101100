// RCI authentication
//
// NDMS challenge-response login. `GET /auth` either succeeds outright (the
// session cookie in the jar is still valid) or answers 401 with a realm and
// a challenge. The client then proves knowledge of the password with
//
//   sha256_hex(challenge + md5_hex("{login}:{realm}:{password}"))
//
// POSTed to `/auth`. The cookie set on success rides along on later calls.

use md5::Md5;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Error;
use crate::rci::client::{RciClient, SessionState};

const AUTH_PATH: &str = "auth";
pub const REALM_HEADER: &str = "X-NDM-Realm";
pub const CHALLENGE_HEADER: &str = "X-NDM-Challenge";

/// Compute the password digest the router expects for a challenge.
pub fn challenge_response(login: &str, password: &str, realm: &str, challenge: &str) -> String {
    let inner = hex::encode(Md5::digest(format!("{login}:{realm}:{password}").as_bytes()));
    hex::encode(Sha256::digest(format!("{challenge}{inner}").as_bytes()))
}

fn header(resp: &reqwest::Response, name: &'static str) -> Result<String, Error> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(Error::MissingChallenge { header: name })
}

impl RciClient {
    /// Run the handshake unless the session is already authenticated.
    pub async fn ensure_authenticated(&mut self) -> Result<(), Error> {
        if self.is_authenticated() {
            return Ok(());
        }
        self.set_state(SessionState::Authenticating);
        match self.handshake().await {
            Ok(()) => {
                self.set_state(SessionState::Authenticated);
                Ok(())
            }
            Err(e) => {
                self.set_state(SessionState::Unauthenticated);
                Err(e)
            }
        }
    }

    /// Forget the current session; the next call re-authenticates.
    pub fn invalidate(&mut self) {
        self.set_state(SessionState::Unauthenticated);
    }

    async fn handshake(&self) -> Result<(), Error> {
        let url = self.url(AUTH_PATH)?;
        debug!("probing session at {}", url);

        let probe = self.http().get(url.clone()).send().await?;
        match probe.status() {
            StatusCode::OK => {
                debug!("session cookie still valid");
                return Ok(());
            }
            StatusCode::UNAUTHORIZED => {}
            other => {
                return Err(Error::UnexpectedStatus {
                    context: "auth probe".into(),
                    status: other.as_u16(),
                });
            }
        }

        let realm = header(&probe, REALM_HEADER)?;
        let challenge = header(&probe, CHALLENGE_HEADER)?;
        let digest = challenge_response(
            self.login(),
            self.password().expose_secret(),
            &realm,
            &challenge,
        );

        debug!(login = self.login(), "answering auth challenge");
        let resp = self
            .http()
            .post(url)
            .json(&json!({ "login": self.login(), "password": digest }))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login rejected (HTTP {status}): {body}"),
            });
        }

        debug!("login successful");
        Ok(())
    }
}
