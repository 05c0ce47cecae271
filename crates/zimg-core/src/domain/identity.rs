//! Session identity presented to the upstream, and its opaque handoff form.
//!
//! The upstream ties task visibility to the session cookies that created the
//! task, so the same identity has to travel with the task id for the whole
//! lifecycle. In client-handoff mode it leaves the process as an
//! [`AuthContext`] and comes back on every status query.
//!
//! # Known weakness
//!
//! An `AuthContext` is a reversible encoding, not a sealed token. Anyone who
//! captures it can recover the upstream session cookies and replay them.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::AuthContextError;

/// Cookie set the upstream expects from a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookies {
    /// Upstream session token (lowercase hex).
    pub session_id: String,
    /// Suffix of the analytics cookie names (`Hm_lvt_<key>`, `Hm_lpvt_<key>`).
    pub tracking_key: String,
    /// First-visit tracking timestamp, Unix seconds.
    pub first_visit: i64,
    /// Last-visit tracking timestamp, Unix seconds.
    pub last_visit: i64,
    /// Analytics account token (uppercase hex).
    pub account_id: String,
}

impl SessionCookies {
    /// Render the cookies as a single `Cookie` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        let key = &self.tracking_key;
        format!(
            "server_name_session={}; Hm_lvt_{key}={}; Hm_lpvt_{key}={}; HMACCOUNT={}",
            self.session_id, self.first_visit, self.last_visit, self.account_id
        )
    }
}

/// Immutable browser identity used for one upstream task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// User-agent drawn from the configured pool.
    pub user_agent: String,
    /// Session and tracking cookies.
    pub cookies: SessionCookies,
    /// Fixed request headers (origin, referer, accept, ...), keyed by name.
    pub headers: BTreeMap<String, String>,
}

impl SessionIdentity {
    /// Every header to attach to an upstream request, including the
    /// user-agent and cookie headers.
    #[must_use]
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        headers.push(("user-agent".to_string(), self.user_agent.clone()));
        headers.push(("cookie".to_string(), self.cookies.header_value()));
        headers
    }
}

/// Opaque, URL-safe token carrying a serialized [`SessionIdentity`].
///
/// The encoding is reversible and includes the upstream cookies: anyone
/// holding the token can query the task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthContext(String);

impl AuthContext {
    /// Serialize an identity into a handoff token.
    pub fn encode(identity: &SessionIdentity) -> Result<Self, AuthContextError> {
        let json = serde_json::to_vec(identity)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(json)))
    }

    /// Recover the identity carried by this token.
    ///
    /// Tokens produced with the standard base64 alphabet (with or without
    /// padding) are accepted as well.
    pub fn decode(&self) -> Result<SessionIdentity, AuthContextError> {
        let trimmed = self.0.trim().trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(trimmed)
            .or_else(|_| STANDARD_NO_PAD.decode(trimmed))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AuthContext {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AuthContext {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
