//! Per-task browser identity synthesis.
//!
//! Every call to [`IdentityForge::create`] reads only the clock and a random
//! source. Nothing is shared between identities.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::{SessionCookies, SessionIdentity};

const SESSION_TOKEN_LEN: usize = 32;
const ACCOUNT_TOKEN_LEN: usize = 16;
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

/// The site the forged identity pretends to browse from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamProfile {
    /// Value of the `authority` header (upstream host name).
    pub authority: String,
    /// Value of the `origin` header.
    pub origin: String,
    /// Value of the `referer` header.
    pub referer: String,
    /// Value of the `accept-language` header.
    pub accept_language: String,
    /// Site id used in the analytics cookie names.
    pub tracking_key: String,
    /// Pool the user-agent is drawn from.
    pub user_agents: Vec<String>,
}

impl Default for UpstreamProfile {
    fn default() -> Self {
        Self {
            authority: "z-image.62tool.com".to_string(),
            origin: "https://z-image.62tool.com".to_string(),
            referer: "https://z-image.62tool.com/".to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            tracking_key: "2348c268e6bf5008b52f68ddd772f997".to_string(),
            user_agents: vec![
                FALLBACK_USER_AGENT.to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36".to_string(),
            ],
        }
    }
}

impl UpstreamProfile {
    /// Point the profile at another origin.
    ///
    /// Derives `referer` (origin plus trailing slash) and `authority` (host
    /// part) from it.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let host = origin
            .split_once("://")
            .map_or(origin.as_str(), |(_, rest)| rest)
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        self.referer = format!("{origin}/");
        self.authority = host;
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        self.user_agents = user_agents;
        self
    }
}

/// Creates a fresh [`SessionIdentity`] for every task.
#[derive(Debug, Clone, Default)]
pub struct IdentityForge {
    profile: UpstreamProfile,
}

impl IdentityForge {
    #[must_use]
    pub const fn new(profile: UpstreamProfile) -> Self {
        Self { profile }
    }

    /// Forge a new identity.
    #[must_use]
    pub fn create(&self) -> SessionIdentity {
        let mut rng = rand::rng();
        let now = Utc::now().timestamp();

        let user_agent = self
            .profile
            .user_agents
            .choose(&mut rng)
            .map_or_else(|| FALLBACK_USER_AGENT.to_string(), Clone::clone);

        let cookies = SessionCookies {
            session_id: random_hex(&mut rng, SESSION_TOKEN_LEN),
            tracking_key: self.profile.tracking_key.clone(),
            first_visit: now,
            last_visit: now,
            account_id: random_hex(&mut rng, ACCOUNT_TOKEN_LEN).to_uppercase(),
        };

        SessionIdentity {
            user_agent,
            cookies,
            headers: self.fixed_headers(),
        }
    }

    fn fixed_headers(&self) -> BTreeMap<String, String> {
        let profile = &self.profile;
        BTreeMap::from([
            ("authority".to_string(), profile.authority.clone()),
            ("accept".to_string(), "*/*".to_string()),
            ("accept-language".to_string(), profile.accept_language.clone()),
            ("content-type".to_string(), "application/json".to_string()),
            ("origin".to_string(), profile.origin.clone()),
            ("referer".to_string(), profile.referer.clone()),
        ])
    }
}

fn random_hex(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())]))
        .collect()
}
