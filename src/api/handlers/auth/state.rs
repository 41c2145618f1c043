//! Process-wide auth configuration.
//!
//! Built once from the CLI/environment and injected into handlers as an
//! extension, so tests can construct alternates with deterministic values.

use secrecy::{ExposeSecret, SecretString};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    public_base_url: String,
    token_secret: SecretString,
    bcrypt_cost: u32,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(public_base_url: String, token_secret: SecretString) -> Self {
        Self {
            public_base_url,
            token_secret,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub(crate) fn token_secret(&self) -> &[u8] {
        self.token_secret.expose_secret().as_bytes()
    }

    pub(crate) fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    // Only mark cookies secure when the site is served over HTTPS.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}
