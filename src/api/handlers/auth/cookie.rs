//! Session cookie transport for the signed token.
//!
//! The cookie is the only place the raw token lives on the client side;
//! `Authorization: Bearer` is accepted as a fallback for non-browser API
//! clients.

use anyhow::{Context, Result};
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use uuid::Uuid;

use super::state::AuthConfig;
use super::token::{self, SessionTokenClaims};

pub(crate) const SESSION_COOKIE_NAME: &str = "soporte_session";

/// Verified identity for the lifetime of one request.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Sign the claims and wrap the token in a `Set-Cookie` value whose
/// `Max-Age` mirrors the token expiry.
pub(crate) fn issue_session_cookie(
    config: &AuthConfig,
    claims: &SessionTokenClaims,
) -> Result<HeaderValue> {
    let token = token::sign(config.token_secret(), claims)
        .context("failed to sign session token")?;

    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie")
}

/// Overwrite the cookie with an immediately-expired empty value.
pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue> {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie")
}

/// Resolve the request to a verified user, or absent.
///
/// Missing cookie, bad signature, and expired token all collapse to `None`;
/// callers branch on presence for the common "not logged in" case.
pub(crate) fn current_user(
    headers: &HeaderMap,
    config: &AuthConfig,
    now_unix_seconds: i64,
) -> Option<AuthenticatedUser> {
    let raw = extract_session_token(headers)?;
    let claims = token::verify(&raw, config.token_secret(), now_unix_seconds).ok()?;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;
    Some(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    const NOW: i64 = 1_700_000_000;

    fn config(url: &str) -> AuthConfig {
        AuthConfig::new(
            url.to_string(),
            SecretString::from("cookie-test-secret".to_string()),
        )
        .with_session_ttl_seconds(3600)
    }

    fn claims() -> SessionTokenClaims {
        SessionTokenClaims::new(Uuid::nil(), "alice@example.com", NOW, 3600)
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={value}")).expect("cookie"),
        );
        headers
    }

    #[test]
    fn issued_cookie_carries_attributes() -> Result<()> {
        let cookie = issue_session_cookie(&config("http://localhost:3000"), &claims())?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));
        Ok(())
    }

    #[test]
    fn issued_cookie_is_secure_over_https() -> Result<()> {
        let cookie = issue_session_cookie(&config("https://app.soporte.dev"), &claims())?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn cleared_cookie_expires_immediately() -> Result<()> {
        let cookie = clear_session_cookie(&config("http://localhost:3000"))?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=;")));
        assert!(cookie.contains("Max-Age=0"));
        Ok(())
    }

    #[test]
    fn cookie_round_trips_to_current_user() -> Result<()> {
        let config = config("http://localhost:3000");
        let cookie = issue_session_cookie(&config, &claims())?;
        let raw_token = cookie
            .to_str()?
            .split(';')
            .next()
            .and_then(|pair| pair.splitn(2, '=').nth(1))
            .context("no token in cookie")?
            .to_string();

        let user = current_user(&headers_with_cookie(&raw_token), &config, NOW)
            .context("expected a user")?;
        assert_eq!(user.user_id, Uuid::nil());
        assert_eq!(user.email, "alice@example.com");
        Ok(())
    }

    #[test]
    fn bearer_header_is_accepted() -> Result<()> {
        let config = config("http://localhost:3000");
        let token = token::sign(config.token_secret(), &claims())?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        assert!(current_user(&headers, &config, NOW).is_some());
        Ok(())
    }

    #[test]
    fn absent_and_invalid_sessions_are_none() {
        let config = config("http://localhost:3000");

        assert!(current_user(&HeaderMap::new(), &config, NOW).is_none());
        assert!(current_user(&headers_with_cookie("not-a-token"), &config, NOW).is_none());
    }

    #[test]
    fn expired_session_is_none() -> Result<()> {
        let config = config("http://localhost:3000");
        let token = token::sign(config.token_secret(), &claims())?;
        let headers = headers_with_cookie(&token);

        assert!(current_user(&headers, &config, NOW).is_some());
        assert!(current_user(&headers, &config, NOW + 3600).is_none());
        Ok(())
    }

    #[test]
    fn tampered_session_is_none() -> Result<()> {
        let config = config("http://localhost:3000");
        let mut token = token::sign(config.token_secret(), &claims())?;
        let last = token.pop().context("empty token")?;
        token.push(if last == 'x' { 'y' } else { 'x' });

        assert!(current_user(&headers_with_cookie(&token), &config, NOW).is_none());
        Ok(())
    }

    #[test]
    fn non_uuid_subject_is_none() -> Result<()> {
        let config = config("http://localhost:3000");
        let mut claims = claims();
        claims.sub = "not-a-uuid".to_string();
        let token = token::sign(config.token_secret(), &claims)?;

        assert!(current_user(&headers_with_cookie(&token), &config, NOW).is_none());
        Ok(())
    }
}
