//! Account and session endpoints: signup, login, logout, me.
//!
//! Flow Overview:
//! 1) Validate the payload shape.
//! 2) Hash/verify the password against the user store.
//! 3) Mint an HS256 session token and hand it to the client in an
//!    `HttpOnly` cookie.
//!
//! Credential failures share one message regardless of whether the email
//! was unknown or the password wrong, so responses cannot be used to
//! enumerate accounts.

pub(crate) mod cookie;
pub(crate) mod password;
pub(crate) mod state;
pub(crate) mod storage;
pub(crate) mod token;
pub mod types;

pub use cookie::AuthenticatedUser;
pub use state::AuthConfig;

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api::handlers::{normalize_email, valid_email};
use crate::api::response::{ApiError, ApiSuccess};
use types::{LoginRequest, SignupRequest, UserResponse};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const MIN_PASSWORD_LENGTH: usize = 8;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created; the session cookie is set", body = UserResponse),
        (status = 400, description = "Malformed or missing fields"),
        (status = 409, description = "An account with this email already exists"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::validation("Missing payload"));
    };

    let email = normalize_email(&payload.email);
    if !valid_email(&email) {
        return Err(ApiError::validation("Invalid email address"));
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let first_name = payload.first_name.trim();
    let last_name = payload.last_name.trim();
    let company_name = payload.company_name.trim();
    if first_name.is_empty() || last_name.is_empty() || company_name.is_empty() {
        return Err(ApiError::validation(
            "First name, last name, and company name are required",
        ));
    }

    let password_hash = password::hash_password(&payload.password, config.bcrypt_cost())?;

    let user = match storage::insert_user(
        &pool,
        &email,
        &password_hash,
        first_name,
        last_name,
        company_name,
    )
    .await?
    {
        storage::SignupOutcome::Created(user) => user,
        storage::SignupOutcome::Conflict => {
            return Err(ApiError::conflict(
                "An account with this email already exists",
            ));
        }
    };

    debug!("User created: {}", user.id);

    let headers = session_headers(&config, &user)?;
    Ok((headers, ApiSuccess::data(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; the session cookie is set", body = UserResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::validation("Missing payload"));
    };

    let email = normalize_email(&payload.email);

    // Unknown email and wrong password must be indistinguishable.
    let Some(record) = storage::lookup_credentials(&pool, &email).await? else {
        return Err(ApiError::authentication(INVALID_CREDENTIALS));
    };
    if !password::verify_password(&payload.password, &record.password_hash) {
        return Err(ApiError::authentication(INVALID_CREDENTIALS));
    }

    debug!("Login successful: {}", record.user.id);

    let headers = session_headers(&config, &record.user)?;
    Ok((headers, ApiSuccess::data(UserResponse::from(record.user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared; succeeds with or without a session"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(
    config: Extension<Arc<AuthConfig>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie::clear_session_cookie(&config)?);
    Ok((headers, ApiSuccess::message("Logged out")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 404, description = "User no longer exists"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(principal) = cookie::current_user(&headers, &config, token::unix_now()) else {
        return Err(ApiError::authentication("Authentication required"));
    };

    // Never trust token claims alone; the row may have vanished since the
    // token was issued.
    let Some(user) = storage::fetch_user(&pool, principal.user_id).await? else {
        return Err(ApiError::not_found("User not found"));
    };

    Ok(ApiSuccess::data(UserResponse::from(user)))
}

fn session_headers(
    config: &AuthConfig,
    user: &storage::UserRecord,
) -> Result<HeaderMap, ApiError> {
    let claims = token::SessionTokenClaims::new(
        user.id,
        user.email.as_str(),
        token::unix_now(),
        config.session_ttl_seconds(),
    );
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie::issue_session_cookie(config, &claims)?);
    Ok(headers)
}
