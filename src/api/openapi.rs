use utoipa::OpenApi;

use super::handlers::{auth, health};

/// The served document is generated from the `#[utoipa::path]` annotations
/// on the handlers; add new endpoints to `paths(...)` so they show up in
/// `/docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
    ),
    components(schemas(
        auth::types::SignupRequest,
        auth::types::LoginRequest,
        auth::types::UserResponse,
        health::Health,
    )),
    tags(
        (name = "auth", description = "Signup, login, and session management"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/signup",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/me",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }
}
