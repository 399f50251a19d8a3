//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every REST endpoint and the payload schemas so
//! tooling can consume the specification; debug builds also serve it at
//! `/api-docs/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    AccountProfile, CommentPayload, FeedItemPayload, PostPayload, PostWithComments,
    RegisterAccountRequest, RegisteredAccount, RolePayload,
};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::LoginRequestBody;
use crate::inbound::http::posts::{AddCommentBody, CreatePostBody, UpdatePostBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Burrow backend API",
        description = "Accounts, follow graph, posts, and the personalised feed."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::activate,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::get_account,
        crate::inbound::http::users::follow,
        crate::inbound::http::users::unfollow,
        crate::inbound::http::feed::get_feed,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AccountProfile,
        RolePayload,
        RegisterAccountRequest,
        RegisteredAccount,
        LoginRequestBody,
        CreatePostBody,
        UpdatePostBody,
        AddCommentBody,
        PostPayload,
        PostWithComments,
        CommentPayload,
        FeedItemPayload,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Registration, activation, and sessions"),
        (name = "users", description = "Profiles and the follow graph"),
        (name = "posts", description = "Posts and comments"),
        (name = "feed", description = "Personalised feed"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_references_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/v1/auth/register",
            "/v1/auth/login",
            "/v1/users/activate/{token}",
            "/v1/users/{id}",
            "/v1/users/{id}/follow",
            "/v1/users/feed",
            "/v1/posts",
            "/v1/posts/{id}",
            "/v1/posts/{id}/comments",
            "/health/ready",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
