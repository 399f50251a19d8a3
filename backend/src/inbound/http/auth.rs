//! Authentication and account lifecycle handlers.
//!
//! ```text
//! POST /v1/auth/register
//! POST /v1/auth/login
//! POST /v1/auth/logout
//! PUT  /v1/users/activate/{token}
//! ```

use actix_web::{HttpResponse, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::credentials::{LoginCredentials, PlainPassword};
use crate::domain::ports::{RegisterAccountRequest, RegisteredAccount};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Register a new account.
///
/// The response carries the one-time plaintext activation token; it is never
/// shown again.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterAccountRequest,
    responses(
        (status = 201, description = "Account created, activation pending", body = RegisteredAccount),
        (status = 400, description = "Validation failure or duplicate username/email", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerAccount"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterAccountRequest>,
) -> ApiResult<HttpResponse> {
    let registered = state.accounts.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(registered))
}

/// Activate an account with its one-time token.
#[utoipa::path(
    put,
    path = "/v1/users/activate/{token}",
    params(("token" = String, Path, description = "Plaintext activation token")),
    responses(
        (status = 204, description = "Account activated"),
        (status = 400, description = "Invalid or expired token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "activateAccount"
)]
#[put("/users/activate/{token}")]
pub async fn activate(
    state: web::Data<HttpState>,
    token: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .activate(token.into_inner())
        .await
        .map_err(|err| match err.code() {
            // Invalid and expired tokens are a client error here, and stay
            // indistinguishable from each other.
            ErrorCode::NotFound => Error::invalid_request("invalid or expired activation token"),
            _ => err,
        })?;
    Ok(HttpResponse::NoContent().finish())
}

/// Login request payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
}

/// Authenticate and open a cookie session.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 204, description = "Session opened"),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let password = PlainPassword::new(body.password)
        .map_err(|_| Error::unauthorized("invalid email or password"))?;

    let id = state
        .login
        .authenticate(LoginCredentials::new(body.email, password))
        .await?;
    session.persist_account(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Close the session.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses((status = 204, description = "Session closed")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
