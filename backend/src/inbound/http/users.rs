//! Account lookup and follow graph handlers.
//!
//! ```text
//! GET /v1/users/{id}
//! PUT /v1/users/{id}/follow
//! PUT /v1/users/{id}/unfollow
//! ```

use actix_web::{HttpResponse, get, put, web};
use uuid::Uuid;

use crate::domain::AccountId;
use crate::domain::Error;
use crate::domain::ports::{AccountProfile, FollowRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Fetch an account profile. Credentials are never part of the payload.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = uuid::Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account profile", body = AccountProfile),
        (status = 404, description = "No active account with this id", body = Error)
    ),
    tags = ["users"],
    operation_id = "getAccount"
)]
#[get("/users/{id}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AccountProfile>> {
    let profile = state
        .accounts_query
        .get_account(AccountId::from_uuid(id.into_inner()))
        .await?;
    Ok(web::Json(profile))
}

/// Follow an account.
#[utoipa::path(
    put,
    path = "/v1/users/{id}/follow",
    params(("id" = uuid::Uuid, Path, description = "Account to follow")),
    responses(
        (status = 204, description = "Edge created"),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Already following", body = Error)
    ),
    tags = ["users"],
    operation_id = "followAccount",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}/follow")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_account_id()?;
    state
        .follows
        .follow(FollowRequest {
            follower,
            followed: AccountId::from_uuid(id.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Unfollow an account. Idempotent.
#[utoipa::path(
    put,
    path = "/v1/users/{id}/unfollow",
    params(("id" = uuid::Uuid, Path, description = "Account to unfollow")),
    responses(
        (status = 204, description = "Edge removed or already absent"),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["users"],
    operation_id = "unfollowAccount",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}/unfollow")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_account_id()?;
    state
        .follows
        .unfollow(FollowRequest {
            follower,
            followed: AccountId::from_uuid(id.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
