//! Post and comment handlers.
//!
//! ```text
//! POST   /v1/posts
//! GET    /v1/posts/{id}
//! PATCH  /v1/posts/{id}
//! DELETE /v1/posts/{id}
//! POST   /v1/posts/{id}/comments
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::account::Actor;
use crate::domain::ports::{
    AddCommentRequest, CommentPayload, CreatePostRequest, DeletePostRequest, PostPayload,
    PostWithComments, UpdatePostRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the session account into an [`Actor`] through the cached profile
/// lookup path.
async fn resolve_actor(state: &HttpState, session: &SessionContext) -> Result<Actor, Error> {
    let id = session.require_account_id()?;
    let profile = state.accounts_query.get_account(id).await?;
    Ok(profile.actor())
}

/// Request payload for creating a post.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    #[schema(example = "T")]
    pub title: String,
    #[schema(example = "C")]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for a versioned partial update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Version the caller last read; a stale value yields 404.
    pub version: i32,
}

/// Request payload for commenting on a post.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentBody {
    pub content: String,
}

/// Create a post owned by the session account.
#[utoipa::path(
    post,
    path = "/v1/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Post created at version 1", body = PostPayload),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost",
    security(("SessionCookie" = []))
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let author = session.require_account_id()?;
    let body = payload.into_inner();

    let created = state
        .posts
        .create_post(CreatePostRequest {
            author,
            title: body.title,
            content: body.content,
            tags: body.tags,
        })
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch a post with its comments.
#[utoipa::path(
    get,
    path = "/v1/posts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with comments", body = PostWithComments),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<PostWithComments>> {
    let found = state.posts_query.get_post(id.into_inner()).await?;
    Ok(web::Json(found))
}

/// Update a post, guarded by the version the caller last read.
#[utoipa::path(
    patch,
    path = "/v1/posts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Post id")),
    request_body = UpdatePostBody,
    responses(
        (status = 200, description = "Updated post, version incremented", body = PostPayload),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner and no sufficient role", body = Error),
        (status = 404, description = "Missing post or stale version", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost",
    security(("SessionCookie" = []))
)]
#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<UpdatePostBody>,
) -> ApiResult<web::Json<PostPayload>> {
    let actor = resolve_actor(&state, &session).await?;
    let body = payload.into_inner();

    let updated = state
        .posts
        .update_post(UpdatePostRequest {
            actor,
            post_id: id.into_inner(),
            title: body.title,
            content: body.content,
            tags: body.tags,
            expected_version: body.version,
        })
        .await?;
    Ok(web::Json(updated))
}

/// Delete a post.
#[utoipa::path(
    delete,
    path = "/v1/posts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner and no sufficient role", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost",
    security(("SessionCookie" = []))
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = resolve_actor(&state, &session).await?;

    state
        .posts
        .delete_post(DeletePostRequest {
            actor,
            post_id: id.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/v1/posts/{id}/comments",
    params(("id" = uuid::Uuid, Path, description = "Post id")),
    request_body = AddCommentBody,
    responses(
        (status = 201, description = "Comment created", body = CommentPayload),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment",
    security(("SessionCookie" = []))
)]
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<AddCommentBody>,
) -> ApiResult<HttpResponse> {
    let author = session.require_account_id()?;

    let comment = state
        .posts
        .add_comment(AddCommentRequest {
            author,
            post_id: id.into_inner(),
            content: payload.into_inner().content,
        })
        .await?;
    Ok(HttpResponse::Created().json(comment))
}
