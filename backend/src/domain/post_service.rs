//! Post service: CRUD with optimistic concurrency, mutation authorisation,
//! and comments.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::account::Actor;
use crate::domain::comment::{CommentContent, NewComment};
use crate::domain::error::Error;
use crate::domain::ports::{
    AddCommentRequest, CommentPayload, CommentPersistenceError, CommentRepository,
    CreatePostRequest, DeletePostRequest, PostPayload, PostPersistenceError, PostRepository,
    PostWithComments, PostsCommand, PostsQuery, RolePersistenceError, RoleRepository,
    UpdatePostRequest,
};
use crate::domain::post::{NewPost, Post, PostChanges, PostContent, PostTitle, TagSet};

fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post store unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post store error: {message}"))
        }
        PostPersistenceError::NotFound => Error::not_found("post not found"),
    }
}

fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment store unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment store error: {message}"))
        }
    }
}

fn map_role_error(error: RolePersistenceError) -> Error {
    match error {
        RolePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("role store unavailable: {message}"))
        }
        RolePersistenceError::Query { message } => {
            Error::internal(format!("role store error: {message}"))
        }
    }
}

fn invalid(error: impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string())
}

/// Role names required for non-owner mutations.
#[derive(Debug, Clone)]
pub struct PostAuthorizationConfig {
    pub update_role: String,
    pub delete_role: String,
}

impl Default for PostAuthorizationConfig {
    fn default() -> Self {
        Self {
            update_role: "moderator".to_owned(),
            delete_role: "admin".to_owned(),
        }
    }
}

/// Service owning post and comment mutations and reads.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    roles: Arc<dyn RoleRepository>,
    authorization: PostAuthorizationConfig,
}

impl PostService {
    /// Create the service with its driven ports.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        roles: Arc<dyn RoleRepository>,
        authorization: PostAuthorizationConfig,
    ) -> Self {
        Self {
            posts,
            comments,
            roles,
            authorization,
        }
    }

    async fn fetch_post(&self, id: &Uuid) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    /// Owners may always mutate their own posts; everyone else needs at
    /// least the named role's precedence level.
    async fn authorize(
        &self,
        actor: &Actor,
        post: &Post,
        required_role: &str,
    ) -> Result<(), Error> {
        if post.author() == &actor.id {
            return Ok(());
        }

        let required = self
            .roles
            .find_by_name(required_role)
            .await
            .map_err(map_role_error)?
            .ok_or_else(|| Error::internal(format!("role {required_role} is not configured")))?;

        if actor.role_level >= required.level {
            Ok(())
        } else {
            Err(Error::forbidden("insufficient permissions"))
        }
    }
}

#[async_trait]
impl PostsCommand for PostService {
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostPayload, Error> {
        let candidate = NewPost {
            id: Uuid::new_v4(),
            author: request.author,
            title: PostTitle::new(request.title).map_err(invalid)?,
            content: PostContent::new(request.content).map_err(invalid)?,
            tags: TagSet::new(request.tags).map_err(invalid)?,
        };

        let post = self
            .posts
            .create(&candidate)
            .await
            .map_err(map_post_error)?;
        Ok(PostPayload::from(post))
    }

    async fn update_post(&self, request: UpdatePostRequest) -> Result<PostPayload, Error> {
        let current = self.fetch_post(&request.post_id).await?;
        self.authorize(&request.actor, &current, &self.authorization.update_role)
            .await?;

        let changes = PostChanges {
            title: match request.title {
                Some(title) => PostTitle::new(title).map_err(invalid)?,
                None => current.title().clone(),
            },
            content: match request.content {
                Some(content) => PostContent::new(content).map_err(invalid)?,
                None => current.content().clone(),
            },
            tags: match request.tags {
                Some(tags) => TagSet::new(tags).map_err(invalid)?,
                None => current.tags().clone(),
            },
        };

        let updated = self
            .posts
            .update(&request.post_id, request.expected_version, &changes)
            .await
            .map_err(map_post_error)?;
        Ok(PostPayload::from(updated))
    }

    async fn delete_post(&self, request: DeletePostRequest) -> Result<(), Error> {
        let current = self.fetch_post(&request.post_id).await?;
        self.authorize(&request.actor, &current, &self.authorization.delete_role)
            .await?;

        self.posts
            .delete(&request.post_id)
            .await
            .map_err(map_post_error)
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<CommentPayload, Error> {
        self.fetch_post(&request.post_id).await?;

        let candidate = NewComment {
            id: Uuid::new_v4(),
            post_id: request.post_id,
            author: request.author,
            content: CommentContent::new(request.content).map_err(invalid)?,
        };

        let comment = self
            .comments
            .create(&candidate)
            .await
            .map_err(map_comment_error)?;
        Ok(CommentPayload::from(comment))
    }
}

#[async_trait]
impl PostsQuery for PostService {
    async fn get_post(&self, id: Uuid) -> Result<PostWithComments, Error> {
        let post = self.fetch_post(&id).await?;
        let comments = self
            .comments
            .list_for_post(&id)
            .await
            .map_err(map_comment_error)?;

        Ok(PostWithComments {
            post: PostPayload::from(post),
            comments: comments.into_iter().map(CommentPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
