//! PostgreSQL-backed `PostRepository` implementation using Diesel.
//!
//! Updates condition on the caller's last-read version and increment it in
//! the same statement; a vanished row and a stale version are deliberately
//! indistinguishable.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::post::{
    NewPost, Post, PostChanges, PostContent, PostParts, PostTitle, TagSet,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> PostPersistenceError {
    map_pool_error(error, |message| PostPersistenceError::connection(message))
}

fn timeout_error() -> PostPersistenceError {
    PostPersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

fn map_diesel(error: diesel::result::Error) -> PostPersistenceError {
    map_diesel_error(
        error,
        |message| PostPersistenceError::query(message),
        |message| PostPersistenceError::connection(message),
    )
}

/// Convert a database row into a validated domain post.
pub(crate) fn row_to_post(row: PostRow) -> Result<Post, PostPersistenceError> {
    let title = PostTitle::new(row.title)
        .map_err(|err| PostPersistenceError::query(err.to_string()))?;
    let content = PostContent::new(row.content)
        .map_err(|err| PostPersistenceError::query(err.to_string()))?;
    let tags =
        TagSet::new(row.tags).map_err(|err| PostPersistenceError::query(err.to_string()))?;

    Ok(Post::new(PostParts {
        id: row.id,
        author: AccountId::from_uuid(row.user_id),
        title,
        content,
        tags,
        created_at: row.created_at,
        updated_at: row.updated_at,
        version: row.version,
    }))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewPostRow {
            id: post.id,
            user_id: *post.author.as_uuid(),
            title: post.title.as_str().to_owned(),
            content: post.content.as_str().to_owned(),
            tags: post.tags.to_vec(),
        };

        let row = bounded(
            async {
                diesel::insert_into(posts::table)
                    .values(&new_row)
                    .returning(PostRow::as_returning())
                    .get_result::<PostRow>(&mut conn)
                    .await
                    .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        row_to_post(row)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bounded(
            async {
                posts::table
                    .find(*id)
                    .select(PostRow::as_select())
                    .first::<PostRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        row.map(row_to_post).transpose()
    }

    async fn update(
        &self,
        id: &Uuid,
        expected_version: i32,
        changes: &PostChanges,
    ) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bounded(
            async {
                diesel::update(
                    posts::table.filter(
                        posts::id.eq(*id).and(posts::version.eq(expected_version)),
                    ),
                )
                .set((
                    posts::title.eq(changes.title.as_str()),
                    posts::content.eq(changes.content.as_str()),
                    posts::tags.eq(changes.tags.to_vec()),
                    posts::updated_at.eq(Utc::now()),
                    posts::version.eq(posts::version + 1),
                ))
                .returning(PostRow::as_returning())
                .get_result::<PostRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        // Zero rows matched: the id is gone or the version moved under us.
        let Some(row) = row else {
            return Err(PostPersistenceError::not_found());
        };
        row_to_post(row)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let affected = bounded(
            async {
                diesel::delete(posts::table.find(*id))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        if affected == 0 {
            return Err(PostPersistenceError::not_found());
        }
        Ok(())
    }
}
