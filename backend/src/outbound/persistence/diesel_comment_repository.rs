//! PostgreSQL-backed `CommentRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::ports::{CommentPersistenceError, CommentRepository};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CommentPersistenceError {
    map_pool_error(error, |message| {
        CommentPersistenceError::connection(message)
    })
}

fn timeout_error() -> CommentPersistenceError {
    CommentPersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

fn map_diesel(error: diesel::result::Error) -> CommentPersistenceError {
    map_diesel_error(
        error,
        |message| CommentPersistenceError::query(message),
        |message| CommentPersistenceError::connection(message),
    )
}

fn row_to_comment(row: CommentRow, author_username: String) -> Comment {
    Comment {
        id: row.id,
        post_id: row.post_id,
        author: AccountId::from_uuid(row.user_id),
        author_username,
        content: row.content,
        created_at: row.created_at,
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewCommentRow {
            id: comment.id,
            post_id: comment.post_id,
            user_id: *comment.author.as_uuid(),
            content: comment.content.as_str().to_owned(),
        };

        let (row, author_username) = bounded(
            async {
                let author_username: String = users::table
                    .find(*comment.author.as_uuid())
                    .select(users::username)
                    .first(&mut conn)
                    .await
                    .map_err(map_diesel)?;

                let row = diesel::insert_into(comments::table)
                    .values(&new_row)
                    .returning(CommentRow::as_returning())
                    .get_result::<CommentRow>(&mut conn)
                    .await
                    .map_err(map_diesel)?;

                Ok((row, author_username))
            },
            timeout_error,
        )
        .await?;

        Ok(row_to_comment(row, author_username))
    }

    async fn list_for_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(CommentRow, String)> = bounded(
            async {
                comments::table
                    .inner_join(users::table)
                    .filter(comments::post_id.eq(*post_id))
                    .order(comments::created_at.desc())
                    .select((CommentRow::as_select(), users::username))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|(row, author_username)| row_to_comment(row, author_username))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn row_conversion_attaches_the_author_handle() {
        let row = CommentRow {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: "nice".to_owned(),
            created_at: Utc::now(),
        };

        let comment = row_to_comment(row, "bob".to_owned());
        assert_eq!(comment.author_username, "bob");
        assert_eq!(comment.content, "nice");
    }
}
