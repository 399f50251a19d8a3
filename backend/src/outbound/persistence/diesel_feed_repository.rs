//! PostgreSQL-backed `FeedRepository` implementation using Diesel.
//!
//! One composed query produces the page: visibility comes from the follow
//! graph (authors the viewer follows, plus the viewer), text search is an
//! ILIKE over title and content, tag filtering is array containment, and the
//! comment count rides along via a left join with grouping.

use async_trait::async_trait;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::account::AccountId;
use crate::domain::feed::{FeedItem, FeedParams, SortOrder};
use crate::domain::ports::{FeedPersistenceError, FeedRepository};

use super::diesel_post_repository::row_to_post;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::PostRow;
use super::pool::{DbPool, PoolError};
use super::schema::{comments, followers, posts, users};
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

/// Diesel-backed implementation of the feed query port.
#[derive(Clone)]
pub struct DieselFeedRepository {
    pool: DbPool,
}

impl DieselFeedRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> FeedPersistenceError {
    map_pool_error(error, |message| FeedPersistenceError::connection(message))
}

fn timeout_error() -> FeedPersistenceError {
    FeedPersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

fn map_diesel(error: diesel::result::Error) -> FeedPersistenceError {
    map_diesel_error(
        error,
        |message| FeedPersistenceError::query(message),
        |message| FeedPersistenceError::connection(message),
    )
}

/// Substring pattern for the case-insensitive search filter. An empty search
/// yields `%%`, which matches every row.
fn search_pattern(search: &str) -> String {
    format!("%{search}%")
}

#[async_trait]
impl FeedRepository for DieselFeedRepository {
    async fn user_feed(
        &self,
        viewer: &AccountId,
        params: &FeedParams,
    ) -> Result<Vec<FeedItem>, FeedPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let viewer_id = *viewer.as_uuid();
        let followed_authors = followers::table
            .filter(followers::follower_id.eq(viewer_id))
            .select(followers::user_id);
        let pattern = search_pattern(params.search());

        // `tags @> '{}'` holds for every row, so the containment filter is a
        // no-op when no filter tags were requested.
        let page = posts::table
            .inner_join(users::table)
            .left_join(comments::table)
            .filter(users::is_active.eq(true))
            .filter(
                posts::user_id
                    .eq(viewer_id)
                    .or(posts::user_id.eq_any(followed_authors)),
            )
            .filter(
                posts::title
                    .ilike(pattern.clone())
                    .or(posts::content.ilike(pattern)),
            )
            .filter(posts::tags.contains(params.tags().to_vec()))
            .group_by((posts::id, users::id))
            .select((
                PostRow::as_select(),
                users::username,
                count(comments::id.nullable()),
            ))
            .limit(params.limit())
            .offset(params.offset());

        let rows: Vec<(PostRow, String, i64)> = bounded(
            async {
                match params.sort() {
                    SortOrder::Asc => {
                        page.order(posts::created_at.asc())
                            .load(&mut conn)
                            .await
                    }
                    SortOrder::Desc => {
                        page.order(posts::created_at.desc())
                            .load(&mut conn)
                            .await
                    }
                }
                .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        rows.into_iter()
            .map(|(row, author_username, comments_count)| {
                let post = row_to_post(row)
                    .map_err(|err| FeedPersistenceError::query(err.to_string()))?;
                Ok(FeedItem {
                    post,
                    author_username,
                    comments_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_matches_everything() {
        assert_eq!(search_pattern(""), "%%");
    }

    #[test]
    fn search_is_wrapped_as_a_substring_pattern() {
        assert_eq!(search_pattern("rust"), "%rust%");
    }

    #[test]
    fn diesel_failures_map_to_query_errors() {
        let mapped = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(mapped, FeedPersistenceError::Query { .. }));
    }
}
