//! Feed query parameters and result rows.
//!
//! All pagination and filter inputs are validated here, before any query is
//! built; out-of-range values are client errors, never clamped silently.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::post::Post;

/// Inclusive page-size bounds.
pub const FEED_LIMIT_MIN: i64 = 1;
/// Upper page-size bound.
pub const FEED_LIMIT_MAX: i64 = 20;
/// Maximum number of filter tags per query.
pub const FEED_TAGS_MAX: usize = 5;
/// Maximum search string length.
pub const FEED_SEARCH_MAX: usize = 100;

/// Validation failures for feed parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedValidationError {
    #[error("limit must be between {FEED_LIMIT_MIN} and {FEED_LIMIT_MAX}")]
    Limit,
    #[error("offset must not be negative")]
    Offset,
    #[error("sort must be one of: asc, desc")]
    Sort,
    #[error("at most {FEED_TAGS_MAX} filter tags are allowed")]
    Tags,
    #[error("search must be at most {FEED_SEARCH_MAX} characters")]
    Search,
}

/// Sort direction over the feed's single sort key (`created_at`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = FeedValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(FeedValidationError::Sort),
        }
    }
}

/// Validated feed page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedParams {
    limit: i64,
    offset: i64,
    sort: SortOrder,
    tags: Vec<String>,
    search: String,
}

impl FeedParams {
    /// Validate raw pagination and filter inputs.
    pub fn new(
        limit: i64,
        offset: i64,
        sort: &str,
        tags: Vec<String>,
        search: String,
    ) -> Result<Self, FeedValidationError> {
        if !(FEED_LIMIT_MIN..=FEED_LIMIT_MAX).contains(&limit) {
            return Err(FeedValidationError::Limit);
        }
        if offset < 0 {
            return Err(FeedValidationError::Offset);
        }
        let sort = SortOrder::from_str(sort)?;
        if tags.len() > FEED_TAGS_MAX {
            return Err(FeedValidationError::Tags);
        }
        if search.chars().count() > FEED_SEARCH_MAX {
            return Err(FeedValidationError::Search);
        }
        Ok(Self {
            limit,
            offset,
            sort,
            tags,
            search,
        })
    }

    /// Page size.
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Page offset.
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Sort direction.
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Tag containment filter; empty means no tag filtering.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Case-insensitive substring filter; empty means no text filtering.
    pub fn search(&self) -> &str {
        self.search.as_str()
    }
}

/// One feed row: a visible post with its author handle and comment count.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub post: Post,
    pub author_username: String,
    pub comments_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(limit: i64, offset: i64, sort: &str) -> Result<FeedParams, FeedValidationError> {
        FeedParams::new(limit, offset, sort, Vec::new(), String::new())
    }

    #[rstest]
    #[case(1)]
    #[case(20)]
    fn accepts_limits_at_bounds(#[case] limit: i64) {
        assert!(params(limit, 0, "desc").is_ok());
    }

    #[rstest]
    #[case(0, FeedValidationError::Limit)]
    #[case(21, FeedValidationError::Limit)]
    #[case(-1, FeedValidationError::Limit)]
    fn rejects_out_of_range_limits(#[case] limit: i64, #[case] expected: FeedValidationError) {
        assert_eq!(params(limit, 0, "desc").expect_err("invalid limit"), expected);
    }

    #[test]
    fn rejects_negative_offset() {
        assert_eq!(
            params(10, -1, "desc").expect_err("invalid offset"),
            FeedValidationError::Offset
        );
    }

    #[rstest]
    #[case("upward")]
    #[case("ASC")]
    #[case("")]
    fn rejects_unknown_sort_values(#[case] sort: &str) {
        assert_eq!(
            params(10, 0, sort).expect_err("invalid sort"),
            FeedValidationError::Sort
        );
    }

    #[test]
    fn rejects_too_many_tags() {
        let tags = (0..6).map(|i| format!("t{i}")).collect();
        assert_eq!(
            FeedParams::new(10, 0, "asc", tags, String::new()).expect_err("too many tags"),
            FeedValidationError::Tags
        );
    }

    #[test]
    fn rejects_overlong_search() {
        let search = "s".repeat(FEED_SEARCH_MAX + 1);
        assert_eq!(
            FeedParams::new(10, 0, "asc", Vec::new(), search).expect_err("overlong search"),
            FeedValidationError::Search
        );
    }

    #[test]
    fn preserves_accepted_values() {
        let built = FeedParams::new(
            5,
            10,
            "asc",
            vec!["rust".to_owned()],
            "query".to_owned(),
        )
        .expect("valid params");

        assert_eq!(built.limit(), 5);
        assert_eq!(built.offset(), 10);
        assert_eq!(built.sort(), SortOrder::Asc);
        assert_eq!(built.tags(), ["rust"]);
        assert_eq!(built.search(), "query");
    }
}
