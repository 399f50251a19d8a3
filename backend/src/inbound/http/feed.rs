//! Personalised feed handler.
//!
//! ```text
//! GET /v1/users/feed?limit&offset&sort&tags&search
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::domain::ports::{FeedItemPayload, GetFeedRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query-string parameters for the feed page.
#[derive(Debug, Deserialize, IntoParams)]
pub struct FeedQueryParams {
    /// Page size, 1–20. Defaults to 20.
    pub limit: Option<i64>,
    /// Page offset, ≥ 0. Defaults to 0.
    pub offset: Option<i64>,
    /// `asc` or `desc` over creation time. Defaults to `desc`.
    pub sort: Option<String>,
    /// Comma-separated tag filter; results must carry every tag.
    pub tags: Option<String>,
    /// Case-insensitive substring over title and content.
    pub search: Option<String>,
}

fn split_tags(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Fetch the page of posts visible to the session account.
#[utoipa::path(
    get,
    path = "/v1/users/feed",
    params(FeedQueryParams),
    responses(
        (status = 200, description = "Feed page, possibly empty", body = [FeedItemPayload]),
        (status = 400, description = "Invalid limit, offset, or sort", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["feed"],
    operation_id = "getFeed",
    security(("SessionCookie" = []))
)]
#[get("/users/feed")]
pub async fn get_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FeedQueryParams>,
) -> ApiResult<web::Json<Vec<FeedItemPayload>>> {
    let viewer = session.require_account_id()?;
    let query = query.into_inner();

    let items = state
        .feed
        .get_feed(GetFeedRequest {
            viewer,
            limit: query.limit.unwrap_or(20),
            offset: query.offset.unwrap_or(0),
            sort: query.sort.unwrap_or_else(|| "desc".to_owned()),
            tags: split_tags(query.tags),
            search: query.search.unwrap_or_default(),
        })
        .await?;
    Ok(web::Json(items))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    use super::*;
    use crate::domain::ports::MockFeedRepository;
    use crate::domain::{AccountId, FeedService};
    use crate::inbound::http::test_utils::{
        session_cookie, test_login_route, test_session_middleware,
    };

    fn split(raw: &str) -> Vec<String> {
        split_tags(Some(raw.to_owned()))
    }

    #[test]
    fn tags_split_on_commas_and_drop_empties() {
        assert_eq!(split("go,rust"), ["go", "rust"]);
        assert_eq!(split("go,,rust,"), ["go", "rust"]);
        assert!(split("").is_empty());
    }

    fn feed_app(
        repo: MockFeedRepository,
        viewer: AccountId,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState {
            feed: Arc::new(FeedService::new(Arc::new(repo))),
            ..HttpState::fixture()
        };
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .route("/test-login", test_login_route(viewer))
            .service(get_feed)
    }

    #[actix_web::test]
    async fn feed_requires_a_session() {
        let app = test::init_service(feed_app(MockFeedRepository::new(), AccountId::random())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/users/feed").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn invalid_sort_is_rejected_before_any_query() {
        let mut repo = MockFeedRepository::new();
        repo.expect_user_feed().times(0);
        let viewer = AccountId::random();
        let app = test::init_service(feed_app(repo, viewer)).await;

        let login_res =
            test::call_service(&app, test::TestRequest::get().uri("/test-login").to_request())
                .await;
        let cookie = session_cookie(&login_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/users/feed?sort=upward")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn out_of_range_limit_is_rejected_before_any_query() {
        let mut repo = MockFeedRepository::new();
        repo.expect_user_feed().times(0);
        let viewer = AccountId::random();
        let app = test::init_service(feed_app(repo, viewer)).await;

        let login_res =
            test::call_service(&app, test::TestRequest::get().uri("/test-login").to_request())
                .await;
        let cookie = session_cookie(&login_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/users/feed?limit=21")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn defaults_produce_an_empty_page_when_nothing_is_visible() {
        let mut repo = MockFeedRepository::new();
        repo.expect_user_feed()
            .times(1)
            .withf(|_, params| params.limit() == 20 && params.offset() == 0)
            .returning(|_, _| Ok(Vec::new()));
        let viewer = AccountId::random();
        let app = test::init_service(feed_app(repo, viewer)).await;

        let login_res =
            test::call_service(&app, test::TestRequest::get().uri("/test-login").to_request())
                .await;
        let cookie = session_cookie(&login_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/users/feed")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<FeedItemPayload> = test::read_body_json(res).await;
        assert!(body.is_empty());
    }
}
