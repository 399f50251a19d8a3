//! Shared helpers for HTTP handler tests.

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::{AccountId, Error};
use crate::inbound::http::session::SessionContext;

/// Cookie-session middleware with an ephemeral key for tests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Route that logs the given account into the session, standing in for the
/// login flow.
pub(crate) fn test_login_route(id: AccountId) -> actix_web::Route {
    web::get().to(move |session: SessionContext| async move {
        session.persist_account(&id)?;
        Ok::<_, Error>(HttpResponse::Ok())
    })
}

/// Extract the session cookie from a response.
pub(crate) fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie present")
        .into_owned()
}
