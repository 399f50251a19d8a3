//! Backend entry-point: wires persistence, cache, sessions, and REST routes.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::Trace;
use backend::domain::ports::{NoopProfileCache, ProfileCache, WelcomeMailer};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::{auth, feed, posts, users};
use backend::outbound::cache::RedisProfileCache;
use backend::outbound::email::LogWelcomeMailer;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{AppConfig, build_http_state};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    if config.run_migrations {
        run_migrations(config.database_url.clone()).await?;
    }

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.db_pool_max_size),
    )
    .await
    .map_err(std::io::Error::other)?;

    let cache: Arc<dyn ProfileCache> = match &config.redis_url {
        Some(url) => Arc::new(
            RedisProfileCache::connect(url)
                .await
                .map_err(std::io::Error::other)?,
        ),
        None => Arc::new(NoopProfileCache),
    };
    let mailer: Arc<dyn WelcomeMailer> = Arc::new(LogWelcomeMailer::new());

    let state = web::Data::new(build_http_state(pool, cache, mailer, &config));
    let key = load_session_key(&config.session_key_file)?;
    let cookie_secure = config.cookie_secure;

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server_state = state.clone();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        // Route order matters inside the scope: /users/feed must be
        // registered ahead of /users/{id}.
        let api = web::scope("/v1")
            .wrap(session)
            .app_data(server_state.clone())
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::activate)
            .service(feed::get_feed)
            .service(users::get_account)
            .service(users::follow)
            .service(users::unfollow)
            .service(posts::create_post)
            .service(posts::get_post)
            .service(posts::update_post)
            .service(posts::delete_post)
            .service(posts::add_comment);

        let app = App::new()
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi as _;
    web::Json(backend::ApiDoc::openapi())
}

fn load_session_key(key_path: &str) -> std::io::Result<Key> {
    match std::fs::read(key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = std::env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    })
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))?
}
