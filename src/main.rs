use std::{env, net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    middleware::{self},
    Router,
};
use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    Surreal,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use uuid::Uuid;

use crate::{
    auth::token_service::AuthConfig,
    helpers::schema_helpers::apply_schema,
    middlewares::mw_rate_limit::RateLimiter,
    routes::{
        comment_routes::CommentRoutes, cron_routes::CronRoutes, song_routes::SongRoutes,
        trending_routes::TrendingRoutes, user_routes::UserRoutes,
    },
    services::trending_service::TrendingConfig,
};

pub use self::error::{Error, Result};

mod auth;
mod controllers;
mod error;
mod helpers;
mod middlewares;
mod models;
mod routes;
mod services;
mod validators;

#[derive(Clone)]
struct AppState {
    db: Surreal<Any>,
    rate_limiter: RateLimiter,
    auth_config: AuthConfig,
    trending: TrendingConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!("Starting Songboard API...");

    let db_url = env::var("DB_URL")?;
    let db_ns = env::var("DB_NS")?;
    let db_name = env::var("DB_NAME")?;

    tracing::info!("Connecting to database at: {}", db_url);

    let db = any::connect(&db_url).await?;

    // Embedded engines (mem://, rocksdb://) have no root user to sign in as.
    if let (Ok(db_user), Ok(db_password)) = (env::var("DB_USER"), env::var("DB_PASSWORD")) {
        db.signin(Root {
            username: &db_user,
            password: &db_password,
        })
        .await?;
    }
    db.use_ns(&db_ns).use_db(&db_name).await?;

    tracing::info!("Database connected successfully!");

    apply_schema(&db).await?;

    let auth_config = AuthConfig::from_env()?;
    if auth_config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET is not set, scheduler endpoints will reject every call");
    }

    let trending = TrendingConfig::from_env();
    tracing::info!(
        like_weight = trending.like_weight,
        comment_weight = trending.comment_weight,
        decay_epsilon = trending.decay_epsilon,
        "Trending configuration loaded"
    );

    let app_state = AppState {
        db,
        rate_limiter: RateLimiter::from_env(),
        auth_config,
        trending,
    };

    let public_routes = Router::new()
        .nest("/songs", SongRoutes::public_routes())
        .nest("/trending", TrendingRoutes::routes())
        .merge(UserRoutes::public_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_rate_limit::rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_auth::mw_optional_auth,
        ));

    let protected_routes = Router::new()
        .nest("/songs", SongRoutes::protected_routes())
        .nest("/comments", CommentRoutes::protected_routes())
        .merge(UserRoutes::protected_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_rate_limit::rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_auth::mw_auth,
        ));

    let cron_routes = Router::new()
        .nest("/cron", CronRoutes::routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_auth::mw_cron_auth,
        ));

    let routes_api = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(cron_routes);

    let routes_all = Router::new()
        .nest("/api", routes_api)
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    match status.as_u16() {
                        200..=299 => tracing::info!("{} ({}ms)", status, latency_ms),
                        400..=499 => tracing::warn!("{} ({}ms)", status, latency_ms),
                        500..=599 => tracing::error!("{} ({}ms)", status, latency_ms),
                        _ => tracing::info!("{} ({}ms)", status, latency_ms),
                    }
                }),
        )
        .layer(CorsLayer::very_permissive());

    let host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| Error::EnvVarError(format!("invalid bind address {host}:{port}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        routes_all.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "songboard_api=debug,tower_http=info,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
