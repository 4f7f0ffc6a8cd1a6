use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use http::{Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;
pub mod db;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod notification;
    pub mod post;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod post;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod posts;
    pub mod users;
}

pub mod handlers {
    pub mod auth;
    pub mod posts;
    pub mod realtime;
    pub mod users;
}

pub mod realtime {
    pub mod bus;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}

use state::AppState;

/// Assembles the full application router over the given state.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let public_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/users/github/{username}", get(handlers::users::github_repos))
        .route("/ws", get(handlers::realtime::ws_handler))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/posts", get(handlers::posts::list_posts))
        .route("/api/posts", post(handlers::posts::create_post))
        .route("/api/posts/like/{id}", put(handlers::posts::toggle_like))
        .route("/api/posts/comment/{id}", post(handlers::posts::add_comment))
        .route("/api/users/suggestions", get(handlers::users::suggestions))
        .route("/api/users/follow/{id}", put(handlers::users::follow))
        .route("/api/users/profile/{id}", get(handlers::users::profile))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
}
