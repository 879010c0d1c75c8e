use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod auth;
pub mod deployments;
pub mod domains;
pub mod envs;
pub mod projects;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/csrf-token", get(auth::csrf_token))
        .route("/projects", get(projects::list).post(projects::create))
        .route("/projects/{project}", patch(projects::update))
        .route(
            "/projects/{project}/deployments",
            get(deployments::list).post(deployments::trigger),
        )
        .route("/projects/{project}/upload", post(deployments::upload))
        .route(
            "/projects/{project}/deployments/bulk-delete",
            post(deployments::bulk_delete),
        )
        .route(
            "/projects/{project}/domains",
            get(domains::list).post(domains::add),
        )
        .route(
            "/projects/{project}/domains/{domain}",
            delete(domains::remove),
        )
        .route(
            "/projects/{project}/env",
            get(envs::show).put(envs::update),
        )
        // Session runs outermost so the CSRF check can read it.
        .layer(middleware::from_fn(auth::check_csrf))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .nest("/api", api)
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
