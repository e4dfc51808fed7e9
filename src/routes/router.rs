use crate::core::state::AppState;
use crate::routes::{auth, backend};
use crate::utils;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub(crate) fn routes(state: AppState) -> Router {
    // /api/auth/...
    let auth_router = Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/verify", post(auth::verify))
        .route("/password-recovery", post(auth::recover_password))
        .route("/password-reset", post(auth::reset_password))
        .route("/sign-out", post(auth::sign_out));

    // /api/...
    let api_router = Router::new()
        .nest("/auth", auth_router)
        .route("/session", get(auth::session))
        .route("/backend/{*path}", get(backend::forward));

    // pages are rendered elsewhere; once the gate lets a page request
    // through there is nothing left to serve here
    Router::new()
        .nest("/api", api_router)
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .layer(middleware::from_fn_with_state(
            state.clone(),
            utils::gate::enforce,
        ))
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http().make_span_with(
                |request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str);

                    info_span!(
                        "request",
                        method = ?request.method(),
                        path = %request.uri().path(),
                        matched_path,
                    )
                },
            )),
        )
}
