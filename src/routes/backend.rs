use axum::Json;
use axum::extract::{Path, RawQuery, State};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::session::cookie::CookieJar;

/// Forwards a read to the backend with the caller's bearer token.
#[instrument(skip(state, jar, query))]
pub(crate) async fn forward(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, Error> {
    let session = state.sessions.get_current(&jar)?;

    let body = state
        .client
        .get(&path, query.as_deref(), &session.access_token)
        .await?;

    Ok(Json(body))
}
