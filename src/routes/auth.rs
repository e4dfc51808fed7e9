use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::session::cookie::CookieJar;
use crate::session::permission::Permissions;
use crate::types::request::{PasswordRecoveryData, PasswordResetData, SignInData, VerifyData};
use crate::types::response::{self, Authenticated};

/// Turns a successful backend authentication into a session cookie.
///
/// Sign-in, sign-up verification and password reset all end here so the
/// permissions they derive cannot drift apart.
fn establish(
    state: &AppState,
    mut jar: CookieJar,
    authenticated: Authenticated,
) -> Result<(CookieJar, Json<response::Session>), Error> {
    let Authenticated { user, access_token } = authenticated;

    let permissions = Permissions::derive(&user.user_type, user.worker_type.as_deref());
    if permissions.is_empty() {
        tracing::warn!("User type {} grants no permissions", user.user_type);
    }

    let created = state
        .sessions
        .create(&mut jar, user.clone(), permissions.clone(), access_token)?;

    if !created.created {
        return Err(Error::Internal);
    }

    tracing::debug!(permissions = ?permissions, "Session created");

    Ok((jar, Json(response::Session { user, permissions })))
}

#[instrument(skip_all)]
pub(crate) async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(data): Json<SignInData>,
) -> Result<impl IntoResponse, Error> {
    let authenticated = state.client.sign_in(&data).await?;

    establish(&state, jar, authenticated)
}

#[instrument(skip_all)]
pub(crate) async fn sign_up(
    State(state): State<AppState>,
    Json(data): Json<serde_json::Value>,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(state.client.sign_up(&data).await?))
}

#[instrument(skip_all)]
pub(crate) async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(data): Json<VerifyData>,
) -> Result<impl IntoResponse, Error> {
    let authenticated = state.client.verify(&data).await?;

    establish(&state, jar, authenticated)
}

#[instrument(skip_all)]
pub(crate) async fn recover_password(
    State(state): State<AppState>,
    Json(data): Json<PasswordRecoveryData>,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(state.client.recover_password(&data).await?))
}

#[instrument(skip_all)]
pub(crate) async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(data): Json<PasswordResetData>,
) -> Result<impl IntoResponse, Error> {
    let authenticated = state.client.reset_password(&data).await?;

    establish(&state, jar, authenticated)
}

#[instrument(skip_all)]
pub(crate) async fn sign_out(
    State(state): State<AppState>,
    mut jar: CookieJar,
) -> impl IntoResponse {
    let destroyed = state.sessions.destroy(&mut jar);

    (
        jar,
        Json(response::SignOut {
            destroyed: destroyed.destroyed,
        }),
    )
}

#[instrument(skip_all)]
pub(crate) async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Error> {
    let current = state.sessions.get_current(&jar)?;

    Ok(Json(response::Session {
        user: current.user,
        permissions: current.permissions,
    }))
}
