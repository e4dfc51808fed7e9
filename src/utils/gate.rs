use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::policy::{AccessPolicy, DOCS, DOCS_INDEX, LANDING, SIGN_IN};
use crate::session::cookie::{CookieJar, SESSION_COOKIE};
use crate::session::manager::SessionManager;
use crate::session::token::SessionPayload;

#[derive(Debug, PartialEq)]
pub(crate) enum Decision {
    /// Let the request through, carrying the verified session if there is one.
    Allow(Option<SessionPayload>),
    Redirect(&'static str),
}

/// Resolves `.` and `..` segments and collapses repeated slashes, so the
/// table sees the path the router will eventually serve.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Decides what happens to a request for `path` given its raw session cookie.
///
/// Session problems never fail; they end in a redirect to sign-in. The only
/// error is a path that cannot be classified.
pub(crate) fn decide(
    policy: &AccessPolicy,
    sessions: &SessionManager,
    path: &str,
    cookie: Option<&str>,
) -> Result<Decision, Error> {
    let decoded = urlencoding::decode(path).map_err(|_| Error::MalformedPath)?;
    let normalized = normalize(&decoded);
    let path = normalized.as_str();

    if policy.is_bypassed(path) {
        return Ok(Decision::Allow(None));
    }

    if policy.development() && path == DOCS {
        return Ok(Decision::Redirect(DOCS_INDEX));
    }

    let public = policy.is_public(path);
    let anonymous = if public {
        Decision::Allow(None)
    } else {
        Decision::Redirect(SIGN_IN)
    };

    let Some(token) = cookie else {
        return Ok(anonymous);
    };

    // an unreadable cookie counts as no cookie at all
    let Some(payload) = sessions.decrypt(token) else {
        return Ok(anonymous);
    };

    // a session without any role could only reach public routes, and those
    // bounce signed-in users to the landing page; treat it as anonymous
    let Some(role) = payload.permissions.role() else {
        tracing::warn!("Session without a role for path {}", path);
        return Ok(anonymous);
    };

    if !policy.allows(Some(role), path) {
        tracing::debug!("{} may not open {}", role, path);
        return Ok(Decision::Redirect(SIGN_IN));
    }

    if public {
        return Ok(Decision::Redirect(LANDING));
    }

    Ok(Decision::Allow(Some(payload)))
}

/// Runs before every routed handler.
pub(crate) async fn enforce(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let jar = CookieJar::from_headers(request.headers());

    let decision = decide(
        &state.policy,
        &state.sessions,
        request.uri().path(),
        jar.get(SESSION_COOKIE),
    )?;

    match decision {
        Decision::Allow(session) => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }

            Ok(next.run(request).await)
        }
        Decision::Redirect(to) => Ok(Redirect::temporary(to).into_response()),
    }
}
