use tracing::instrument;

use crate::core::error::Error;
use crate::session::cookie::{CookieJar, SESSION_COOKIE, SESSION_MAX_AGE};
use crate::session::permission::Permissions;
use crate::session::token::{SessionPayload, TokenCodec};
use crate::types::user::User;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Created {
    pub(crate) created: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Destroyed {
    pub(crate) destroyed: bool,
}

/// Session owned by the current request, as handed to server actions.
#[derive(Clone, Debug)]
pub(crate) struct CurrentSession {
    pub(crate) user: User,
    pub(crate) access_token: String,
    pub(crate) permissions: Permissions,
}

impl From<SessionPayload> for CurrentSession {
    fn from(payload: SessionPayload) -> Self {
        Self {
            user: payload.user,
            access_token: payload.access_token,
            permissions: payload.permissions,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SessionManager {
    codec: TokenCodec,
}

impl SessionManager {
    pub(crate) fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    #[instrument(skip_all)]
    pub(crate) fn create(
        &self,
        jar: &mut CookieJar,
        user: User,
        permissions: Permissions,
        access_token: String,
    ) -> Result<Created, Error> {
        let payload = SessionPayload {
            user,
            permissions,
            access_token,
        };

        let token = self.codec.encode(&payload)?;

        jar.set(SESSION_COOKIE, &token, SESSION_MAX_AGE)?;

        Ok(Created {
            created: jar.contains(SESSION_COOKIE),
        })
    }

    #[instrument(skip_all)]
    pub(crate) fn destroy(&self, jar: &mut CookieJar) -> Destroyed {
        if let Err(e) = jar.remove(SESSION_COOKIE) {
            tracing::warn!("Failed to clear session cookie: {}", e);
        }

        Destroyed {
            destroyed: !jar.contains(SESSION_COOKIE),
        }
    }

    pub(crate) fn get_current(&self, jar: &CookieJar) -> Result<CurrentSession, Error> {
        let token = jar
            .get(SESSION_COOKIE)
            .ok_or(Error::Unauthorized("No session found"))?;

        self.decrypt(token)
            .map(CurrentSession::from)
            .ok_or(Error::Unauthorized("Invalid session"))
    }

    /// Verifies a session token; any failure means "no session".
    pub(crate) fn decrypt(&self, token: &str) -> Option<SessionPayload> {
        match self.codec.decode(token) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("Rejected session cookie: {}", e);
                None
            }
        }
    }
}
