use serde::{Deserialize, Serialize};

use crate::session::permission::Permissions;
use crate::types::user::User;

/// Body of every backend call that authenticates a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Authenticated {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

/// What the browser gets to see of a session. The bearer token stays inside the cookie.
#[derive(Debug, Serialize)]
pub(crate) struct Session {
    pub(crate) user: User,
    pub(crate) permissions: Permissions,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignOut {
    pub(crate) destroyed: bool,
}
