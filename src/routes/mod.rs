pub(crate) mod auth;
pub(crate) mod backend;
pub(crate) mod router;
