pub(crate) mod cookie;
pub(crate) mod manager;
pub(crate) mod permission;
pub(crate) mod token;
