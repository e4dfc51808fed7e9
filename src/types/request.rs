use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct SignInData {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct VerifyData {
    pub(crate) email: String,
    pub(crate) code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct PasswordRecoveryData {
    pub(crate) email: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct PasswordResetData {
    pub(crate) token: String,
    pub(crate) password: String,
}
