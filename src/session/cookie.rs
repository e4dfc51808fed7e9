use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use std::collections::HashMap;
use std::convert::Infallible;

use crate::core::error::Error;

pub(crate) const SESSION_COOKIE: &str = "session";

/// Twelve hours, shorter than the token lifetime.
pub(crate) const SESSION_MAX_AGE: u32 = 12 * 60 * 60;

/// Request cookies plus the `Set-Cookie` headers queued while handling the request.
///
/// Writes are reflected in later reads, so callers can check what the
/// browser will hold once the response is applied.
#[derive(Clone, Debug, Default)]
pub(crate) struct CookieJar {
    cookies: HashMap<String, String>,
    pending: Vec<HeaderValue>,
}

impl CookieJar {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let cookies = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let value = value
                    .strip_prefix('"')
                    .and_then(|value| value.strip_suffix('"'))
                    .unwrap_or(value);

                Some((name.to_owned(), value.to_owned()))
            })
            .collect();

        Self {
            cookies,
            pending: Vec::new(),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Sets an HTTP-only, secure, same-site-strict cookie scoped to `/`.
    pub(crate) fn set(&mut self, name: &str, value: &str, max_age: u32) -> Result<(), Error> {
        let header = HeaderValue::from_str(&format!(
            "{name}={value}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={max_age}"
        ))?;

        self.pending.push(header);
        self.cookies.insert(name.to_owned(), value.to_owned());

        Ok(())
    }

    pub(crate) fn remove(&mut self, name: &str) -> Result<(), Error> {
        let header = HeaderValue::from_str(&format!(
            "{name}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; HttpOnly; Secure; SameSite=Strict; Path=/"
        ))?;

        self.pending.push(header);
        self.cookies.remove(name);

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> &[HeaderValue] {
        &self.pending
    }
}

impl<S> FromRequestParts<S> for CookieJar
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for CookieJar {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for header in self.pending {
            res.headers_mut().append(SET_COOKIE, header);
        }

        Ok(res)
    }
}
