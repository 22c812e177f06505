//! Caller identity: read from request extensions, where the authentication layer puts it.

use crate::auth::{AccessLevel, Caller, Role};
use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Header carrying the caller role when running behind a trusted gateway.
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";
/// Header carrying the caller access level when running behind a trusted gateway.
pub const ACCESS_LEVEL_HEADER: &str = "x-access-level";

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Caller>().copied().ok_or(AppError::Unauthorized)
    }
}

/// Middleware turning gateway headers into a [`Caller`] extension.
/// Only mount this when every request passes through an authenticating proxy
/// that sets (and strips client-supplied) `X-Caller-Role` / `X-Access-Level`.
pub async fn trusted_caller_headers(mut req: Request, next: Next) -> Response {
    if let Some(caller) = caller_from_headers(req.headers()) {
        req.extensions_mut().insert(caller);
    }
    next.run(req).await
}

fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let role: Role = header(headers, CALLER_ROLE_HEADER)?.parse().ok()?;
    let access_level: AccessLevel = header(headers, ACCESS_LEVEL_HEADER)?.parse().ok()?;
    Some(Caller { role, access_level })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn both_headers_are_needed() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_ROLE_HEADER, HeaderValue::from_static("teacher"));
        assert!(caller_from_headers(&headers).is_none());
        headers.insert(ACCESS_LEVEL_HEADER, HeaderValue::from_static("editor"));
        assert_eq!(
            caller_from_headers(&headers),
            Some(Caller {
                role: Role::Teacher,
                access_level: AccessLevel::Editor
            })
        );
    }

    #[test]
    fn unknown_role_yields_no_caller() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_ROLE_HEADER, HeaderValue::from_static("janitor"));
        headers.insert(ACCESS_LEVEL_HEADER, HeaderValue::from_static("manager"));
        assert!(caller_from_headers(&headers).is_none());
    }
}
