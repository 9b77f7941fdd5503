//! `AuthUser` extractor: reads the access token from the session cookie or
//! the `Authorization: Bearer` header, validates it and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt};

use roster_core::error::AppError;
use roster_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The cookie wins over the header when both are present.
pub(crate) fn access_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let from_cookie = parts
        .headers
        .typed_get::<Cookie>()
        .and_then(|c| c.get(cookie_name).map(str::to_string))
        .filter(|t| !t.is_empty());

    from_cookie.or_else(|| {
        parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|a| a.token().to_string())
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = access_token(parts, &state.config.auth.cookie_name)
            .ok_or_else(|| AppError::authentication("Missing access token"))?;

        let user = state.auth_service.authenticate(&token).await?;
        Ok(AuthUser(RequestContext::from_user(&user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/me");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_cookie_takes_precedence_over_bearer() {
        let p = parts(&[
            ("cookie", "theme=dark; access_token=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        assert_eq!(access_token(&p, "access_token").as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_used_without_cookie() {
        let p = parts(&[("authorization", "Bearer from-header")]);
        assert_eq!(access_token(&p, "access_token").as_deref(), Some("from-header"));

        let none = parts(&[("authorization", "Basic abc")]);
        assert_eq!(access_token(&none, "access_token"), None);
    }
}
