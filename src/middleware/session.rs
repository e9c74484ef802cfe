//! Session cookie handling.
//!
//! The `avalon` cookie carries an opaque token issued at login. It is not
//! signed or verified; it only selects which project a request works on.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "avalon";

/// Extractor for the session token. Rejects with 401 when the cookie is absent.
#[derive(Debug, Clone)]
pub struct Session(pub String);

impl Session {
    pub fn token(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_token(&jar)
            .map(Session)
            .ok_or(AppError::Unauthenticated)
    }
}

/// The non-empty `avalon` cookie value, if the client sent one.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .build()
}

/// Removal cookie: empty value, `Max-Age=0` and an expiry in the past.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{HeaderMap, HeaderValue};
    use axum::response::IntoResponse;

    fn jar(cookies: &[&str]) -> CookieJar {
        let mut h = HeaderMap::new();
        for c in cookies {
            h.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        CookieJar::from_headers(&h)
    }

    #[test]
    fn test_finds_token_among_other_cookies() {
        let j = jar(&["theme=dark; avalon=abc123; lang=ko"]);
        assert_eq!(session_token(&j).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_checks_every_cookie_header() {
        let j = jar(&["theme=dark", "avalon=xyz"]);
        assert_eq!(session_token(&j).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert!(session_token(&jar(&[])).is_none());
        assert!(session_token(&jar(&["avalon="])).is_none());
        assert!(session_token(&jar(&["avalonx=1"])).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let c = session_cookie("tok");
        assert_eq!(c.name(), SESSION_COOKIE);
        assert_eq!(c.value(), "tok");
        assert_eq!(c.path(), Some("/"));
        assert_eq!(c.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_jar_emits_set_and_removal_cookies() {
        let resp = CookieJar::new().add(session_cookie("tok")).into_response();
        let set = resp.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(set.starts_with("avalon=tok"), "{}", set);
        assert!(set.contains("Path=/"));

        let resp = jar(&["avalon=tok"])
            .add(expired_session_cookie())
            .into_response();
        let cleared = resp.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cleared.starts_with("avalon=;"), "{}", cleared);
        assert!(cleared.contains("Max-Age=0"), "{}", cleared);
    }

    #[tokio::test]
    async fn test_extractor_rejects_without_cookie() {
        let req = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let err = Session::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
