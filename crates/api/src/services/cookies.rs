//! Cookie helper module for httpOnly authentication.
//!
//! Provides utilities for setting, reading, and clearing the two
//! authentication cookies: `auth_token` (JWT for standard users) and
//! `session_token` (server-side session for elevated roles).

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

use crate::config::CookieConfig;

/// Name of the JWT cookie issued to standard users.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Name of the server-side session cookie issued to elevated roles.
pub const SESSION_TOKEN_COOKIE: &str = "session_token";

/// Cookie helper for managing httpOnly authentication cookies.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
    /// JWT cookie lifetime in seconds (from JWT config)
    auth_token_expiry_secs: i64,
    /// Session cookie lifetime in seconds (from session config)
    session_token_expiry_secs: i64,
}

impl CookieHelper {
    /// Create a new cookie helper with configuration.
    pub fn new(
        config: CookieConfig,
        auth_token_expiry_secs: i64,
        session_token_expiry_secs: i64,
    ) -> Self {
        Self {
            config,
            auth_token_expiry_secs,
            session_token_expiry_secs,
        }
    }

    /// Build a Set-Cookie header value for the JWT cookie.
    pub fn build_auth_token_cookie(&self, token: &str) -> String {
        self.build_cookie(AUTH_TOKEN_COOKIE, token, self.auth_token_expiry_secs)
    }

    /// Build a Set-Cookie header value for the session cookie.
    pub fn build_session_token_cookie(&self, token: &str) -> String {
        self.build_cookie(SESSION_TOKEN_COOKIE, token, self.session_token_expiry_secs)
    }

    /// Build a Set-Cookie header that clears the JWT cookie.
    pub fn build_clear_auth_token_cookie(&self) -> String {
        self.build_clear_cookie(AUTH_TOKEN_COOKIE)
    }

    /// Build a Set-Cookie header that clears the session cookie.
    pub fn build_clear_session_token_cookie(&self) -> String {
        self.build_clear_cookie(SESSION_TOKEN_COOKIE)
    }

    /// Add the JWT cookie to a HeaderMap.
    pub fn add_auth_token_cookie(&self, headers: &mut HeaderMap, token: &str) {
        if let Ok(value) = HeaderValue::from_str(&self.build_auth_token_cookie(token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Add the session cookie to a HeaderMap.
    pub fn add_session_token_cookie(&self, headers: &mut HeaderMap, token: &str) {
        if let Ok(value) = HeaderValue::from_str(&self.build_session_token_cookie(token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Add clear cookies for both schemes to a HeaderMap (for logout).
    pub fn add_clear_cookies(&self, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_auth_token_cookie()) {
            headers.append(SET_COOKIE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_session_token_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Extract a cookie value from request headers by name.
    pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get(axum::http::header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|cookie_header| {
                cookie_header
                    .split(';')
                    .map(|s| s.trim())
                    .find_map(|cookie| {
                        let (cookie_name, cookie_value) = cookie.split_once('=')?;
                        if cookie_name == name {
                            Some(cookie_value)
                        } else {
                            None
                        }
                    })
            })
    }

    /// Extract the JWT from request headers.
    pub fn extract_auth_token<'a>(headers: &'a HeaderMap) -> Option<&'a str> {
        Self::extract_cookie(headers, AUTH_TOKEN_COOKIE)
    }

    /// Extract the session token from request headers.
    pub fn extract_session_token<'a>(headers: &'a HeaderMap) -> Option<&'a str> {
        Self::extract_cookie(headers, SESSION_TOKEN_COOKIE)
    }

    /// Build a cookie string with all security attributes.
    fn build_cookie(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age);

        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }

    /// Build a cookie string that clears an existing cookie.
    fn build_clear_cookie(&self, name: &str) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            name
        );

        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }
}
