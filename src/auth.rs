//! Authentication and authorization gates
//!
//! The authentication gate turns the session cookie into verified claims;
//! the role gates decide what those claims may do. The role gates take
//! `&Claims`, so they cannot run before authentication: a missing or bad
//! cookie is always a 401 from the gate here, never a 403.

use tower_cookies::cookie::time::Duration as CookieDuration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::error::ApiError;
use crate::store::Role;
use crate::token::{self, Claims, TOKEN_TTL_SECS};

/// Name of the session cookie
pub const ACCESS_COOKIE: &str = "access_token";

/// Extract and verify the session token from the request cookies.
///
/// Missing cookie and invalid token produce distinct fixed messages; the
/// verification failure category is logged but never surfaced.
pub fn authenticate(cookies: &Cookies, secret: &str) -> Result<Claims, ApiError> {
    let cookie = cookies.get(ACCESS_COOKIE).ok_or(ApiError::NotAuthenticated)?;

    token::verify(cookie.value(), secret).map_err(|e| {
        tracing::debug!(reason = %e, "session token rejected");
        ApiError::InvalidToken
    })
}

/// Non-enforcing variant: attaches claims when a valid token is present,
/// never rejects the request.
pub fn optional_authenticate(cookies: &Cookies, secret: &str) -> Option<Claims> {
    let cookie = cookies.get(ACCESS_COOKIE)?;
    token::verify(cookie.value(), secret).ok()
}

/// Permit only the elevated administrative role.
pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.role != Role::Admin {
        return Err(ApiError::AdminRequired);
    }
    Ok(())
}

/// Permit any authenticated role; admins satisfy the member bar.
pub fn require_member(claims: &Claims) -> Result<(), ApiError> {
    match claims.role {
        Role::Member | Role::Admin => Ok(()),
    }
}

/// Set the session cookie. HttpOnly, SameSite=Lax, Secure in production,
/// 7-day max age matching the token TTL.
pub fn set_access_cookie(cookies: &Cookies, token: String, production: bool) {
    let cookie = Cookie::build((ACCESS_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(production)
        .max_age(CookieDuration::seconds(TOKEN_TTL_SECS))
        .build();
    cookies.add(cookie);
}

/// Clear the session cookie.
pub fn clear_access_cookie(cookies: &Cookies, production: bool) {
    let cookie = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(production)
        .max_age(CookieDuration::ZERO)
        .build();
    cookies.add(cookie);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn claims(role: Role) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }

    #[test]
    fn test_admin_gate() {
        assert!(require_admin(&claims(Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&claims(Role::Member)),
            Err(ApiError::AdminRequired)
        ));
    }

    #[test]
    fn test_member_gate_admits_both_roles() {
        assert!(require_member(&claims(Role::Member)).is_ok());
        assert!(require_member(&claims(Role::Admin)).is_ok());
    }
}
