use time::{Duration, OffsetDateTime};
use tower_cookies::{cookie::SameSite, Cookie};

use super::{forward::CookieSink, parse_set_cookie_headers, TOKEN_COOKIE};

/// Cleared on every logout, whether or not the backend mentions them.
pub const LOGOUT_DENYLIST: [&str; 5] = ["token", "refreshToken", "auth", "session", "user"];

pub fn is_auth_cookie(name: &str) -> bool {
    name == TOKEN_COOKIE || name.contains("auth") || name.contains("session")
}

/// Directive that makes the browser drop `name` immediately.
pub fn deletion_cookie(name: impl Into<String>) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.into(), "");
    cookie.set_path("/");
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie
}

/// Translates the backend's logout `Set-Cookie` header onto the outgoing
/// response. Auth cookies are always deleted, the rest are forwarded.
pub fn clear_logout_cookies<S>(sink: &mut S, header: Option<&str>)
where
    S: CookieSink + ?Sized,
{
    clear_logout_cookie_headers(sink, header);
}

/// Same as [`clear_logout_cookies`] for a response carrying several
/// `Set-Cookie` lines.
pub fn clear_logout_cookie_headers<'a, S, I>(sink: &mut S, headers: I)
where
    S: CookieSink + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    for (name, cookie) in parse_set_cookie_headers(headers) {
        if is_auth_cookie(&name) {
            tracing::debug!("Deleting auth cookie `{}` sent by backend on logout", name);
            sink.put(deletion_cookie(name));
        } else {
            sink.put(cookie.to_cookie());
        }
    }

    for name in LOGOUT_DENYLIST {
        sink.put(deletion_cookie(name));
    }
}
