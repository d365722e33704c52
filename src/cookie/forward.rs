use time::Duration;
use tower_cookies::{cookie::CookieJar, Cookie, Cookies};

use super::{ParsedCookie, ParsedCookies};

/// Somewhere outgoing cookies can be written. Writing a cookie whose name is
/// already present replaces the earlier one.
pub trait CookieSink {
    fn put(&mut self, cookie: Cookie<'static>);
}

impl CookieSink for Cookies {
    fn put(&mut self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}

impl CookieSink for CookieJar {
    fn put(&mut self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}

impl ParsedCookie {
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), self.value.clone());
        let options = &self.options;

        if let Some(path) = &options.path {
            cookie.set_path(path.clone());
        }
        if let Some(max_age) = options.max_age {
            cookie.set_max_age(Duration::seconds(max_age));
        }
        if let Some(expires) = options.expires {
            cookie.set_expires(expires);
        }
        if let Some(http_only) = options.http_only {
            cookie.set_http_only(http_only);
        }
        if let Some(secure) = options.secure {
            cookie.set_secure(secure);
        }
        if let Some(same_site) = options.same_site {
            cookie.set_same_site(same_site);
        }

        cookie
    }
}

/// Writes every parsed backend cookie onto the outgoing response as is.
pub fn forward_cookies<S>(sink: &mut S, cookies: &ParsedCookies)
where
    S: CookieSink + ?Sized,
{
    for cookie in cookies.values() {
        tracing::debug!("Forwarding cookie `{}`", cookie.name);
        sink.put(cookie.to_cookie());
    }
}

#[cfg(test)]
mod tests {
    use tower_cookies::cookie::SameSite;

    use super::*;
    use crate::cookie::parse_set_cookie_header;

    #[test]
    fn forwards_every_cookie_with_its_attributes() {
        let parsed = parse_set_cookie_header(
            "token=abc123; Path=/; Secure; SameSite=Lax, theme=dark; Path=/app; Max-Age=3600",
        );
        let mut jar = CookieJar::new();
        forward_cookies(&mut jar, &parsed);

        let token = jar.get("token").expect("token forwarded");
        assert_eq!(token.value(), "abc123");
        assert_eq!(token.path(), Some("/"));
        assert_eq!(token.http_only(), Some(true));
        assert_eq!(token.secure(), Some(true));
        assert_eq!(token.same_site(), Some(SameSite::Lax));

        let theme = jar.get("theme").expect("theme forwarded");
        assert_eq!(theme.value(), "dark");
        assert_eq!(theme.path(), Some("/app"));
        assert_eq!(theme.max_age(), Some(Duration::hours(1)));
        assert_eq!(theme.http_only(), None);
    }

    #[test]
    fn renders_as_set_cookie_header() {
        let parsed = parse_set_cookie_header("token=abc123; Path=/");
        let rendered = parsed["token"].to_cookie().to_string();

        assert!(rendered.starts_with("token=abc123"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn nothing_to_forward() {
        let mut jar = CookieJar::new();
        forward_cookies(&mut jar, &ParsedCookies::new());
        assert_eq!(jar.delta().count(), 0);
    }
}
