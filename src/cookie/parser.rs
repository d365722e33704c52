use std::collections::HashMap;

use time::{format_description::well_known::Rfc2822, macros::format_description};
use time::{OffsetDateTime, PrimitiveDateTime};
use tower_cookies::cookie::SameSite;

/// The backend's session cookie. Always forced `HttpOnly`.
pub const TOKEN_COOKIE: &str = "token";

/// Cookies parsed from one backend response, keyed by name.
pub type ParsedCookies = HashMap<String, ParsedCookie>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: Option<String>,
    pub max_age: Option<i64>, // Seconds
    pub expires: Option<OffsetDateTime>,
    pub http_only: Option<bool>,
    pub secure: Option<bool>,
    pub same_site: Option<SameSite>,
}

/// One directive taken from a `Set-Cookie` header. The value is kept raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

/// Parses a `Set-Cookie` header value that may hold several comma joined
/// declarations. Never fails: anything that can't be understood is skipped.
pub fn parse_set_cookie_header(header: &str) -> ParsedCookies {
    let mut cookies = ParsedCookies::new();
    collect_declarations(header, &mut cookies);
    cookies
}

/// Parses every `Set-Cookie` line of a response in order. Later lines win.
pub fn parse_set_cookie_headers<'a, I>(headers: I) -> ParsedCookies
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cookies = ParsedCookies::new();
    for header in headers {
        collect_declarations(header, &mut cookies);
    }
    cookies
}

fn collect_declarations(header: &str, cookies: &mut ParsedCookies) {
    for declaration in split_declarations(header) {
        match parse_declaration(declaration) {
            Some(cookie) => {
                cookies.insert(cookie.name.clone(), cookie);
            }
            None if !declaration.trim().is_empty() => {
                tracing::debug!("Skipping malformed cookie declaration: {:?}", declaration);
            }
            None => {}
        }
    }
}

/// Splits on the commas that start a new `name=` pair. Commas anywhere else,
/// like the one in `Expires=Wed, 09 Jun 2021 10:18:14 GMT`, stay put.
fn split_declarations(header: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut start = 0;

    for (index, _) in header.match_indices(',') {
        if starts_new_declaration(&header[index + 1..]) {
            declarations.push(&header[start..index]);
            start = index + 1;
        }
    }
    declarations.push(&header[start..]);

    declarations
}

fn starts_new_declaration(rest: &str) -> bool {
    let rest = rest.trim_start();
    match rest.find(['=', ';', ',']) {
        Some(end) if rest[end..].starts_with('=') => {
            let name = &rest[..end];
            !name.is_empty() && name.chars().all(is_token_char)
        }
        _ => false,
    }
}

// RFC 7230 token characters
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c)
}

fn parse_declaration(declaration: &str) -> Option<ParsedCookie> {
    let mut segments = declaration.split(';');
    let (name, value) = segments.next()?.split_once('=')?;

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut options = CookieOptions::default();
    for segment in segments {
        apply_attribute(&mut options, segment);
    }

    if name == TOKEN_COOKIE {
        options.http_only = Some(true);
    }

    Some(ParsedCookie {
        name: name.to_owned(),
        value: value.trim().to_owned(),
        options,
    })
}

fn apply_attribute(options: &mut CookieOptions, segment: &str) {
    let (key, value) = match segment.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (segment.trim(), None),
    };

    match (key.to_ascii_lowercase().as_str(), value) {
        ("httponly", _) => options.http_only = Some(true),
        ("secure", _) => options.secure = Some(true),
        ("path", Some(path)) => options.path = Some(path.to_owned()),
        ("max-age", Some(seconds)) => {
            if let Ok(seconds) = seconds.parse::<i64>() {
                options.max_age = Some(seconds);
            }
        }
        ("expires", Some(date)) => {
            if let Some(expires) = parse_http_date(date) {
                options.expires = Some(expires);
            }
        }
        ("samesite", Some(same_site)) => {
            if let Some(same_site) = parse_same_site(same_site) {
                options.same_site = Some(same_site);
            }
        }
        _ => {}
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    // IMF-fixdate, then the dashed form some servers still send
    let imf_fixdate = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    let dashed = format_description!(
        "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
    );

    PrimitiveDateTime::parse(value, imf_fixdate)
        .or_else(|_| PrimitiveDateTime::parse(value, dashed))
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|_| OffsetDateTime::parse(value, &Rfc2822))
        .ok()
}
