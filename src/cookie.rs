mod forward;
mod logout;
mod parser;

pub use forward::{forward_cookies, CookieSink};
pub use logout::{
    clear_logout_cookie_headers, clear_logout_cookies, deletion_cookie, is_auth_cookie,
    LOGOUT_DENYLIST,
};
pub use parser::{
    parse_set_cookie_header, parse_set_cookie_headers, CookieOptions, ParsedCookie, ParsedCookies,
    TOKEN_COOKIE,
};
