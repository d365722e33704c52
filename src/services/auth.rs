use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::Response,
    Json,
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::{
    backend::ForwardRequest,
    cookie::{clear_logout_cookie_headers, clear_logout_cookies},
    MealPlannerState,
};

use super::{proxy::forward_and_relay, WebResult};

const LOGIN_ENDPOINT: &str = "auth/login";
const REGISTER_ENDPOINT: &str = "auth/register";
const LOGOUT_ENDPOINT: &str = "auth/logout";
const ME_ENDPOINT: &str = "auth/me";

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    success: bool,
}

fn post<'a>(path: &'a str, headers: &'a HeaderMap, body: Bytes) -> ForwardRequest<'a> {
    ForwardRequest {
        method: Method::POST,
        path,
        query: None,
        headers,
        body,
    }
}

pub async fn login(
    State(state): State<MealPlannerState>,
    mut cookies: Cookies,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Response> {
    forward_and_relay(&state, &mut cookies, post(LOGIN_ENDPOINT, &headers, body)).await
}

pub async fn register(
    State(state): State<MealPlannerState>,
    mut cookies: Cookies,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Response> {
    forward_and_relay(&state, &mut cookies, post(REGISTER_ENDPOINT, &headers, body)).await
}

pub async fn me(
    State(state): State<MealPlannerState>,
    mut cookies: Cookies,
    headers: HeaderMap,
) -> WebResult<Response> {
    let request = ForwardRequest {
        method: Method::GET,
        path: ME_ENDPOINT,
        query: None,
        headers: &headers,
        body: Bytes::new(),
    };
    forward_and_relay(&state, &mut cookies, request).await
}

/// Logs out on the backend, then clears the auth cookies no matter what the
/// backend answered. A backend that can't be reached doesn't keep the user
/// logged in here.
pub async fn logout(
    State(state): State<MealPlannerState>,
    mut cookies: Cookies,
    headers: HeaderMap,
) -> Json<LogoutResponse> {
    match state
        .backend
        .forward(post(LOGOUT_ENDPOINT, &headers, Bytes::new()))
        .await
    {
        Ok(response) => {
            if !response.status.is_success() {
                tracing::warn!("Backend logout answered {}", response.status);
            }
            clear_logout_cookie_headers(&mut cookies, response.set_cookie_headers());
        }
        Err(e) => {
            tracing::warn!("Backend logout failed, clearing cookies locally: {}", e);
            clear_logout_cookies(&mut cookies, None);
        }
    }

    Json(LogoutResponse { success: true })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{header::SET_COOKIE, Request, StatusCode},
    };
    use reqwest::Client;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use crate::{app, backend::BackendClient, cookie::LOGOUT_DENYLIST};

    use super::*;

    fn router_for(backend_url: &str) -> axum::Router {
        let backend = BackendClient::new(Client::new(), Url::parse(backend_url).unwrap());
        app(MealPlannerState { backend }, Path::new("./does-not-exist"))
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_owned())
            .collect()
    }

    fn find<'a>(cookies: &'a [String], name: &str) -> &'a str {
        let prefix = format!("{name}=");
        cookies
            .iter()
            .find(|cookie| cookie.starts_with(&prefix))
            .unwrap_or_else(|| panic!("no Set-Cookie for `{name}` in {cookies:?}"))
    }

    fn assert_cleared(cookie: &str) {
        assert!(cookie.contains("=;"), "{cookie}");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"), "{cookie}");
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("SameSite=Strict"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
    }

    #[tokio::test]
    async fn login_forwards_backend_cookies() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/auth/login"))
            .and(matchers::body_string("{\"email\":\"a@b.c\"}"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "token=abc123; Path=/; Secure")
                    .append_header("set-cookie", "locale=en; Path=/")
                    .set_body_raw("{\"user\":{\"id\":1}}", "application/json"),
            )
            .mount(&server)
            .await;

        let response = router_for(&format!("{}/", server.uri()))
            .oneshot(
                Request::post("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"email\":\"a@b.c\"}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        let token = find(&cookies, "token");
        assert!(token.starts_with("token=abc123"));
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("Secure"));
        assert!(!find(&cookies, "locale").contains("HttpOnly"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"user\":{\"id\":1}}");
    }

    #[tokio::test]
    async fn login_relays_backend_rejection() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_raw("{\"error\":\"nope\"}", "application/json"))
            .mount(&server)
            .await;

        let response = router_for(&format!("{}/", server.uri()))
            .oneshot(Request::post("/api/auth/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn logout_clears_backend_and_denylisted_cookies() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/auth/logout"))
            .and(matchers::header("cookie", "token=abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "sessionId=xyz; Path=/")
                    .append_header("set-cookie", "theme=dark; Path=/"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&format!("{}/", server.uri()))
            .oneshot(
                Request::post("/api/auth/logout")
                    .header("cookie", "token=abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert_cleared(find(&cookies, "sessionId"));
        assert!(find(&cookies, "theme").starts_with("theme=dark"));
        for name in LOGOUT_DENYLIST {
            assert_cleared(find(&cookies, name));
        }
    }

    #[tokio::test]
    async fn logout_clears_denylist_when_backend_is_down() {
        // Nothing listens on the discard port
        let response = router_for("http://127.0.0.1:9/")
            .oneshot(Request::post("/api/auth/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), LOGOUT_DENYLIST.len());
        for name in LOGOUT_DENYLIST {
            assert_cleared(find(&cookies, name));
        }

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"success\":true}");
    }

    #[tokio::test]
    async fn proxy_passes_method_path_and_query() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("PUT"))
            .and(matchers::path("/recipes/42"))
            .and(matchers::query_param("notify", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&format!("{}/", server.uri()))
            .oneshot(
                Request::put("/api/recipes/42?notify=true")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn proxy_reports_unreachable_backend() {
        let response = router_for("http://127.0.0.1:9/")
            .oneshot(Request::get("/api/recipes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
