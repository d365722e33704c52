use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    backend::{BackendResponse, ForwardRequest},
    cookie::{forward_cookies, parse_set_cookie_headers},
    MealPlannerState,
};

use super::WebResult;

/// Sends the request to the backend and relays its answer, cookies included.
pub async fn forward_and_relay(
    state: &MealPlannerState,
    cookies: &mut Cookies,
    request: ForwardRequest<'_>,
) -> WebResult<Response> {
    let response = state.backend.forward(request).await?;

    let parsed = parse_set_cookie_headers(response.set_cookie_headers());
    forward_cookies(cookies, &parsed);

    Ok(relay(response))
}

pub fn relay(backend: BackendResponse) -> Response {
    let mut response = (backend.status, backend.body).into_response();
    match backend.content_type {
        Some(content_type) => {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }
    response
}

/// Fallback of the `/api` router: everything the gateway doesn't handle
/// itself goes straight to the backend. The uri arrives with `/api` stripped.
pub async fn proxy(
    State(state): State<MealPlannerState>,
    mut cookies: Cookies,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Response> {
    let request = ForwardRequest {
        method,
        path: uri.path(),
        query: uri.query(),
        headers: &headers,
        body,
    };

    forward_and_relay(&state, &mut cookies, request).await
}
