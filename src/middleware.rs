use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
};

pub fn create_span(request: &Request) -> tracing::Span {
    let method = request.method();
    let uri = request.uri();

    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str())
        .unwrap_or("<unknown>");

    tracing::debug_span!("request", %method, %uri, matched_path)
}

#[allow(clippy::unused_async)]
pub async fn handle_error() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "That endpoint does not exist.")
}
