use axum::{
    body::Bytes,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    },
};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::Config;

/// Request headers passed through to the backend untouched.
const FORWARDED_HEADERS: [HeaderName; 4] = [COOKIE, AUTHORIZATION, CONTENT_TYPE, ACCEPT];

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Error issuing backend request")]
    HttpError(#[from] reqwest::Error),
    #[error("Error formatting backend URI")]
    ParseError(#[from] url::ParseError),
    #[error("Refusing to forward to a path outside the backend: {0}")]
    InvalidPath(String),
}

/// The one HTTP client used to talk to the backend API. Built once at
/// startup and shared through the router state.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

pub struct ForwardRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
    pub body: Bytes,
}

#[derive(Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub set_cookies: Vec<String>,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn set_cookie_headers(&self) -> impl Iterator<Item = &str> {
        self.set_cookies.iter().map(String::as_str)
    }
}

impl BackendClient {
    /// `base_url` must end with a slash, see [`Config`].
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.backend_timeout).build()?;
        Ok(Self::new(client, config.backend_url.clone()))
    }

    pub fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url, BackendError> {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == ".." || segment == ".") {
            return Err(BackendError::InvalidPath(path.to_owned()));
        }

        let mut url = self.base_url.join(relative)?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(BackendError::InvalidPath(path.to_owned()));
        }

        url.set_query(query.filter(|query| !query.is_empty()));
        Ok(url)
    }

    pub async fn forward(&self, request: ForwardRequest<'_>) -> Result<BackendResponse, BackendError> {
        let url = self.endpoint(request.path, request.query)?;
        tracing::debug!("Forwarding {} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);
        for name in FORWARDED_HEADERS {
            for value in request.headers.get_all(&name) {
                builder = builder.header(name.clone(), value.clone());
            }
        }

        let response = builder.body(request.body).send().await?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| match value.to_str() {
                Ok(value) => Some(value.to_owned()),
                Err(e) => {
                    tracing::warn!("Dropping non-ascii Set-Cookie header: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();
        let body = response.bytes().await?;

        tracing::debug!(
            "Backend answered {} with {} Set-Cookie header(s)",
            status,
            set_cookies.len()
        );

        Ok(BackendResponse {
            status,
            content_type,
            set_cookies,
            body,
        })
    }
}
