use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "./frontend/build";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Expected the '{0}' environment variable to be set.")]
    Missing(&'static str),
    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: Url,
    pub bind_address: SocketAddr,
    pub static_dir: PathBuf,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL").ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let backend_url = parse_backend_url(&backend_url)?;

        let bind_address: SocketAddr = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDRESS",
                message: e.to_string(),
            })?;

        let static_dir = PathBuf::from(
            lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_owned()),
        );

        let backend_timeout: u64 = match lookup("BACKEND_TIMEOUT_SECS") {
            Some(secs) => secs.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "BACKEND_TIMEOUT_SECS",
                    message: e.to_string(),
                }
            })?,
            None => DEFAULT_BACKEND_TIMEOUT_SECS,
        };

        Ok(Self {
            backend_url,
            bind_address,
            static_dir,
            backend_timeout: Duration::from_secs(backend_timeout),
        })
    }
}

/// Backend paths are joined onto this url, so it has to end with a slash.
fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: "BACKEND_URL",
        message: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            key: "BACKEND_URL",
            message: "not a base url".into(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
