//! Configuration from the environment

use core::fmt;
use std::env::VarError;
use std::env::var;

use url::Url;

/// Origin used when `BASE_URL` is not set
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration errors
#[derive(Debug)]
pub enum Error {
    /// `BASE_URL` is not a URL at all
    InvalidBaseUrl(String, url::ParseError),

    /// `BASE_URL` can not serve links, like `mailto:` or `ftp://`
    UnsupportedBaseUrl(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidBaseUrl(_, err) => Some(err),
            Error::UnsupportedBaseUrl(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidBaseUrl(value, err) => write!(f, r#"Invalid BASE_URL "{value}": {err}"#),
            Error::UnsupportedBaseUrl(value) => {
                write!(f, r#"BASE_URL "{value}" has to be an http(s) origin"#)
            }
        }
    }
}

/// Everything the form needs to know about its surroundings
#[derive(Clone, Debug)]
pub struct Config {
    /// Origin of the shortener, links are created at `/api/create` and
    /// served at `/<id>`
    pub base_url: Url,
}

impl Config {
    /// Read the configuration
    ///
    /// Uses the `BASE_URL` environment variable, or `http://localhost:8000`
    pub fn from_env() -> Result<Self, Error> {
        let base_url = env_var_or_else("BASE_URL", || {
            tracing::info!("`BASE_URL` is not set, using {DEFAULT_BASE_URL}");

            String::from(DEFAULT_BASE_URL)
        });

        Self::with_base_url(&base_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url)
            .map_err(|err| Error::InvalidBaseUrl(base_url.to_string(), err))?;

        if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
            return Err(Error::UnsupportedBaseUrl(base_url.to_string()));
        }

        Ok(Self { base_url: url })
    }
}

/// Get the value of ENV var, unless it is missing or empty
fn env_var_or_else(var_name: &'static str, or_else: impl FnOnce() -> String) -> String {
    value_or_else(var(var_name), or_else)
}

/// Empty and unset are the same
fn value_or_else(
    value: Result<String, VarError>,
    or_else: impl FnOnce() -> String,
) -> String {
    match value {
        Ok(value) if !value.is_empty() => value,
        _ => or_else(),
    }
}
