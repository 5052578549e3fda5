//! The creation endpoint
//!
//! Where links are created, usually the shortener behind `/api/create`

use core::fmt;

use reqwest::Client;
use reqwest::StatusCode;
use url::Url;

use crate::links::LinkRequest;

/// Path of the creation endpoint, relative to the origin
const CREATE_PATH: &str = "/api/create";

/// Endpoint errors
#[derive(Debug)]
pub enum Error {
    /// The request did not complete
    Connection(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
        }
    }
}

/// Result type for all endpoint interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Whatever the endpoint answered, interpretation is up to the caller
#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

/// Something that creates links
pub trait Endpoint {
    /// Send a single create request
    async fn create(&self, request: &LinkRequest) -> Result<Response>;
}

impl<E> Endpoint for &E
where
    E: Endpoint,
{
    async fn create(&self, request: &LinkRequest) -> Result<Response> {
        (**self).create(request).await
    }
}

/// The creation endpoint over HTTP
pub struct HttpEndpoint {
    client: Client,
    url: Url,
}

impl HttpEndpoint {
    /// Endpoint at `/api/create` of the origin
    pub fn new(origin: &Url) -> core::result::Result<Self, url::ParseError> {
        Ok(Self {
            client: Client::new(),
            url: origin.join(CREATE_PATH)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Endpoint for HttpEndpoint {
    /// Request:
    /// ```sh
    /// curl -v -H 'Content-Type: application/json' \
    ///     -d '{ "destination": "https://www.example.com/", "expires": 1712750400000 }' \
    ///     http://localhost:8000/api/create
    /// ```
    ///
    /// Response:
    /// ```json
    /// { "id": "abc123", "destination": "https://www.example.com/" }
    /// ```
    async fn create(&self, request: &LinkRequest) -> Result<Response> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        let body = response.text().await.map_err(connection_error)?;

        tracing::debug!("{} answered {status}", self.url);

        Ok(Response { status, body })
    }
}

fn connection_error(err: reqwest::Error) -> Error {
    Error::Connection(err.to_string())
}
