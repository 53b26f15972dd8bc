use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use url::Url;

use crate::repository::{
    AccountRepository, QuestionRepository, ResultRepository, Storage, StorageError,
};

mod account_repo;
mod mapping;
mod question_repo;
mod result_repo;

pub use mapping::parse_question_set;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpConfig {
    /// Parse and validate a base URL such as `http://localhost:5000/api`.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidBaseUrl` if the URL does not parse and
    /// `HttpInitError::UnsupportedScheme` for anything but http(s).
    pub fn new(base_url: &str) -> Result<Self, HttpInitError> {
        let base_url = Url::parse(base_url.trim())?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(HttpInitError::UnsupportedScheme(base_url.scheme().to_owned()));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// REST backend reached over HTTP with a cookie-backed session.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    /// Build the HTTP client. No request is made until a repository call.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::Client` if the TLS backend cannot be initialised.
    pub fn connect(config: &HttpConfig) -> Result<Self, HttpInitError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::Connection(format!("unusable base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

impl Storage {
    /// Build a `Storage` backed by the REST API.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the HTTP client cannot be built.
    pub fn http(config: &HttpConfig) -> Result<Self, HttpInitError> {
        let repo = HttpRepository::connect(config)?;
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo);
        Ok(Self {
            questions,
            results,
            accounts,
        })
    }
}

pub(crate) fn request_error(err: reqwest::Error) -> StorageError {
    if err.is_decode() {
        StorageError::Serialization(err.to_string())
    } else {
        StorageError::Connection(err.to_string())
    }
}

/// Map non-success statuses onto `StorageError`.
pub(crate) fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status))
}

pub(crate) fn status_error(status: StatusCode) -> StorageError {
    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized,
        other => StorageError::Status(other.as_u16()),
    }
}
