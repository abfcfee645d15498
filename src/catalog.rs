//! # Catalog sources
//!
//! A [`CatalogSource`] returns the raw text of a debris element-set catalog. The cache
//! treats it as an opaque, possibly slow and possibly failing collaborator: every
//! failure is reported as [`DebrisError::UpstreamUnavailable`].
//!
//! Three sources are provided:
//!
//! - [`SpaceTrackClient`]: the Space-Track.org general perturbations (`gp`) class,
//!   restricted to objects of type `DEBRIS` with an epoch in the last `lookback_days`,
//!   most recent first. Authentication and query share a single POST to the
//!   `/ajaxauth/login` endpoint.
//! - [`StaticCatalog`]: a fixed text held in memory.
//! - [`FileCatalog`]: a text file read on every fetch.
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::config::SpaceTrackConfig;
use crate::debris_errors::{ConfigError, DebrisError};
use crate::tle::CatalogFormat;

/// Provider of raw catalog text.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch_catalog(&self) -> impl Future<Output = Result<String, DebrisError>> + Send;

    /// Layout of the returned text.
    fn format(&self) -> CatalogFormat {
        CatalogFormat::Tle
    }
}

/// Client for the Space-Track.org catalog.
#[derive(Debug, Clone)]
pub struct SpaceTrackClient {
    http_client: Client,
    base_url: String,
    identity: String,
    password: String,
    format: CatalogFormat,
    query: String,
    json_body: Regex,
    json_message: Regex,
}

impl SpaceTrackClient {
    /// Build a client from the `[space_track]` configuration section.
    ///
    /// Return
    /// ------
    /// * The client, or a [`ConfigError`] if the credentials are missing or the HTTP
    ///   client cannot be created.
    pub fn new(config: &SpaceTrackConfig) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        SpaceTrackClient::with_http_client(config, http_client)
    }

    /// Same as [`SpaceTrackClient::new`] with a caller-provided HTTP client.
    pub fn with_http_client(
        config: &SpaceTrackConfig,
        http_client: Client,
    ) -> Result<Self, ConfigError> {
        let (identity, password) = match (&config.identity, &config.password) {
            (Some(identity), Some(password)) if !identity.is_empty() && !password.is_empty() => {
                (identity.clone(), password.clone())
            }
            _ => return Err(ConfigError::MissingCredentials),
        };

        let regex_error = |err: regex::Error| ConfigError::InvalidValue {
            field: "space_track",
            reason: err.to_string(),
        };

        Ok(SpaceTrackClient {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity,
            password,
            format: config.format,
            query: debris_query(config.lookback_days, config.limit, config.format),
            // element-set text never starts with a JSON delimiter
            json_body: Regex::new(r"^\s*[\[{]").map_err(regex_error)?,
            json_message: Regex::new(r#""(?i:error|login)"\s*:\s*"([^"]*)""#)
                .map_err(regex_error)?,
        })
    }

    /// The query path sent along with the credentials.
    pub fn query(&self) -> &str {
        &self.query
    }

    fn login_url(&self) -> String {
        format!("{}/ajaxauth/login", self.base_url)
    }

    /// Map a response body to the catalog text, or to the error it reports.
    fn check_body(&self, body: String) -> Result<String, DebrisError> {
        if !self.json_body.is_match(&body) {
            return Ok(body);
        }
        let message = self
            .json_message
            .captures(&body)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "unexpected JSON response".to_string());
        Err(DebrisError::UpstreamUnavailable(format!(
            "Space-Track: {message}"
        )))
    }
}

/// Query path of the `gp` class for recent debris, most recent epoch first.
pub fn debris_query(lookback_days: u32, limit: u32, format: CatalogFormat) -> String {
    format!(
        "/basicspacedata/query/class/gp/EPOCH/>now-{lookback_days}/OBJECT_TYPE/DEBRIS/orderby/EPOCH desc/limit/{limit}/format/{}",
        format.query_value()
    )
}

impl CatalogSource for SpaceTrackClient {
    async fn fetch_catalog(&self) -> Result<String, DebrisError> {
        let query_url = format!("{}{}", self.base_url, self.query);
        tracing::debug!(query = %self.query, "requesting Space-Track catalog");

        let response = self
            .http_client
            .post(self.login_url())
            .form(&[
                ("identity", self.identity.as_str()),
                ("password", self.password.as_str()),
                ("query", query_url.as_str()),
            ])
            .send()
            .await
            .map_err(|err| DebrisError::UpstreamUnavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DebrisError::UpstreamUnavailable(format!(
                "Space-Track answered HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| DebrisError::UpstreamUnavailable(err.to_string()))?;
        self.check_body(body)
    }

    fn format(&self) -> CatalogFormat {
        self.format
    }
}

/// Catalog text held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    text: String,
    format: CatalogFormat,
}

impl StaticCatalog {
    pub fn new(text: impl Into<String>, format: CatalogFormat) -> Self {
        StaticCatalog {
            text: text.into(),
            format,
        }
    }
}

impl CatalogSource for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<String, DebrisError> {
        Ok(self.text.clone())
    }

    fn format(&self) -> CatalogFormat {
        self.format
    }
}

/// Catalog text read from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
    format: CatalogFormat,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>, format: CatalogFormat) -> Self {
        FileCatalog {
            path: path.into(),
            format,
        }
    }
}

impl CatalogSource for FileCatalog {
    async fn fetch_catalog(&self) -> Result<String, DebrisError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            DebrisError::UpstreamUnavailable(format!("{}: {err}", self.path.display()))
        })
    }

    fn format(&self) -> CatalogFormat {
        self.format
    }
}
