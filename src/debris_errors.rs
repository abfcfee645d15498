use thiserror::Error;

/// Why a single element set produced no record.
///
/// These never leave the pipeline: the Validity Filter counts and drops them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("Malformed orbital elements: {0}")]
    MalformedElements(String),

    #[error("Propagation diverged: {0}")]
    PropagationDivergence(String),

    #[error("Degenerate geometry (zero or non-finite position vector)")]
    DegenerateGeometry,
}

/// Batch-level failures, surfaced through the freshness cache.
///
/// The type is `Clone` because one refresh outcome is handed to every caller
/// waiting on that refresh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebrisError {
    #[error("Catalog text contains no complete element set")]
    EmptyCatalog,

    #[error("No valid debris positions in the current catalog")]
    NoValidResults,

    #[error("Catalog provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Refresh task ended without producing a result")]
    RefreshAborted,
}

impl DebrisError {
    /// "Nothing to show": the catalog was reachable but yielded no record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DebrisError::NoValidResults | DebrisError::EmptyCatalog)
    }

    /// "Couldn't even ask": the catalog itself could not be obtained.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            DebrisError::UpstreamUnavailable(_) | DebrisError::RefreshAborted
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Space-Track credentials missing (set SPACETRACK_USER and SPACETRACK_PASS)")]
    MissingCredentials,

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Unable to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("UT1 table download failed: {0}")]
    Ut1Download(String),
}
