use thiserror::Error;

/// Failures while downloading or decoding the action catalog.
///
/// These never escape [`crate::catalog::fetch_catalog`]; the loader logs them and
/// hands back an empty catalog, which the caller treats as fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog endpoint {url} returned HTTP {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("catalog body does not start with `{expected}`")]
    MissingWrapper { expected: &'static str },

    #[error("catalog payload is not a valid policy editor document")]
    Malformed(#[source] serde_json::Error),

    #[error("service `{service}` has an invalid prefix `{prefix}`")]
    InvalidPrefix { service: String, prefix: String },
}

/// Errors that terminate a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Unable to get AWS permissions")]
    EmptyCatalog,

    #[error("Unable to get principal ARN, please specify it with --arn")]
    MissingArn,

    #[error("failed to resolve caller identity")]
    Identity(#[source] anyhow::Error),

    #[error("batch size must be between 1 and {max}, got {got}")]
    BatchSize { got: usize, max: usize },

    #[error("policy simulation failed on batch {batch} of {total}")]
    Simulation {
        batch: usize,
        total: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl ProbeError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::EmptyCatalog => 2,
            ProbeError::MissingArn | ProbeError::Identity(_) => 3,
            ProbeError::Simulation { .. } => 4,
            ProbeError::BatchSize { .. } => 64,
        }
    }
}
