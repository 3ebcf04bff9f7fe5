//! Loader for the AWS Policy Generator action catalog.
//!
//! The catalog is published as a JavaScript assignment,
//! `app.PolicyEditorConfig={...}`, rather than plain JSON. The wrapper is
//! removed by [`strip_wrapper`] before the payload is decoded against an
//! explicit schema.

use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::{action::ActionIdentifier, error::CatalogError};

pub const DEFAULT_CATALOG_URL: &str = "https://awspolicygen.s3.amazonaws.com/js/policies.js";

/// Literal text that precedes the JSON payload in `policies.js`.
pub const WRAPPER_PREFIX: &str = "app.PolicyEditorConfig=";

pub static USER_AGENT: Lazy<String> =
    Lazy::new(|| format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));

/// Every known action, grouped by service prefix, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: IndexMap<String, Vec<String>>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add actions under `service`. Repeated prefixes are merged into the
    /// first occurrence and duplicate action names are dropped.
    pub fn insert<S, I, A>(&mut self, service: S, actions: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let entry = self.services.entry(service.into()).or_default();
        for action in actions {
            let action = action.into();
            if !entry.contains(&action) {
                entry.push(action);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.action_count() == 0
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn action_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn actions(&self, service: &str) -> Option<&[String]> {
        self.services.get(service).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.services.iter().map(|(service, actions)| (service.as_str(), actions.as_slice()))
    }

    /// Flatten into `service:action` identifiers: services in catalog order,
    /// actions in per-service order.
    pub fn identifiers(&self) -> impl Iterator<Item = ActionIdentifier> + '_ {
        self.iter().flat_map(|(service, actions)| {
            actions.iter().map(move |action| ActionIdentifier::new(service, action))
        })
    }
}

impl<S, I, A> FromIterator<(S, I)> for ServiceCatalog
where
    S: Into<String>,
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (service, actions) in iter {
            catalog.insert(service, actions);
        }
        catalog
    }
}

#[derive(Debug, Deserialize)]
struct PolicyEditorConfig {
    #[serde(rename = "serviceMap")]
    service_map: IndexMap<String, ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    #[serde(rename = "StringPrefix")]
    string_prefix: String,
    #[serde(rename = "Actions")]
    actions: Vec<String>,
}

/// Remove the `app.PolicyEditorConfig=` assignment around the JSON payload.
///
/// Leading whitespace and a trailing `;` are tolerated. Anything else in
/// front of the payload is an error: the document format has changed.
pub fn strip_wrapper(body: &str) -> Result<&str, CatalogError> {
    let payload = body
        .trim_start()
        .strip_prefix(WRAPPER_PREFIX)
        .ok_or(CatalogError::MissingWrapper { expected: WRAPPER_PREFIX })?
        .trim_end();
    Ok(payload.strip_suffix(';').unwrap_or(payload).trim())
}

/// Decode a full `policies.js` body into a [`ServiceCatalog`].
pub fn parse_catalog(body: &str) -> Result<ServiceCatalog, CatalogError> {
    let payload = strip_wrapper(body)?;
    let config: PolicyEditorConfig =
        serde_json::from_str(payload).map_err(CatalogError::Malformed)?;

    let mut catalog = ServiceCatalog::new();
    for (service, entry) in config.service_map {
        let prefix = entry.string_prefix.trim();
        if prefix.is_empty() || prefix.contains(ActionIdentifier::SEPARATOR) {
            return Err(CatalogError::InvalidPrefix {
                service,
                prefix: entry.string_prefix.clone(),
            });
        }

        let actions = entry.actions.into_iter().filter(|action| {
            let usable = !action.is_empty() && !action.contains(ActionIdentifier::SEPARATOR);
            if !usable {
                warn!("Skipping malformed action `{action}` in service `{service}`");
            }
            usable
        });
        catalog.insert(prefix, actions);
    }

    Ok(catalog)
}

/// Build the HTTP client used for the catalog download.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT.as_str())
        .connect_timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")
}

/// Download and decode the catalog, reporting the specific failure.
pub async fn try_fetch_catalog(
    client: &reqwest::Client,
    url: &Url,
) -> Result<ServiceCatalog, CatalogError> {
    debug!("Fetching action catalog from {url}");
    let request_err = |source| CatalogError::Request { url: url.to_string(), source };

    let response = client.get(url.clone()).send().await.map_err(request_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status { url: url.to_string(), status });
    }

    let body = response.text().await.map_err(request_err)?;
    let catalog = parse_catalog(&body)?;
    debug!(
        "Loaded {} actions across {} services",
        catalog.action_count(),
        catalog.service_count()
    );
    Ok(catalog)
}

/// Download and decode the catalog. Any failure is logged and yields an
/// empty catalog; callers must check [`ServiceCatalog::is_empty`].
pub async fn fetch_catalog(client: &reqwest::Client, url: &Url) -> ServiceCatalog {
    match try_fetch_catalog(client, url).await {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Unable to fetch AWS policies: {:#}", anyhow::Error::from(err));
            ServiceCatalog::new()
        }
    }
}
