use url::Url;

use crate::{
    catalog::DEFAULT_CATALOG_URL,
    cli::CommandLineArgs,
    error::ProbeError,
    prober::{Prober, DEFAULT_BATCH_SIZE},
};

/// Everything a probe run needs, built once from the command line and passed
/// explicitly to each collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    pub profile_name: String,
    /// Principal supplied with `--arn`; `None` means "use the caller identity".
    pub explicit_arn: Option<String>,
    pub batch_size: usize,
    pub region: Option<String>,
    pub catalog_url: Url,
}

impl ProbeConfig {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            explicit_arn: None,
            batch_size: DEFAULT_BATCH_SIZE,
            region: None,
            catalog_url: default_catalog_url(),
        }
    }

    pub fn from_args(args: &CommandLineArgs) -> Self {
        let probe = &args.probe_args;
        Self {
            profile_name: probe.profile.clone(),
            explicit_arn: probe
                .arn
                .as_deref()
                .map(str::trim)
                .filter(|arn| !arn.is_empty())
                .map(str::to_string),
            batch_size: probe.batch_size,
            region: probe.region.clone(),
            catalog_url: probe.catalog_url.clone(),
        }
    }

    pub fn with_arn(mut self, arn: impl Into<String>) -> Self {
        self.explicit_arn = Some(arn.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_catalog_url(mut self, url: Url) -> Self {
        self.catalog_url = url;
        self
    }

    pub fn prober(&self) -> Result<Prober, ProbeError> {
        Prober::new(self.batch_size)
    }

    /// Bind the principal that will actually be simulated.
    pub fn resolve(self, resolved_arn: impl Into<String>) -> ResolvedProbe {
        ResolvedProbe { config: self, resolved_arn: resolved_arn.into() }
    }
}

/// A [`ProbeConfig`] whose principal has been resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProbe {
    pub config: ProbeConfig,
    pub resolved_arn: String,
}

fn default_catalog_url() -> Url {
    Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL should parse")
}
