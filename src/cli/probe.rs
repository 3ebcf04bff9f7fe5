use clap::{builder::TypedValueParser, Args};
use url::Url;

use crate::{
    catalog::DEFAULT_CATALOG_URL,
    prober::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE},
};

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// AWS profile name to use
    #[arg(long, value_name = "NAME")]
    pub profile: String,

    /// User or role ARN to check permissions for (defaults to the caller identity)
    #[arg(long, value_name = "ARN")]
    pub arn: Option<String>,

    /// Number of actions submitted per SimulatePrincipalPolicy call
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=MAX_BATCH_SIZE as i64).map(usize::from),
    )]
    pub batch_size: usize,

    /// AWS region used to sign requests (IAM is global)
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Location of the AWS Policy Generator action catalog
    #[arg(long, value_name = "URL", default_value = DEFAULT_CATALOG_URL, hide_default_value = true)]
    pub catalog_url: Url,
}
