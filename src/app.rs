use std::error::Error as _;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    aws::{self, assumed_role_name, simulation_principal, IamPolicySimulator, StsIdentityResolver},
    catalog::{self, fetch_catalog},
    cli::CommandLineArgs,
    config::{ProbeConfig, ResolvedProbe},
    error::ProbeError,
    prober::AllowedPermissionSet,
    progress::{BatchObserver, BatchProgressBar},
    reporter::{
        present,
        styles::{Styles, Term},
    },
    simulator::{IdentityResolver, PolicySimulator},
    util::Counted,
};

/// Settle which principal to probe: the explicit `--arn`, or the caller
/// identity of the configured profile.
///
/// Assumed-role sessions are simulated as their role. The role ARN is looked
/// up so that role paths survive; if the lookup is not possible the ARN is
/// derived from the session ARN.
pub async fn resolve_principal<I>(
    config: ProbeConfig,
    identity: &I,
) -> Result<ResolvedProbe, ProbeError>
where
    I: IdentityResolver + ?Sized,
{
    if let Some(arn) = config.explicit_arn.clone() {
        return Ok(config.resolve(arn));
    }

    let caller = identity
        .caller_arn()
        .await
        .map_err(ProbeError::Identity)?
        .filter(|arn| !arn.trim().is_empty())
        .ok_or(ProbeError::MissingArn)?;

    let principal = match assumed_role_name(&caller) {
        Some(role_name) => match identity.role_arn(role_name).await {
            Ok(Some(role_arn)) => {
                debug!("Using role {role_arn} for assumed-role session {caller}");
                role_arn
            }
            Ok(None) => simulation_principal(&caller),
            Err(err) => {
                debug!("Role lookup for {role_name} failed: {err:#}");
                simulation_principal(&caller)
            }
        },
        None => caller,
    };
    Ok(config.resolve(principal))
}

/// Resolve the principal, load the catalog and simulate every action.
///
/// The catalog is only requested once a principal is known, and the
/// simulator is never called when the catalog comes back empty.
pub async fn execute<I, S>(
    config: ProbeConfig,
    http: &reqwest::Client,
    identity: &I,
    simulator: &S,
    observer: &mut dyn BatchObserver,
) -> Result<AllowedPermissionSet, ProbeError>
where
    I: IdentityResolver + ?Sized,
    S: PolicySimulator + ?Sized,
{
    let prober = config.prober()?;
    let resolved = resolve_principal(config, identity).await?;

    let catalog = fetch_catalog(http, &resolved.config.catalog_url).await;
    if catalog.is_empty() {
        return Err(ProbeError::EmptyCatalog);
    }

    prober.probe(&catalog, &resolved.resolved_arn, simulator, observer).await
}

/// Run the tool for parsed command-line arguments and return the process
/// exit code.
pub async fn run(args: &CommandLineArgs) -> Result<i32> {
    let config = ProbeConfig::from_args(args);
    let sdk_config = aws::load_config(&config.profile_name, config.region.as_deref()).await;
    let identity = StsIdentityResolver::new(&sdk_config);
    let simulator = IamPolicySimulator::new(&sdk_config);
    let http = catalog::http_client()?;
    let mut progress = BatchProgressBar::new(args.global_args.use_progress());

    let stderr_styles =
        Styles::for_term(args.global_args.use_color(std::io::stderr()), &Term::stderr());

    let outcome = execute(config, &http, &identity, &simulator, &mut progress).await;
    drop(progress);

    match outcome {
        Ok(allowed) => {
            let count = allowed.len();
            let output = &args.output_args;
            present(allowed, output, args.global_args.use_color(std::io::stdout()))
                .context("Failed to write report")?;

            if let Some(path) = &output.output {
                let notice = format!(
                    "Wrote {} to {}",
                    Counted::regular(count, "allowed permission"),
                    path.display()
                );
                debug!("{notice}");
                if !args.global_args.quiet {
                    eprintln!("{}", stderr_styles.style_notice.apply_to(notice));
                }
            }
            Ok(0)
        }
        Err(err) => {
            let message = error_chain(&err);
            debug!("Probe failed: {message}");
            eprintln!("{} {message}", stderr_styles.style_error.apply_to("Error:"));
            Ok(err.exit_code())
        }
    }
}

fn error_chain(err: &ProbeError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
