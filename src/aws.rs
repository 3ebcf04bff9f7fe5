use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::{
    environment::EnvironmentVariableRegionProvider, meta::region::RegionProviderChain,
    profile::ProfileFileRegionProvider, BehaviorVersion, Region, SdkConfig,
};
use aws_sdk_iam::{error::DisplayErrorContext, Client as IamClient};
use aws_sdk_sts::Client as StsClient;
use tracing::{debug, info, trace};

use crate::{
    action::ActionIdentifier,
    simulator::{Decision, EvaluationResult, IdentityResolver, PolicySimulator},
};

const FALLBACK_REGION: &str = "us-east-1";
const SSO_ROLE_PREFIX: &str = "AWSReservedSSO_";
const SSO_ROLE_PATH: &str = "aws-reserved/sso.amazonaws.com/";

/// Build an SDK config bound to `profile`.
///
/// Region resolution: explicit `region`, then `AWS_REGION`/`AWS_DEFAULT_REGION`,
/// then the profile's `region` key, then `us-east-1`. IAM is global, so the
/// region only matters for request signing.
pub async fn load_config(profile: &str, region: Option<&str>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(|r| Region::new(r.to_string())))
        .or_else(EnvironmentVariableRegionProvider::new())
        .or_else(ProfileFileRegionProvider::builder().profile_name(profile).build())
        .or_else(FALLBACK_REGION);

    aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .region(region_provider)
        .load()
        .await
}

/// `iam:SimulatePrincipalPolicy` backed simulator.
#[derive(Clone, Debug)]
pub struct IamPolicySimulator {
    client: IamClient,
}

impl IamPolicySimulator {
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: IamClient::new(config) }
    }
}

#[async_trait]
impl PolicySimulator for IamPolicySimulator {
    async fn simulate(
        &self,
        principal_arn: &str,
        actions: &[ActionIdentifier],
    ) -> Result<Vec<EvaluationResult>> {
        let names: Vec<String> = actions.iter().map(ToString::to_string).collect();
        let mut results = Vec::with_capacity(names.len());
        let mut marker: Option<String> = None;

        // A single batch can still come back paginated; follow the marker so
        // the batch is answered in full.
        loop {
            let output = self
                .client
                .simulate_principal_policy()
                .policy_source_arn(principal_arn)
                .set_action_names(Some(names.clone()))
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| {
                    anyhow!(
                        "iam:SimulatePrincipalPolicy failed for {principal_arn}: {}",
                        DisplayErrorContext(&err)
                    )
                })?;

            for result in output.evaluation_results() {
                let action: ActionIdentifier = result
                    .eval_action_name()
                    .parse()
                    .context("Simulator returned an unrecognised action name")?;
                let decision = Decision::from(result.eval_decision().as_str());
                trace!("{action}: {decision:?}");
                results.push(EvaluationResult::new(action, decision));
            }

            match output.marker() {
                Some(next) if output.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(results)
    }
}

/// `sts:GetCallerIdentity` backed resolver. Role paths are looked up with
/// `iam:GetRole`.
#[derive(Clone, Debug)]
pub struct StsIdentityResolver {
    client: StsClient,
    iam: IamClient,
}

impl StsIdentityResolver {
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: StsClient::new(config), iam: IamClient::new(config) }
    }
}

#[async_trait]
impl IdentityResolver for StsIdentityResolver {
    async fn caller_arn(&self) -> Result<Option<String>> {
        let caller = self
            .client
            .get_caller_identity()
            .send()
            .await
            .context("Failed to call sts:GetCallerIdentity")?;

        let arn = caller.arn().map(str::to_string);
        debug!("Caller identity: {}", arn.as_deref().unwrap_or("<none>"));
        Ok(arn)
    }

    async fn role_arn(&self, role_name: &str) -> Result<Option<String>> {
        let output =
            self.iam.get_role().role_name(role_name).send().await.map_err(|err| {
                anyhow!("iam:GetRole failed for {role_name}: {}", DisplayErrorContext(&err))
            })?;
        Ok(output.role().map(|role| role.arn().to_string()))
    }
}

/// Rough classification of a principal ARN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Role,
    AssumedRole,
    Group,
    Root,
    Unknown,
}

pub fn classify_principal(arn: &str) -> PrincipalKind {
    if arn.contains(":assumed-role/") {
        PrincipalKind::AssumedRole
    } else if arn.contains(":role/") {
        PrincipalKind::Role
    } else if arn.contains(":user/") {
        PrincipalKind::User
    } else if arn.contains(":group/") {
        PrincipalKind::Group
    } else if arn.ends_with(":root") {
        PrincipalKind::Root
    } else {
        PrincipalKind::Unknown
    }
}

/// Turn a caller-identity ARN into one the simulator accepts.
///
/// `SimulatePrincipalPolicy` rejects STS session ARNs, so
/// `arn:aws:sts::123456789012:assumed-role/Name/session` is rewritten to the
/// underlying `arn:aws:iam::123456789012:role/Name`. IAM Identity Center roles
/// live under the `aws-reserved/sso.amazonaws.com/` path. Paths of other roles
/// are not recoverable from a session ARN; this is the fallback when
/// `iam:GetRole` cannot be called.
pub fn simulation_principal(arn: &str) -> String {
    let Some(role_name) = assumed_role_name(arn) else {
        return arn.to_string();
    };
    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    let [_, partition, _, _, account, _] = parts.as_slice() else {
        return arn.to_string();
    };

    let path = if role_name.starts_with(SSO_ROLE_PREFIX) { SSO_ROLE_PATH } else { "" };
    let role_arn = format!("arn:{partition}:iam::{account}:role/{path}{role_name}");
    info!("Using role {role_arn} for assumed-role session {arn}");
    role_arn
}

/// Role name of an STS assumed-role session ARN.
pub fn assumed_role_name(arn: &str) -> Option<&str> {
    if classify_principal(arn) != PrincipalKind::AssumedRole {
        return None;
    }
    arn.splitn(6, ':')
        .nth(5)?
        .strip_prefix("assumed-role/")?
        .split('/')
        .next()
        .filter(|name| !name.is_empty())
}
