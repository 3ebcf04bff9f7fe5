use anyhow::Result;
use async_trait::async_trait;

use crate::action::ActionIdentifier;

/// Outcome reported by the policy simulator for one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    ExplicitDeny,
    ImplicitDeny,
    Other(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

impl From<&str> for Decision {
    fn from(value: &str) -> Self {
        match value {
            "allowed" => Decision::Allowed,
            "explicitDeny" => Decision::ExplicitDeny,
            "implicitDeny" => Decision::ImplicitDeny,
            other => Decision::Other(other.to_string()),
        }
    }
}

/// The simulator's verdict for a single queried action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationResult {
    pub action: ActionIdentifier,
    pub decision: Decision,
}

impl EvaluationResult {
    pub fn new(action: ActionIdentifier, decision: Decision) -> Self {
        Self { action, decision }
    }
}

/// Evaluates a batch of actions against a principal's attached policies.
///
/// One call corresponds to one batch; implementations must not split or
/// reorder the batch across logical calls.
#[async_trait]
pub trait PolicySimulator: Send + Sync {
    async fn simulate(
        &self,
        principal_arn: &str,
        actions: &[ActionIdentifier],
    ) -> Result<Vec<EvaluationResult>>;
}

/// Resolves the ARN of the currently authenticated principal.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn caller_arn(&self) -> Result<Option<String>>;

    /// Full ARN of the role named `role_name`, including its path. `None`
    /// when the resolver cannot look roles up.
    async fn role_arn(&self, _role_name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}
