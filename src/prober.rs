//! Batch submission of the candidate action list to the policy simulator.
//!
//! Batches are submitted one at a time and any failing call aborts the probe.
//! Allowed actions gathered from earlier batches are dropped along with it.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    action::ActionIdentifier,
    catalog::ServiceCatalog,
    error::ProbeError,
    progress::BatchObserver,
    simulator::PolicySimulator,
    util::Counted,
};

/// Upper bound on actions per `SimulatePrincipalPolicy` call.
pub const MAX_BATCH_SIZE: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = MAX_BATCH_SIZE;

/// Actions the simulator reported as allowed for one principal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllowedPermissionSet {
    principal: String,
    allowed: Vec<ActionIdentifier>,
}

impl AllowedPermissionSet {
    pub fn new(principal: impl Into<String>) -> Self {
        Self { principal: principal.into(), allowed: Vec::new() }
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn push(&mut self, action: ActionIdentifier) {
        self.allowed.push(action);
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Actions in the order they were discovered.
    pub fn actions(&self) -> &[ActionIdentifier] {
        &self.allowed
    }

    pub fn sort(&mut self) {
        self.allowed.sort();
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }
}

/// Flatten `catalog` into the ordered list of identifiers to simulate.
pub fn candidate_actions(catalog: &ServiceCatalog) -> Vec<ActionIdentifier> {
    catalog.identifiers().collect()
}

/// Split `candidates` into contiguous batches of at most `batch_size`.
pub fn batches(
    candidates: &[ActionIdentifier],
    batch_size: usize,
) -> impl Iterator<Item = &[ActionIdentifier]> {
    candidates.chunks(batch_size.max(1))
}

pub fn batch_count(total_actions: usize, batch_size: usize) -> usize {
    total_actions.div_ceil(batch_size.max(1))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prober {
    batch_size: usize,
}

impl Default for Prober {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE }
    }
}

impl Prober {
    pub fn new(batch_size: usize) -> Result<Self, ProbeError> {
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(ProbeError::BatchSize { got: batch_size, max: MAX_BATCH_SIZE });
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Simulate every action in `catalog` for `principal_arn`.
    ///
    /// Issues exactly `ceil(N / batch_size)` simulator calls.
    pub async fn probe<S, O>(
        &self,
        catalog: &ServiceCatalog,
        principal_arn: &str,
        simulator: &S,
        observer: &mut O,
    ) -> Result<AllowedPermissionSet, ProbeError>
    where
        S: PolicySimulator + ?Sized,
        O: BatchObserver + ?Sized,
    {
        if catalog.is_empty() {
            return Err(ProbeError::EmptyCatalog);
        }

        let candidates = candidate_actions(catalog);
        let total = batch_count(candidates.len(), self.batch_size);
        info!(
            "Checking {} for {principal_arn} in {}",
            Counted::regular(candidates.len(), "permission"),
            Counted::new(total, "batch", "batches")
        );
        observer.on_start(total, candidates.len());

        let mut allowed = AllowedPermissionSet::new(principal_arn);
        for (index, batch) in batches(&candidates, self.batch_size).enumerate() {
            let results = simulator.simulate(principal_arn, batch).await.map_err(|source| {
                ProbeError::Simulation { batch: index + 1, total, source }
            })?;

            let before = allowed.len();
            for result in results.into_iter().filter(|r| r.decision.is_allowed()) {
                allowed.push(result.action);
            }
            debug!(
                "Batch {}/{total}: {} of {} actions allowed",
                index + 1,
                allowed.len() - before,
                batch.len()
            );
            observer.on_batch(index + 1, total);
        }

        observer.on_finish();
        Ok(allowed)
    }
}

/// Probe with the default batch size.
pub async fn probe_permissions<S>(
    catalog: &ServiceCatalog,
    principal_arn: &str,
    simulator: &S,
    observer: &mut dyn BatchObserver,
) -> Result<AllowedPermissionSet, ProbeError>
where
    S: PolicySimulator + ?Sized,
{
    Prober::default().probe(catalog, principal_arn, simulator, observer).await
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::HashSet, sync::Mutex};

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use crate::{
        action::ActionIdentifier,
        simulator::{Decision, EvaluationResult, PolicySimulator},
    };

    /// Simulator that allows a fixed set of actions and records every call.
    #[derive(Default)]
    pub struct FakeSimulator {
        allow: HashSet<String>,
        fail_on_call: Option<usize>,
        pub calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeSimulator {
        pub fn allowing<'a>(actions: impl IntoIterator<Item = &'a str>) -> Self {
            Self { allow: actions.into_iter().map(str::to_string).collect(), ..Self::default() }
        }

        /// Fail the `n`th call (1-based).
        pub fn failing_on(mut self, n: usize) -> Self {
            self.fail_on_call = Some(n);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn submitted(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().iter().map(|(_, batch)| batch.clone()).collect()
        }

        pub fn principals(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }
    }

    #[async_trait]
    impl PolicySimulator for FakeSimulator {
        async fn simulate(
            &self,
            principal_arn: &str,
            actions: &[ActionIdentifier],
        ) -> Result<Vec<EvaluationResult>> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((
                    principal_arn.to_string(),
                    actions.iter().map(ToString::to_string).collect(),
                ));
                calls.len()
            };
            if self.fail_on_call == Some(call) {
                bail!("simulated throttling on call {call}");
            }

            Ok(actions
                .iter()
                .map(|action| {
                    let decision = if self.allow.contains(action.as_str()) {
                        Decision::Allowed
                    } else {
                        Decision::ImplicitDeny
                    };
                    EvaluationResult::new(action.clone(), decision)
                })
                .collect())
        }
    }
}
