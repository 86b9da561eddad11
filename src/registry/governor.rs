//! Promotion governor: champion/challenger comparison for the `prod` alias.
//!
//! The decision itself is a pure function of the candidate's metric and the
//! current `prod` holders; the single mutating step (the alias move) happens
//! afterwards, at most once per invocation. Registration of the candidate is
//! always done by the caller beforehand, so the audit history is complete
//! whether or not promotion occurs.

use tracing::{info, warn};

use super::error::RegistryResult;
use super::{ModelRegistry, ModelVersion, PROD_ALIAS, SMAPE_METRIC};

/// Outcome of the promotion comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionDecision {
    /// No version currently holds `prod`; the first model for a name is
    /// always promoted.
    PromoteBootstrap,
    /// Candidate SMAPE is strictly lower than the incumbent's.
    PromoteBetter { candidate: f64, incumbent: f64 },
    /// Candidate is equal or worse; strict inequality is required, so equal
    /// metrics keep the incumbent.
    SkipNotBetter { candidate: f64, incumbent: f64 },
    /// The incumbent has no recorded SMAPE; the comparison is indeterminate
    /// and the existing production pointer is kept.
    SkipMissingBaseline { incumbent_version: u64 },
}

impl PromotionDecision {
    pub fn is_promotion(&self) -> bool {
        matches!(
            self,
            PromotionDecision::PromoteBootstrap | PromotionDecision::PromoteBetter { .. }
        )
    }
}

/// Decide whether the candidate should take over the `prod` alias.
///
/// `prod_holders` are the versions currently carrying the alias. Normally at
/// most one version holds it, but after an out-of-band registry change there
/// may be several; the one with the highest version number is the
/// authoritative baseline.
pub fn decide_promotion(candidate_smape: f64, prod_holders: &[ModelVersion]) -> PromotionDecision {
    let Some(incumbent) = prod_holders.iter().max_by_key(|v| v.version) else {
        return PromotionDecision::PromoteBootstrap;
    };

    match incumbent.metric(SMAPE_METRIC) {
        None => PromotionDecision::SkipMissingBaseline {
            incumbent_version: incumbent.version,
        },
        Some(incumbent_smape) if candidate_smape < incumbent_smape => {
            PromotionDecision::PromoteBetter {
                candidate: candidate_smape,
                incumbent: incumbent_smape,
            }
        }
        Some(incumbent_smape) => PromotionDecision::SkipNotBetter {
            candidate: candidate_smape,
            incumbent: incumbent_smape,
        },
    }
}

/// Run the promotion comparison against the registry and move the `prod`
/// alias when the candidate wins.
///
/// Registry errors propagate to the caller, which treats them as recoverable
/// warnings: a failed promotion never fails an otherwise successful
/// training run.
pub async fn promote_if_better(
    registry: &dyn ModelRegistry,
    candidate: &ModelVersion,
    candidate_smape: f64,
) -> RegistryResult<PromotionDecision> {
    let versions = registry.list_versions(&candidate.name).await?;
    let prod_holders: Vec<ModelVersion> = versions
        .into_iter()
        .filter(|v| v.has_alias(PROD_ALIAS))
        .collect();

    let decision = decide_promotion(candidate_smape, &prod_holders);
    match &decision {
        PromotionDecision::PromoteBootstrap => {
            registry
                .set_alias(&candidate.name, PROD_ALIAS, candidate.version)
                .await?;
            info!(
                model = %candidate.name,
                version = candidate.version,
                "promoted to prod (first version for this model)"
            );
        }
        PromotionDecision::PromoteBetter {
            candidate: new,
            incumbent,
        } => {
            registry
                .set_alias(&candidate.name, PROD_ALIAS, candidate.version)
                .await?;
            info!(
                model = %candidate.name,
                version = candidate.version,
                candidate_smape = new,
                incumbent_smape = incumbent,
                "promoted to prod"
            );
        }
        PromotionDecision::SkipNotBetter {
            candidate: new,
            incumbent,
        } => {
            info!(
                model = %candidate.name,
                version = candidate.version,
                candidate_smape = new,
                incumbent_smape = incumbent,
                "skipped promotion: candidate SMAPE is not strictly better"
            );
        }
        PromotionDecision::SkipMissingBaseline { incumbent_version } => {
            warn!(
                model = %candidate.name,
                incumbent_version,
                "skipped promotion: incumbent prod version has no recorded SMAPE"
            );
        }
    }

    Ok(decision)
}
