use std::collections::HashMap;

use chrono::Utc;

use super::governor::{decide_promotion, promote_if_better, PromotionDecision};
use super::local::FileRegistry;
use super::{ModelRegistry, ModelVersion, VersionMeta, PROD_ALIAS, SMAPE_METRIC};
use crate::forecaster::ModelArtifact;

fn version(v: u64, smape: Option<f64>) -> ModelVersion {
    let mut metrics = HashMap::new();
    if let Some(s) = smape {
        metrics.insert(SMAPE_METRIC.to_string(), s);
    }
    ModelVersion {
        name: "sales".to_string(),
        version: v,
        source: format!("/tmp/sales/{}/model.json", v),
        run_id: format!("run-{}", v),
        experiment: None,
        created_at: Utc::now(),
        checksum: String::new(),
        metrics,
        aliases: vec![PROD_ALIAS.to_string()],
    }
}

#[test]
fn test_bootstrap_always_promotes() {
    let decision = decide_promotion(99.0, &[]);
    assert_eq!(decision, PromotionDecision::PromoteBootstrap);
    assert!(decision.is_promotion());
}

#[test]
fn test_strictly_better_promotes() {
    let decision = decide_promotion(3.5, &[version(1, Some(4.0))]);
    assert_eq!(
        decision,
        PromotionDecision::PromoteBetter {
            candidate: 3.5,
            incumbent: 4.0
        }
    );
}

#[test]
fn test_worse_candidate_skips() {
    let decision = decide_promotion(5.0, &[version(1, Some(4.0))]);
    assert!(!decision.is_promotion());
}

#[test]
fn test_equal_metrics_skip() {
    // Strict inequality required: ties keep the incumbent
    let decision = decide_promotion(4.0, &[version(1, Some(4.0))]);
    assert_eq!(
        decision,
        PromotionDecision::SkipNotBetter {
            candidate: 4.0,
            incumbent: 4.0
        }
    );
}

#[test]
fn test_missing_baseline_never_promotes() {
    let decision = decide_promotion(0.1, &[version(3, None)]);
    assert_eq!(
        decision,
        PromotionDecision::SkipMissingBaseline {
            incumbent_version: 3
        }
    );
}

#[test]
fn test_highest_version_is_the_baseline() {
    // Two versions carry prod after an out-of-band change; version 5 wins
    let holders = vec![version(2, Some(1.0)), version(5, Some(6.0))];
    let decision = decide_promotion(4.0, &holders);
    assert_eq!(
        decision,
        PromotionDecision::PromoteBetter {
            candidate: 4.0,
            incumbent: 6.0
        }
    );
}

// ============================================================================
// Alias-moving path against a real registry backend
// ============================================================================

fn artifact() -> ModelArtifact {
    ModelArtifact {
        flavor: "smoothing".to_string(),
        payload: serde_json::json!({"kind": "simple", "alpha": 0.5, "level": 1.0}),
    }
}

async fn register(registry: &FileRegistry, smape: f64) -> ModelVersion {
    let meta = VersionMeta {
        run_id: uuid::Uuid::new_v4().to_string(),
        experiment: None,
        metrics: HashMap::from([(SMAPE_METRIC.to_string(), smape)]),
    };
    registry
        .create_version("sales", &artifact(), meta)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_bootstrap_moves_alias() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileRegistry::new(dir.path()).unwrap();

    let v1 = register(&registry, 4.0).await;
    let decision = promote_if_better(&registry, &v1, 4.0).await.unwrap();
    assert_eq!(decision, PromotionDecision::PromoteBootstrap);
    assert_eq!(
        registry.resolve_alias("sales", PROD_ALIAS).await.unwrap(),
        Some(1)
    );
}

#[tokio::test]
async fn test_worse_challenger_keeps_incumbent() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileRegistry::new(dir.path()).unwrap();

    let v1 = register(&registry, 4.0).await;
    promote_if_better(&registry, &v1, 4.0).await.unwrap();

    let v2 = register(&registry, 5.0).await;
    let decision = promote_if_better(&registry, &v2, 5.0).await.unwrap();
    assert!(!decision.is_promotion());
    assert_eq!(
        registry.resolve_alias("sales", PROD_ALIAS).await.unwrap(),
        Some(1)
    );
}

#[tokio::test]
async fn test_better_challenger_takes_over() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileRegistry::new(dir.path()).unwrap();

    let v1 = register(&registry, 4.0).await;
    promote_if_better(&registry, &v1, 4.0).await.unwrap();

    let v2 = register(&registry, 2.5).await;
    let decision = promote_if_better(&registry, &v2, 2.5).await.unwrap();
    assert!(decision.is_promotion());
    assert_eq!(
        registry.resolve_alias("sales", PROD_ALIAS).await.unwrap(),
        Some(2)
    );
}
