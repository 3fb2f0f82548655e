//! Vibe-pipeline behavior: the full history, speculation included, reaches
//! stage 2.

use drift_harness::contracts::UrgencyLevel;
use drift_harness::pipelines::vibe;
use drift_harness::scenario;
use drift_harness::service::Role;
use drift_harness::service::stub::{RequestKind, StubService};
use drift_harness::{HarnessError, Stage};
use serde_json::json;

fn urgent_decision() -> serde_json::Value {
    json!({
        "urgency_level": "urgent",
        "reasoning": "Analysis raised possibly serious causes.",
        "recommended_action": "Arrange assessment within 24 hours."
    })
}

#[tokio::test]
async fn stage2_history_contains_stage1_text_verbatim() {
    let analysis =
        "Could be a migraine, or worse - possibly something intracranial we should not dismiss.";
    let stub = StubService::new()
        .with_free(analysis)
        .with_structured(urgent_decision());
    let case = scenario::ambiguous_headache();

    let run = vibe::run(&stub, &case).await.unwrap();
    assert_eq!(run.analysis, analysis);
    assert_eq!(run.urgency_level, UrgencyLevel::Urgent);

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].kind, RequestKind::Free);

    // Stage 2 gets the whole session: stage-1 prompt, stage-1 free text
    // (verbatim, as a model turn), and the classification instruction.
    let stage2 = &requests[1];
    assert_eq!(stage2.kind, RequestKind::Structured);
    let turns = stage2.history.turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, Role::User);
    assert!(turns[0].text.contains("maybe a migraine or worse"));
    assert_eq!(turns[1].role, Role::Model);
    assert_eq!(turns[1].text, analysis);
    assert_eq!(turns[2].role, Role::User);
    assert!(turns[2].text.contains("classify the urgency level"));
}

#[tokio::test]
async fn stage1_service_failure_is_stage_tagged() {
    let stub = StubService::new();
    let err = vibe::run(&stub, &scenario::ambiguous_headache())
        .await
        .unwrap_err();
    match err {
        HarnessError::Service { stage, .. } => assert_eq!(stage, Stage::SymptomAnalysis),
        other => panic!("expected service failure, got {other}"),
    }
}

#[tokio::test]
async fn nonconforming_decision_fails_stage2_validation() {
    let stub = StubService::new().with_free("analysis text").with_structured(json!({
        "urgency_level": "critical",
        "reasoning": "r",
        "recommended_action": "a"
    }));
    let err = vibe::run(&stub, &scenario::ambiguous_headache())
        .await
        .unwrap_err();
    match err {
        HarnessError::Validation { stage, failure } => {
            assert_eq!(stage, Stage::TriageClassification);
            assert_eq!(failure.field, "urgency_level");
        }
        other => panic!("expected validation failure, got {other}"),
    }
}
