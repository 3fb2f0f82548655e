//! Live-API smoke test. Compiled only with `--features live_gemini` and
//! skipped unless RUN_GEMINI_TESTS=1, so the default suite stays offline.
#![cfg(feature = "live_gemini")]

use anyhow::Result;
use drift_harness::config::Config;
use drift_harness::contracts;
use drift_harness::service::{Conversation, GeminiService, InferenceService};

#[tokio::test]
async fn gemini_free_and_structured_completions() -> Result<()> {
    dotenvy::dotenv().ok();

    if std::env::var("RUN_GEMINI_TESTS").is_err() {
        eprintln!("Skipping Gemini integration test - set RUN_GEMINI_TESTS=1 to run");
        return Ok(());
    }

    let config = Config::load()?;
    let service = GeminiService::from_config(&config)?;

    let reply = service
        .complete_free(&Conversation::from_prompt(
            "Give me a one-word answer. The word should be 'test'.",
        ))
        .await?;
    assert!(reply.to_lowercase().contains("test"));

    let candidate = service
        .complete_structured(
            &Conversation::from_prompt(
                "Classify a stable patient with a mild headache and normal vital signs.",
            ),
            contracts::triage_decision_schema(),
        )
        .await?;
    assert!(contracts::validate_decision(&candidate).is_ok());

    Ok(())
}
