use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use drift_harness::config::Config;
use drift_harness::service::{GeminiService, InferenceService, stub};
use drift_harness::{harness, scenario};

#[derive(Parser, Debug)]
#[command(
    name = "drift-harness",
    about = "Compare a structured and an unstructured triage pipeline on one scenario"
)]
struct Cli {
    /// Built-in scenario id to run
    #[arg(long, default_value = "ambiguous_headache")]
    scenario: String,

    /// Model identifier override
    #[arg(long)]
    model: Option<String>,

    /// Run against the scripted offline service instead of the live API
    #[arg(long)]
    offline: bool,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    drift_harness::load_env();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.runtime.log_level.clone())),
        )
        .init();

    if let Some(model) = cli.model {
        config.system.model = model;
    }

    let scenario = scenario::find(&cli.scenario).ok_or_else(|| {
        let known: Vec<_> = scenario::SCENARIOS
            .iter()
            .map(|s| s.case_id.as_str())
            .collect();
        anyhow::anyhow!(
            "unknown scenario '{}'; available: {}",
            cli.scenario,
            known.join(", ")
        )
    })?;

    let service: Box<dyn InferenceService> = if cli.offline {
        tracing::info!("using scripted offline service");
        Box::new(stub::demo_script(&scenario))
    } else {
        Box::new(GeminiService::from_config(&config)?)
    };

    let report = harness::compare(service.as_ref(), &scenario).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}
