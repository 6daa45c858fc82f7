// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `serve`   — load the artifact pair and run the HTTP API
//   2. `train`   — train on the cleaned corpus, store the pair
//   3. `prepare` — ingest and clean a raw review corpus
//   4. `predict` — call a running API for one review
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc, time::Duration};

use crate::domain::{prediction::PredictionResult, traits::BlobStore};
use crate::infra::blob_store::{LocalBlobStore, TimeoutBlobStore};
use commands::{Commands, PredictArgs, PrepareArgs, ServeArgs, StoreArgs, TrainCommandArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version,
    about = "Clean review corpora, train a BiLSTM sentiment model, and serve it over HTTP."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)   => run_serve(args),
            Commands::Train(args)   => run_train(args),
            Commands::Prepare(args) => run_prepare(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

/// Local bucket with every call bounded by the configured timeout.
fn open_store(args: &StoreArgs) -> Arc<dyn BlobStore> {
    let local = Arc::new(LocalBlobStore::new(&args.bucket));
    tracing::info!("Using bucket '{}'", local.root().display());
    Arc::new(TimeoutBlobStore::new(local, Duration::from_secs(args.blob_timeout_secs)))
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::api::{self, AppState};
    use crate::application::{
        background_trainer::BackgroundTrainer,
        inference_service::{InferenceService, ServiceState},
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    let store   = open_store(&args.store);
    let service = Arc::new(InferenceService::new(Arc::clone(&store)));
    let trainer = Arc::new(BackgroundTrainer::new(store, args.train.into(), Arc::clone(&service)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start tokio runtime")?;

    runtime.block_on(async move {
        // Artifact loading is blocking I/O: keep it off the runtime threads
        let loader = Arc::clone(&service);
        let state  = tokio::task::spawn_blocking(move || loader.initialize())
            .await
            .context("Startup load task aborted")?;
        if state != ServiceState::Ready {
            tracing::warn!("Serving without a model: /health and /predict will answer 503");
        }

        api::serve(addr, AppState::new(service, trainer)).await
    })
}

fn run_train(args: TrainCommandArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let store   = open_store(&args.store);
    let summary = TrainUseCase::new(store, args.train.into()).execute()?;

    println!("Training complete. Artifact pair '{}' stored.", summary.pair_id);
    println!(
        "Test accuracy {:.2}%  precision {:.2}%  recall {:.2}%",
        summary.report.global_score.accuracy * 100.0,
        summary.report.global_score.precision * 100.0,
        summary.report.global_score.recall * 100.0,
    );
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let store = open_store(&args.store);
    let count = PrepareUseCase::new(store, &args.input).execute()?;
    println!("Prepared {} reviews.", count);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let result = request_prediction(&args)?;
    println!("Sentiment: {}", result.label);
    println!("Confidence Score: {:.2}%", result.confidence * 100.0);
    Ok(())
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// POST title + content to `{api_url}/predict`.
fn request_prediction(args: &PredictArgs) -> Result<PredictionResult> {
    if args.title.trim().is_empty() || args.content.trim().is_empty() {
        return Err(anyhow!("Both a title and a content are required"));
    }

    let url  = format!("{}/predict", args.api_url.trim_end_matches('/'));
    let body = serde_json::json!({ "content": format!("{} {}", args.title, args.content) });

    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(Some(Duration::from_secs(args.timeout_secs)))
            .http_status_as_error(false)
            .build(),
    );

    let mut response = agent
        .post(&url)
        .send_json(&body)
        .with_context(|| format!("Cannot reach {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .body_mut()
            .read_json::<ErrorBody>()
            .map(|b| b.detail)
            .unwrap_or_else(|_| "no detail".to_string());
        return Err(anyhow!("API returned {}: {}", status, detail));
    }

    response
        .body_mut()
        .read_json::<PredictionResult>()
        .context("Unexpected /predict response")
}
