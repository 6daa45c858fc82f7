// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their configurable
// flags. Every deployment setting can also come from the
// environment (BUCKET_NAME, API_URL, HOST, PORT, ...), which is
// how the container images configure them.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve predictions over HTTP
    Serve(ServeArgs),

    /// Train a model on the cleaned corpus and store the artifacts
    Train(TrainCommandArgs),

    /// Ingest a raw corpus file and write the cleaned corpus
    Prepare(PrepareArgs),

    /// Ask a running API for the sentiment of one review
    Predict(PredictArgs),
}

/// Where artifacts live. Shared by every command that touches
/// the bucket.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Bucket directory holding models/ and data/
    #[arg(long = "bucket", env = "BUCKET_NAME", default_value = "bucket")]
    pub bucket: PathBuf,

    /// Upper bound on a single blob read or write, in seconds
    #[arg(long, env = "BLOB_TIMEOUT_SECS", default_value_t = 30)]
    pub blob_timeout_secs: u64,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Hyperparameters used by runs started through POST /train
    #[command(flatten)]
    pub train: TrainArgs,
}

/// Hyperparameters for a training run.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Vocabulary size, including the [PAD] and [UNK] ids
    #[arg(long, default_value_t = 10_000)]
    pub max_vocab_ids: usize,

    /// Share of each class held out for the final test
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Tail share of the training split used for validation
    #[arg(long, default_value_t = 0.1)]
    pub validation_fraction: f64,

    /// Seed for the split, the shuffling and weight init
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Upper bound on passes over the training data
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub learning_rate: f64,

    /// Epochs without a better validation loss before stopping
    #[arg(long, default_value_t = 2)]
    pub patience: usize,

    #[arg(long, default_value_t = 32)]
    pub embedding_dim: usize,

    /// Hidden units per direction of the first BiLSTM
    #[arg(long, default_value_t = 64)]
    pub sequence_hidden: usize,

    /// Hidden units per direction of the second BiLSTM
    #[arg(long, default_value_t = 16)]
    pub summary_hidden: usize,

    #[arg(long, default_value_t = 64)]
    pub dense_hidden: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            max_vocab_ids:       a.max_vocab_ids,
            test_fraction:       a.test_fraction,
            validation_fraction: a.validation_fraction,
            seed:                a.seed,
            epochs:              a.epochs,
            batch_size:          a.batch_size,
            learning_rate:       a.learning_rate,
            patience:            a.patience,
            embedding_dim:       a.embedding_dim,
            sequence_hidden:     a.sequence_hidden,
            summary_hidden:      a.summary_hidden,
            dense_hidden:        a.dense_hidden,
            dropout:             a.dropout,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainCommandArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub train: TrainArgs,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Raw corpus, one {"title", "content", "label"} object per line
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Base URL of a running API
    #[arg(long, env = "API_URL")]
    pub api_url: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_train_defaults_match_train_config() {
        let cli = TestCli::try_parse_from(["review-sentiment", "train", "--bucket", "b"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.train.into();
        let default = TrainConfig::default();
        assert_eq!(cfg.max_vocab_ids, default.max_vocab_ids);
        assert_eq!(cfg.epochs, default.epochs);
        assert_eq!(cfg.batch_size, default.batch_size);
        assert_eq!(cfg.learning_rate, default.learning_rate);
        assert_eq!(cfg.dropout, default.dropout);
        assert_eq!(args.store.bucket, PathBuf::from("b"));
    }

    #[test]
    fn test_prepare_requires_input() {
        assert!(TestCli::try_parse_from(["review-sentiment", "prepare", "--bucket", "b"]).is_err());
    }

    #[test]
    fn test_serve_flags() {
        let cli = TestCli::try_parse_from([
            "review-sentiment", "serve", "--bucket", "b", "--port", "9000", "--epochs", "3",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else { panic!("expected serve") };
        assert_eq!(args.port, 9000);
        assert_eq!(args.train.epochs, 3);
    }
}
