// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `generate`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{train_use_case::TrainConfig, ComputeBackend};
use crate::domain::generation::{GenerateOptions, DEFAULT_MAX_LENGTH, DEFAULT_TEMPERATURE};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the skeleton model on a `label|text` corpus
    Train(TrainArgs),

    /// Generate a skeleton for a label from a trained checkpoint
    Generate(GenerateArgs),
}

/// Compute backend as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum BackendArg {
    /// CPU via ndarray
    #[default]
    Cpu,
    /// GPU via wgpu
    Wgpu,
}

impl From<BackendArg> for ComputeBackend {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Cpu  => ComputeBackend::Cpu,
            BackendArg::Wgpu => ComputeBackend::Wgpu,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus file, one `label|text` record per line
    #[arg(long, default_value = "data/templates.txt")]
    pub corpus: String,

    /// Directory to write the checkpoint into
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Width of the embeddings and the GRU hidden state
    #[arg(long, default_value_t = 256)]
    pub hidden_size: usize,

    /// Number of full passes through the corpus
    #[arg(long, default_value_t = 300)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seed for weight initialisation and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = BackendArg::Cpu)]
    pub backend: BackendArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:    a.corpus,
            checkpoint_dir: a.checkpoint_dir,
            hidden_size:    a.hidden_size,
            epochs:         a.epochs,
            lr:             a.lr,
            seed:           a.seed,
            backend:        a.backend.into(),
        }
    }
}

/// All arguments for the `generate` command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Category label to generate a skeleton for
    #[arg(long)]
    pub label: String,

    /// Directory where the checkpoint was saved by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of characters to decode
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Sampling temperature (< 1 sharper, > 1 flatter)
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Seed the sampler for a reproducible skeleton
    #[arg(long)]
    pub seed: Option<u64>,

    /// How many skeletons to draw
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Print `{"skeleton": ...}` JSON lines instead of plain text
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_enum, default_value_t = BackendArg::Cpu)]
    pub backend: BackendArg,
}

impl GenerateArgs {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            max_length:  self.max_length,
            temperature: self.temperature,
        }
    }
}
