// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — trains the model on a template corpus
//   2. `generate` — loads a checkpoint and prints skeletons
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::prelude::Backend;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use crate::application::{
    generate_use_case::GenerateUseCase,
    train_use_case::TrainUseCase,
    ComputeBackend, CpuBackend, GpuBackend,
};
use crate::domain::generation::GenerateRequest;
use crate::domain::traits::SkeletonGenerator;
use commands::{Commands, GenerateArgs, TrainArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "skeleton-gru",
    version,
    about = "Train a label-conditioned character GRU, then generate template skeletons."
)]
pub struct Cli {
    /// The subcommand to run (train or generate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Generate(args) => run_generate(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on corpus: {}", args.corpus);

    let use_case = TrainUseCase::new(args.into());
    let meta     = use_case.execute()?;

    println!(
        "Training complete. Checkpoint saved ({} labels, {} characters).",
        meta.vocabulary.label_count(),
        meta.vocabulary.char_count(),
    );
    Ok(())
}

/// Handles the `generate` subcommand.
fn run_generate(args: GenerateArgs) -> Result<()> {
    match ComputeBackend::from(args.backend) {
        ComputeBackend::Cpu  => generate_with::<CpuBackend>(&args),
        ComputeBackend::Wgpu => generate_with::<GpuBackend>(&args),
    }
}

fn generate_with<B: Backend>(args: &GenerateArgs) -> Result<()> {
    let use_case = GenerateUseCase::<B>::load(&args.checkpoint_dir, Default::default(), args.options())?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };

    let request = GenerateRequest::new(args.label.clone());
    for _ in 0..args.count {
        let response = use_case.generate(&request, &mut rng)?;
        if args.json {
            println!("{}", serde_json::to_string(&response)?);
        } else {
            println!("{}", response.skeleton);
        }
    }
    Ok(())
}
