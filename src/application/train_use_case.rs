// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the template corpus   (Layer 4 - data)
//   Step 2: Build label/char indices   (Layer 4 - data)
//   Step 3: Encode the dataset         (Layer 4 - data)
//   Step 4: Run training loop          (Layer 5 - ml)
//   Step 5: Save checkpoint            (Layer 6 - infra)
//   Step 6: Save epoch metrics         (Layer 6 - infra)
//
// Nothing is written until step 5, so a malformed corpus or an
// interrupted run leaves no checkpoint behind.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Result};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use serde::{Deserialize, Serialize};

use crate::application::{ComputeBackend, CpuBackend, GpuBackend};
use crate::data::{dataset::TemplateDataset, loader::TemplateLoader, vocab::Vocabulary};
use crate::domain::traits::TemplateSource;
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointMeta},
    metrics::MetricsLogger,
};
use crate::ml::trainer::run_training;

/// Sequences per optimiser step. Fixed; not exposed on the CLI.
pub const BATCH_SIZE: usize = 16;

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:    String,
    pub checkpoint_dir: String,
    pub hidden_size:    usize,
    pub epochs:         usize,
    pub lr:             f64,
    /// Seeds model initialisation and batch shuffling
    pub seed:           u64,
    pub backend:        ComputeBackend,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:    "data/templates.txt".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            hidden_size:    256,
            epochs:         300,
            lr:             1e-3,
            seed:           42,
            backend:        ComputeBackend::Cpu,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline on the configured backend.
    pub fn execute(&self) -> Result<CheckpointMeta> {
        match self.config.backend {
            ComputeBackend::Cpu => {
                self.execute_on::<burn::backend::Autodiff<CpuBackend>>(&Default::default())
            }
            ComputeBackend::Wgpu => {
                self.execute_on::<burn::backend::Autodiff<GpuBackend>>(&Default::default())
            }
        }
    }

    /// Run the pipeline on an explicit autodiff backend and device.
    pub fn execute_on<B: AutodiffBackend>(&self, device: &B::Device) -> Result<CheckpointMeta> {
        let cfg = &self.config;

        // ── Step 1: Load corpus ───────────────────────────────────────────────
        // Fails here, before any training, on a line without '|'
        let pairs = TemplateLoader::new(&cfg.corpus_path).load_all()?;
        ensure!(!pairs.is_empty(), "corpus '{}' has no template records", cfg.corpus_path);

        // ── Step 2: Build vocabulary ──────────────────────────────────────────
        let vocab = Vocabulary::build(&pairs);
        tracing::info!(
            "Vocabulary: {} labels, {} characters",
            vocab.label_count(),
            vocab.char_count()
        );

        // ── Step 3: Encode dataset ────────────────────────────────────────────
        let dataset = TemplateDataset::from_pairs(&pairs, &vocab)?;

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let outcome = run_training::<B>(cfg, &vocab, dataset, device)?;

        // ── Step 5: Save checkpoint ───────────────────────────────────────────
        // valid() drops the autodiff wrapper; the weights are identical
        let meta = CheckpointMeta::new(cfg.hidden_size, vocab);
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt.save(&outcome.model.valid(), &meta)?;

        // ── Step 6: Save metrics ──────────────────────────────────────────────
        let metrics = MetricsLogger::new(ckpt.dir())?;
        metrics.log_all(&outcome.metrics)?;
        tracing::debug!("Wrote {} metric rows to '{}'", outcome.metrics.len(), metrics.csv_path().display());

        Ok(meta)
    }
}
