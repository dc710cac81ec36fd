// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Teacher-forced next-character training with Burn's DataLoader
// and Adam.
//
// Per batch:
//   history = sequences[:, :-1]   ← ground truth fed as input
//   targets = sequences[:, 1:]    ← the NEXT character at each step
//   loss    = cross-entropy over unmasked batch×time positions
//   backward → Adam step
//
// Per epoch: mean batch loss is logged and collected.
// No validation split, no early stopping — exactly `epochs` passes.
//
// The loop is generic over the autodiff backend so the CLI can run
// on wgpu while tests run on the ndarray CPU backend.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::{TrainConfig, BATCH_SIZE};
use crate::data::{batcher::SequenceBatcher, dataset::TemplateDataset, vocab::Vocabulary};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{SkeletonGru, SkeletonGruConfig};

/// A finished training run: the fitted model and one metrics row per epoch.
pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:   SkeletonGru<B>,
    pub metrics: Vec<EpochMetrics>,
}

pub fn run_training<B: AutodiffBackend>(
    cfg:     &TrainConfig,
    vocab:   &Vocabulary,
    dataset: TemplateDataset,
    device:  &B::Device,
) -> Result<TrainingOutcome<B>> {
    ensure!(dataset.sample_count() > 0, "cannot train on an empty corpus");

    // Model initialisation draws from the backend RNG
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = SkeletonGruConfig::new(vocab.char_count(), vocab.label_count(), cfg.hidden_size);
    let mut model: SkeletonGru<B> = model_cfg.init(device);
    tracing::info!(
        "Model ready: vocab={}, labels={}, hidden={}",
        vocab.char_count(), vocab.label_count(), cfg.hidden_size,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().init();

    // ── Data loader: shuffled every epoch, padded per batch ───────────────────
    let batcher = SequenceBatcher::<B>::new(device.clone(), vocab.pad_id());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(BATCH_SIZE)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut metrics = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(batch);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let mean_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        tracing::info!("Epoch {:>3}/{} | loss={:.4}", epoch, cfg.epochs, mean_loss);

        metrics.push(EpochMetrics::new(epoch, mean_loss, batches));
    }

    tracing::info!("Training complete!");
    Ok(TrainingOutcome { model, metrics })
}
