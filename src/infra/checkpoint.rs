// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a trained model together with everything
// needed to rebuild it.
//
// Checkpoint directory layout:
//   checkpoints/
//     model.mpk.gz      ← all learned parameters
//     checkpoint.json   ← hidden_size + label/char indices
//     metrics.csv       ← written by MetricsLogger
//
// The JSON half is the only source of truth for the model shape:
//   char embedding rows = char_count + 1  (pad row)
//   label embedding rows = label_count
//   output width         = char_count
// Loading rebuilds the model from it and refuses weights whose
// shapes disagree.
//
// Weights use Burn's NamedMpkGzFileRecorder with full precision:
//   - MessagePack format, gzip compressed
//   - f32 parameters stored as-is, so a reloaded model samples
//     exactly like the one that was saved
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::data::vocab::Vocabulary;
use crate::ml::model::{ModelDims, SkeletonGru, SkeletonGruConfig, SkeletonGruRecord};

type WeightsRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

const WEIGHTS_FILE: &str = "model";
const META_FILE:    &str = "checkpoint.json";

/// Everything except the weights: hidden width and the indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub hidden_size: usize,
    pub vocabulary:  Vocabulary,
}

impl CheckpointMeta {
    pub fn new(hidden_size: usize, vocabulary: Vocabulary) -> Self {
        Self { hidden_size, vocabulary }
    }

    /// The model configuration this checkpoint was trained with.
    pub fn model_config(&self) -> SkeletonGruConfig {
        SkeletonGruConfig::new(
            self.vocabulary.char_count(),
            self.vocabulary.label_count(),
            self.hidden_size,
        )
    }
}

/// Reads and writes one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the weights and metadata.
    /// The directory is created here, so nothing exists on disk
    /// until a run has finished.
    pub fn save<B: Backend>(&self, model: &SkeletonGru<B>, meta: &CheckpointMeta) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        // Recorder adds the .mpk.gz extension
        let weights = self.dir.join(WEIGHTS_FILE);
        WeightsRecorder::new()
            .record(model.clone().into_record(), weights.clone())
            .with_context(|| format!("Failed to save weights to '{}'", weights.display()))?;

        let meta_path = self.dir.join(META_FILE);
        fs::write(&meta_path, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("Cannot write '{}'", meta_path.display()))?;

        tracing::info!("Saved checkpoint to '{}'", self.dir.display());
        Ok(())
    }

    /// Read only the metadata.
    pub fn load_meta(&self) -> Result<CheckpointMeta> {
        let path = self.dir.join(META_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' before 'generate'.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt checkpoint metadata '{}'", path.display()))
    }

    /// Rebuild the model from the metadata and load the weights into it.
    /// Fails if the stored parameter shapes don't match the indices.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(SkeletonGru<B>, CheckpointMeta)> {
        let meta      = self.load_meta()?;
        let model_cfg = meta.model_config();
        let model: SkeletonGru<B> = model_cfg.init(device);

        let weights = self.dir.join(WEIGHTS_FILE);
        let record: SkeletonGruRecord<B> = WeightsRecorder::new()
            .load(weights.clone(), device)
            .with_context(|| format!("Cannot load weights '{}'", weights.display()))?;

        // Check shapes before the record replaces the fresh parameters
        let expected = model_cfg.expected_dims();
        let found    = ModelDims::of_record(&record);
        if found != expected {
            bail!(
                "checkpoint dimension mismatch in '{}': metadata implies {:?}, weights have {:?}",
                self.dir.display(), expected, found,
            );
        }
        let model = model.load_record(record);

        tracing::info!(
            "Loaded checkpoint: {} labels, {} chars, hidden={}",
            meta.vocabulary.label_count(),
            meta.vocabulary.char_count(),
            meta.hidden_size,
        );
        Ok((model, meta))
    }
}
