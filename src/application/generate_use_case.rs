// ============================================================
// Layer 2 — Generate Use Case
// ============================================================
// Loads a checkpoint once and serves any number of generation
// calls from it.
//
// Concurrency: clone the use case once per worker thread. A
// clone copies the module structure, but the parameter tensors
// are reference-counted, so the weights are not duplicated.
// Every call builds its own recurrent state, so concurrent
// callers never see each other's decoding.

use anyhow::Result;
use burn::prelude::*;
use rand::RngCore;

use crate::domain::generation::{GenerateOptions, GenerateRequest, GenerateResponse};
use crate::domain::traits::SkeletonGenerator;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::sampler::Sampler;

#[derive(Clone)]
pub struct GenerateUseCase<B: Backend> {
    sampler: Sampler<B>,
    options: GenerateOptions,
}

impl<B: Backend> GenerateUseCase<B> {
    /// Load the checkpoint in `checkpoint_dir` onto `device`.
    pub fn load(checkpoint_dir: &str, device: B::Device, options: GenerateOptions) -> Result<Self> {
        let ckpt          = CheckpointManager::new(checkpoint_dir);
        let (model, meta) = ckpt.load::<B>(&device)?;
        let sampler       = Sampler::new(model, meta.vocabulary, device);
        Ok(Self::new(sampler, options))
    }

    pub fn new(sampler: Sampler<B>, options: GenerateOptions) -> Self {
        Self { sampler, options }
    }

    pub fn sampler(&self) -> &Sampler<B> {
        &self.sampler
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }
}

impl<B: Backend> SkeletonGenerator for GenerateUseCase<B> {
    fn generate(
        &self,
        request: &GenerateRequest,
        rng:     &mut dyn RngCore,
    ) -> Result<GenerateResponse> {
        // request.style / request.slots are intentionally not read
        let skeleton = self.sampler.generate(&request.label, &self.options, rng)?;
        tracing::debug!("label='{}' → {:?}", request.label, skeleton);
        Ok(GenerateResponse { skeleton })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::domain::generation::no_template_for;
    use burn::backend::{Autodiff, NdArray};
    use rand::{rngs::StdRng, SeedableRng};
    use std::fs;

    type InferBackend = NdArray<f32>;
    type TrainBackend = Autodiff<InferBackend>;

    /// Train on the two-line greeting/farewell corpus and load it back.
    fn trained(dir: &std::path::Path) -> GenerateUseCase<InferBackend> {
        let corpus = dir.join("templates.txt");
        let ckpt   = dir.join("ckpt");
        fs::write(&corpus, "greeting|Hello [name]\nfarewell|Bye [name]\n").unwrap();

        TrainUseCase::new(TrainConfig {
            corpus_path:    corpus.display().to_string(),
            checkpoint_dir: ckpt.display().to_string(),
            hidden_size:    32,
            epochs:         60,
            lr:             1e-2,
            ..TrainConfig::default()
        })
        .execute_on::<TrainBackend>(&Default::default())
        .unwrap();

        GenerateUseCase::load(&ckpt.display().to_string(), Default::default(), GenerateOptions::default())
            .unwrap()
    }

    #[test]
    fn test_known_label_generates_a_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = trained(dir.path());

        let res = uc.generate(&GenerateRequest::new("greeting"), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(!res.skeleton.is_empty());
        assert_ne!(res.skeleton, no_template_for("greeting"));
        assert!(!res.skeleton.contains('>'));
    }

    #[test]
    fn test_unknown_label_returns_exact_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = trained(dir.path());

        let res = uc.generate(&GenerateRequest::new("unknown_label"), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(res.skeleton, "[no template for label=unknown_label]");
    }

    #[test]
    fn test_clones_agree_and_style_is_inert() {
        let dir   = tempfile::tempdir().unwrap();
        let uc    = trained(dir.path());
        let other = uc.clone();
        assert_eq!(uc.sampler().vocabulary(), other.sampler().vocabulary());

        let plain  = GenerateRequest::new("farewell");
        let styled = GenerateRequest {
            style: Some(serde_json::json!({"tone": "formal"})),
            slots: Some(serde_json::json!({"name": "Ada"})),
            ..plain.clone()
        };

        let a = uc.generate(&plain, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = other.generate(&styled, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_callers_match_sequential_runs() {
        let dir     = tempfile::tempdir().unwrap();
        let uc      = trained(dir.path());
        let request = GenerateRequest::new("greeting");

        let expected: Vec<GenerateResponse> = (0..4u64)
            .map(|seed| uc.generate(&request, &mut StdRng::seed_from_u64(seed)).unwrap())
            .collect();

        let workers: Vec<_> = (0..4u64)
            .map(|seed| {
                let worker  = uc.clone();
                let request = request.clone();
                std::thread::spawn(move || {
                    worker.generate(&request, &mut StdRng::seed_from_u64(seed)).unwrap()
                })
            })
            .collect();

        let got: Vec<GenerateResponse> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_missing_checkpoint_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let res = GenerateUseCase::<InferBackend>::load(
            &dir.path().join("nothing").display().to_string(),
            Default::default(),
            GenerateOptions::default(),
        );
        assert!(res.is_err());
    }
}
