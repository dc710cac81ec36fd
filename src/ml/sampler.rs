// ============================================================
// Layer 5 — Sampler
// ============================================================
// Autoregressive decoding of one skeleton for one label.
//
//   input = '<', state = none
//   repeat up to max_length times:
//       logits, state = model(input, label, state)
//       probs         = softmax(logits / temperature)
//       next          ~ probs                 (random draw)
//       next == '>'   → stop, '>' is not emitted
//       otherwise     → append char, input = next
//   return trimmed text
//
// The random source is a parameter, so a seeded StdRng gives a
// reproducible skeleton. Each call owns its recurrent state; the
// model itself is only read.
//
// Reference: rand 0.8 docs, distributions::WeightedIndex
//            Ackley, Hinton & Sejnowski (1985) softmax temperature

use anyhow::{anyhow, ensure, Context, Result};
use burn::{prelude::*, tensor::activation::softmax};
use rand::{distributions::{Distribution, WeightedIndex}, Rng};

use crate::data::vocab::Vocabulary;
use crate::domain::generation::{no_template_for, GenerateOptions};
use crate::ml::model::SkeletonGru;

#[derive(Clone)]
pub struct Sampler<B: Backend> {
    model:  SkeletonGru<B>,
    vocab:  Vocabulary,
    device: B::Device,
}

impl<B: Backend> Sampler<B> {
    pub fn new(model: SkeletonGru<B>, vocab: Vocabulary, device: B::Device) -> Self {
        Self { model, vocab, device }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Sample a skeleton for `label` at the given temperature.
    /// Unknown labels return the no-template placeholder without
    /// touching the model.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        label: &str,
        opts:  &GenerateOptions,
        rng:   &mut R,
    ) -> Result<String> {
        ensure!(
            opts.temperature.is_finite() && opts.temperature > 0.0,
            "temperature must be a positive number, got {}",
            opts.temperature
        );
        let temperature = opts.temperature;

        self.decode(label, opts.max_length, |logits| {
            let probs: Vec<f32> = softmax(logits.clone() / temperature, 0)
                .into_data()
                .to_vec()
                .map_err(|e| anyhow!("cannot read probabilities: {e:?}"))?;
            match WeightedIndex::new(&probs) {
                Ok(dist) => Ok(dist.sample(&mut *rng)),
                // Temperatures too small for f32 overflow the scaled
                // logits to inf/NaN; take the temperature → 0 limit.
                Err(e) => {
                    tracing::debug!("Degenerate distribution at temperature {temperature} ({e}), using argmax");
                    Ok(argmax(logits))
                }
            }
        })
    }

    /// Argmax decoding: the limit of `generate` as temperature → 0.
    pub fn generate_greedy(&self, label: &str, max_length: usize) -> Result<String> {
        self.decode(label, max_length, |logits| Ok(argmax(logits)))
    }

    /// Shared decoding loop; `pick` turns the last step's logits
    /// [vocab] into the next character id.
    fn decode<F>(&self, label: &str, max_length: usize, mut pick: F) -> Result<String>
    where
        F: FnMut(Tensor<B, 1>) -> Result<usize>,
    {
        let Some(label_id) = self.vocab.label_id(label) else {
            tracing::debug!("No template for label '{}'", label);
            return Ok(no_template_for(label));
        };

        let start  = self.vocab.start_id().context("vocabulary has no start sentinel")?;
        let end    = self.vocab.end_id().context("vocabulary has no end sentinel")?;
        let vocab  = self.vocab.char_count();
        let labels = Tensor::<B, 1, Int>::from_ints([label_id as i32], &self.device);

        let mut input = start;
        let mut state = None;
        let mut text  = String::new();

        for _ in 0..max_length {
            let history = Tensor::<B, 1, Int>::from_ints([input as i32], &self.device)
                .reshape([1, 1]);
            let (logits, next_state) = self.model.forward(history, labels.clone(), state);
            state = Some(next_state);

            // [1, 1, vocab] → [vocab]
            let next = pick(logits.reshape([vocab]))?;
            if next == end {
                break;
            }

            let c = self.vocab.char_at(next)
                .with_context(|| format!("model produced id {next} outside the vocabulary"))?;
            text.push(c);
            input = next;
        }

        Ok(text.trim().to_string())
    }
}

fn argmax<B: Backend>(logits: Tensor<B, 1>) -> usize {
    logits.argmax(0).into_scalar().elem::<i64>() as usize
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::END_CHAR;
    use crate::domain::template_pair::TemplatePair;
    use crate::ml::model::SkeletonGruConfig;
    use burn::backend::NdArray;
    use rand::{rngs::StdRng, SeedableRng};

    type TestBackend = NdArray<f32>;

    /// Untrained sampler; its output distribution is broad, which is
    /// what the randomness tests want.
    fn sampler() -> Sampler<TestBackend> {
        let pairs = vec![
            TemplatePair::new("greeting", "Hello [name]"),
            TemplatePair::new("farewell", "Bye [name]"),
        ];
        let vocab  = Vocabulary::build(&pairs);
        let device = Default::default();
        TestBackend::seed(7);
        let model  = SkeletonGruConfig::new(vocab.char_count(), vocab.label_count(), 16)
            .init(&device);
        Sampler::new(model, vocab, device)
    }

    fn opts(max_length: usize, temperature: f64) -> GenerateOptions {
        GenerateOptions { max_length, temperature }
    }

    #[test]
    fn test_unknown_label_returns_placeholder() {
        let s   = sampler();
        let out = s.generate("unknown_label", &GenerateOptions::default(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(out, "[no template for label=unknown_label]");
        assert_eq!(s.generate_greedy("unknown_label", 10).unwrap(), out);
    }

    #[test]
    fn test_unknown_label_never_calls_model() {
        // Empty vocabulary: the model has no usable sentinels, so
        // any attempt to decode would fail.
        let vocab  = Vocabulary::build(&[]);
        let model  = SkeletonGruConfig::new(1, 1, 4).init(&Default::default());
        let s      = Sampler::<TestBackend>::new(model, vocab, Default::default());
        let out    = s.generate("x", &GenerateOptions::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(out.unwrap(), "[no template for label=x]");
    }

    #[test]
    fn test_respects_max_length_and_never_emits_end() {
        let s = sampler();
        for seed in 0..20 {
            let out = s.generate("greeting", &opts(5, 1.0), &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert!(out.chars().count() <= 5, "too long: {out:?}");
            assert!(!out.contains(END_CHAR));
        }
    }

    #[test]
    fn test_zero_max_length_gives_empty_text() {
        let s = sampler();
        assert_eq!(s.generate("farewell", &opts(0, 1.0), &mut StdRng::seed_from_u64(3)).unwrap(), "");
    }

    #[test]
    fn test_same_seed_reproduces() {
        let s = sampler();
        let a = s.generate("greeting", &opts(40, 1.0), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = s.generate("greeting", &opts(40, 1.0), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ_at_temperature_one() {
        let s = sampler();
        let outputs: std::collections::HashSet<String> = (0..8)
            .map(|seed| {
                s.generate("greeting", &opts(40, 1.0), &mut StdRng::seed_from_u64(seed)).unwrap()
            })
            .collect();
        assert!(outputs.len() > 1, "all seeds produced {outputs:?}");
    }

    #[test]
    fn test_near_zero_temperature_follows_argmax() {
        let s      = sampler();
        let greedy = s.generate_greedy("greeting", 30).unwrap();
        for seed in 0..5 {
            let out = s.generate("greeting", &opts(30, 1e-6), &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(out, greedy);
        }
    }

    #[test]
    fn test_vanishing_temperature_falls_back_to_argmax() {
        let s      = sampler();
        let greedy = s.generate_greedy("farewell", 30).unwrap();
        let out    = s.generate("farewell", &opts(30, 1e-50), &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(out, greedy);
    }

    #[test]
    fn test_invalid_temperature_is_an_error() {
        let s = sampler();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(s.generate("greeting", &opts(10, 0.0), &mut rng).is_err());
        assert!(s.generate("greeting", &opts(10, -1.0), &mut rng).is_err());
        assert!(s.generate("greeting", &opts(10, f64::NAN), &mut rng).is_err());
    }

    #[test]
    fn test_output_uses_only_vocabulary_chars() {
        let s = sampler();
        let out = s.generate("farewell", &opts(60, 1.5), &mut StdRng::seed_from_u64(9)).unwrap();
        assert!(out.chars().all(|c| s.vocabulary().char_id(c).is_some()));
        assert_eq!(out, out.trim());
    }
}
