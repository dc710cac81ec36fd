use burn::{
    nn::{
        gru::{Gru, GruConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::data::batcher::TemplateBatch;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SkeletonGruConfig {
    /// Number of real characters (output width). The input table gets
    /// one extra row for the pad id.
    pub vocab_size:  usize,
    pub label_count: usize,
    pub hidden_size: usize,
}

impl SkeletonGruConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SkeletonGru<B> {
        let char_embedding  = EmbeddingConfig::new(self.vocab_size + 1, self.hidden_size).init(device);
        let label_embedding = EmbeddingConfig::new(self.label_count, self.hidden_size).init(device);
        // Input per step = [char embedding ‖ label embedding]
        let gru    = GruConfig::new(self.hidden_size * 2, self.hidden_size, true).init(device);
        let output = LinearConfig::new(self.hidden_size, self.vocab_size).init(device);
        SkeletonGru {
            char_embedding, label_embedding, gru, output,
            hidden_size: self.hidden_size,
        }
    }

    /// Shapes a model built from this config must have.
    pub fn expected_dims(&self) -> ModelDims {
        ModelDims {
            char_rows:  self.vocab_size + 1,
            label_rows: self.label_count,
            hidden:     self.hidden_size,
            outputs:    self.vocab_size,
        }
    }
}

/// Parameter shapes that tie a model to a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDims {
    pub char_rows:  usize,
    pub label_rows: usize,
    pub hidden:     usize,
    pub outputs:    usize,
}

#[derive(Module, Debug)]
pub struct SkeletonGru<B: Backend> {
    pub char_embedding:  Embedding<B>,
    pub label_embedding: Embedding<B>,
    pub gru:             Gru<B>,
    pub output:          Linear<B>,
    pub hidden_size:     usize,
}

impl<B: Backend> SkeletonGru<B> {
    /// history: [batch, steps] char ids, labels: [batch] label ids,
    /// state: [batch, hidden] or None for a zero state.
    ///
    /// Returns logits [batch, steps, vocab] and the state after the
    /// last step, to be fed back for the next call.
    pub fn forward(
        &self,
        history: Tensor<B, 2, Int>,
        labels:  Tensor<B, 1, Int>,
        state:   Option<Tensor<B, 2>>,
    ) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let [batch_size, steps] = history.dims();

        let chars = self.char_embedding.forward(history); // [batch, steps, hidden]

        // Same label vector at every time step
        let label = self.label_embedding
            .forward(labels.reshape([batch_size, 1]))       // [batch, 1, hidden]
            .expand([batch_size, steps, self.hidden_size]);

        let x = Tensor::cat(vec![chars, label], 2);         // [batch, steps, 2*hidden]
        let [_, _, d_input] = x.dims();

        // Gru::forward takes every step's previous state from its state
        // argument rather than from its own output, so the recurrence
        // is unrolled here one step at a time.
        let mut h = state.unwrap_or_else(|| {
            Tensor::zeros([batch_size, self.hidden_size], &x.device())
        });
        let mut outputs = Vec::with_capacity(steps);

        for t in 0..steps {
            let x_t = x.clone().slice([0..batch_size, t..t + 1, 0..d_input]);
            let h_t = self.gru.forward(x_t, Some(h.reshape([batch_size, 1, self.hidden_size])));
            h = h_t.clone().reshape([batch_size, self.hidden_size]);
            outputs.push(h_t);
        }

        let hidden = Tensor::cat(outputs, 1);                // [batch, steps, hidden]
        (self.output.forward(hidden), h)
    }

    /// Teacher-forced loss for one padded batch: predict
    /// sequences[:, 1:] from sequences[:, :-1].
    pub fn forward_loss(&self, batch: TemplateBatch<B>) -> Tensor<B, 1> {
        let [batch_size, width] = batch.sequences.dims();

        let history = batch.sequences.clone().slice([0..batch_size, 0..width - 1]);
        let targets = batch.sequences.slice([0..batch_size, 1..width]);
        let mask    = batch.mask.slice([0..batch_size, 1..width]);

        let (logits, _) = self.forward(history, batch.labels, None);
        masked_cross_entropy(logits, targets, mask)
    }

    pub fn dims(&self) -> ModelDims {
        ModelDims::of(
            &self.char_embedding.weight.val(),
            &self.label_embedding.weight.val(),
            &self.output.weight.val(),
        )
    }
}

impl ModelDims {
    /// Shapes held by a loaded record, read before it is applied
    /// to a model.
    pub fn of_record<B: Backend>(record: &SkeletonGruRecord<B>) -> Self {
        Self::of(
            &record.char_embedding.weight.val(),
            &record.label_embedding.weight.val(),
            &record.output.weight.val(),
        )
    }

    fn of<B: Backend>(chars: &Tensor<B, 2>, labels: &Tensor<B, 2>, output: &Tensor<B, 2>) -> Self {
        let [char_rows, hidden] = chars.dims();
        let [label_rows, _]     = labels.dims();
        // Linear weight is [d_input, d_output]
        let [_, outputs]        = output.dims();
        Self { char_rows, label_rows, hidden, outputs }
    }
}

/// Mean cross-entropy over the positions where mask == 1.
///
/// logits [batch, steps, vocab], targets/mask [batch, steps].
/// Padded targets hold the pad id, which has no logit column, so
/// they are swapped for 0 before the gather and then weighted out.
pub fn masked_cross_entropy<B: Backend>(
    logits:  Tensor<B, 3>,
    targets: Tensor<B, 2, Int>,
    mask:    Tensor<B, 2, Int>,
) -> Tensor<B, 1> {
    let [batch_size, steps, vocab] = logits.dims();
    let rows = batch_size * steps;

    let logits  = logits.reshape([rows, vocab]);
    let mask    = mask.reshape([rows]);
    let targets = targets
        .reshape([rows])
        .mask_fill(mask.clone().equal_elem(0), 0);

    let picked = log_softmax(logits, 1)
        .gather(1, targets.reshape([rows, 1]))
        .reshape([rows]);

    let weights = mask.float();
    let count   = weights.clone().sum().clamp_min(1.0);
    (picked * weights).sum().neg() / count
}
