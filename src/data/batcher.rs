// ============================================================
// Layer 4 — Sequence Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<EncodedSequence>
// of VARYING lengths into one rectangular batch.
//
// How batching works here:
//   Input:  N sequences, lengths L1..LN
//   Output: TemplateBatch with
//             labels    [N]
//             sequences [N, max(L)]  right-padded with pad_id
//             mask      [N, max(L)]  1 = real char, 0 = padding
//
// Example (pad_id = 9):
//   <Hi>    → [0, 3, 4, 1]        mask [1, 1, 1, 1]
//   <Bye>   → [0, 2, 6, 5, 1]     mask [1, 1, 1, 1, 1]
//
//   sequences = [[0, 3, 4, 1, 9],
//                [0, 2, 6, 5, 1]]
//   mask      = [[1, 1, 1, 1, 0],
//                [1, 1, 1, 1, 1]]
//
// The pad id sits outside the character alphabet and the loss
// ignores every position where mask == 0.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::EncodedSequence;

// ─── TemplateBatch ────────────────────────────────────────────────────────────
/// A padded batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct TemplateBatch<B: Backend> {
    /// Label id per row — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,

    /// `<` + text + `>` per row, right-padded — shape: [batch_size, max_len]
    pub sequences: Tensor<B, 2, Int>,

    /// 1 = real character, 0 = padding — shape: [batch_size, max_len]
    pub mask: Tensor<B, 2, Int>,
}

// ─── SequenceBatcher ──────────────────────────────────────────────────────────
/// Holds the target device and the reserved pad id.
#[derive(Clone, Debug)]
pub struct SequenceBatcher<B: Backend> {
    pub device: B::Device,
    pub pad_id: usize,
}

impl<B: Backend> SequenceBatcher<B> {
    pub fn new(device: B::Device, pad_id: usize) -> Self {
        Self { device, pad_id }
    }
}

impl<B: Backend> Batcher<EncodedSequence, TemplateBatch<B>> for SequenceBatcher<B> {
    fn batch(&self, items: Vec<EncodedSequence>) -> TemplateBatch<B> {
        let batch_size = items.len();
        // Longest sequence sets the width of the whole batch
        let max_len    = items.iter().map(EncodedSequence::len).max().unwrap_or(0);

        // ── Flatten with right padding ────────────────────────────────────────
        let mut seq_flat  = Vec::with_capacity(batch_size * max_len);
        let mut mask_flat = Vec::with_capacity(batch_size * max_len);

        for item in &items {
            let pad = max_len - item.len();
            seq_flat.extend(item.ids.iter().map(|&id| id as i32));
            seq_flat.extend(std::iter::repeat(self.pad_id as i32).take(pad));
            mask_flat.extend(std::iter::repeat(1i32).take(item.len()));
            mask_flat.extend(std::iter::repeat(0i32).take(pad));
        }

        let labels: Vec<i32> = items.iter().map(|s| s.label_id as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let sequences = Tensor::<B, 1, Int>::from_ints(
            seq_flat.as_slice(), &self.device
        ).reshape([batch_size, max_len]);

        let mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, max_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            labels.as_slice(), &self.device
        );

        TemplateBatch { labels, sequences, mask }
    }
}
