// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   model.rs   — the label-conditioned character GRU
//                  • character embedding (+1 row for padding)
//                  • label embedding, repeated over time
//                  • single-layer GRU over [char ‖ label]
//                  • linear projection to next-char logits
//                  • masked cross-entropy
//
//   trainer.rs — teacher-forced training loop with Adam,
//                generic over the autodiff backend
//
//   sampler.rs — temperature sampling (and greedy decoding)
//                from a loaded model, one character at a time
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Cho et al. (2014) GRU

/// Label-conditioned character GRU
pub mod model;

/// Training loop producing a fitted model and epoch metrics
pub mod trainer;

/// Autoregressive decoding for one label
pub mod sampler;
