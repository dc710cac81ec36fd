// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence that doesn't belong to any one
// business layer:
//
//   checkpoint.rs — model weights (NamedMpkGzFileRecorder) plus
//                   checkpoint.json with the hidden width and the
//                   label/char indices, so inference can rebuild
//                   the exact model that was trained.
//
//   metrics.rs    — per-epoch mean loss written to metrics.csv
//                   for later plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
