// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw corpus file to padded tensor batches.
//
//   corpus.txt (label|text lines)
//       │
//       ▼
//   TemplateLoader    → parses lines into TemplatePairs
//       │
//       ▼
//   Vocabulary        → label index + character index
//       │
//       ▼
//   TemplateDataset   → <text> encoded as char ids, Burn Dataset
//       │
//       ▼
//   SequenceBatcher   → right-pads to the batch max + mask
//       │
//       ▼
//   DataLoader        → shuffled batches of 16 for the trainer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Parses the `label|text` corpus file
pub mod loader;

/// Label and character indices with sentinel/pad handling
pub mod vocab;

/// Implements Burn's Dataset trait for encoded sequences
pub mod dataset;

/// Implements Burn's Batcher trait with dynamic padding
pub mod batcher;
