// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits instead
// of concrete loaders and models:
//   - TemplateLoader implements TemplateSource
//   - GenerateUseCase implements SkeletonGenerator
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use rand::RngCore;

use crate::domain::generation::{GenerateRequest, GenerateResponse};
use crate::domain::template_pair::TemplatePair;

// ─── TemplateSource ───────────────────────────────────────────────────────────
/// Any component that can produce the training corpus.
pub trait TemplateSource {
    /// Load every `(label, text)` pair, in source order.
    fn load_all(&self) -> Result<Vec<TemplatePair>>;
}

// ─── SkeletonGenerator ────────────────────────────────────────────────────────
/// The single operation an outer serving layer needs:
/// "generate a skeleton for this label".
///
/// The random source is passed in by the caller so runs can be
/// reproduced with a seeded generator.
pub trait SkeletonGenerator {
    fn generate(
        &self,
        request: &GenerateRequest,
        rng:     &mut dyn RngCore,
    ) -> Result<GenerateResponse>;
}
