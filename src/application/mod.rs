// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training or generating a skeleton).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

use serde::{Deserialize, Serialize};

// The training workflow
pub mod train_use_case;

// The checkpoint-backed generation workflow
pub mod generate_use_case;

/// CPU backend (ndarray)
pub type CpuBackend = burn::backend::NdArray<f32>;

/// GPU backend (wgpu)
pub type GpuBackend = burn::backend::Wgpu;

/// Which Burn backend a use case runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeBackend {
    #[default]
    Cpu,
    Wgpu,
}
