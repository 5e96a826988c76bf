// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish a specific goal
// (training the model or writing predictions). No ML math, no
// printing, no direct tensor code here; only workflow
// coordination.
//
// Reference: Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The prediction workflow
pub mod predict_use_case;
