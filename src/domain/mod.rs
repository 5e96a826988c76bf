// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The fixed row schema of the backpack dataset
pub mod record;

// Core abstractions (traits) that other layers implement
pub mod traits;
