// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits instead
// of concrete types, so implementations can be swapped without
// touching the orchestration code.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::record::BagRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce dataset rows.
///
/// Implementations:
///   - CsvLoader -> loads from one or more CSV files
///   - (future) ParquetLoader -> loads from columnar files
pub trait RecordSource {
    /// Load all available rows from this source, concatenated in
    /// source order. Returns an error if a file is unreadable or a
    /// required column is missing.
    fn load_all(&self) -> Result<Vec<BagRecord>>;
}
