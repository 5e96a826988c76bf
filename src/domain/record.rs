// ============================================================
// Layer 3 - Record Domain Type
// ============================================================
// One row of the backpack dataset with its fixed schema.
//
// The field names bind the exact CSV column headers via serde
// renames, so the schema is validated once at load time instead
// of being probed by string-keyed column lookups deep inside the
// pipeline. Every feature column is an Option because the raw
// files contain empty cells; the imputer is the only component
// that turns those Options into concrete values.
//
// Reference: Rust Book §5 (Structs)
//            serde derive documentation

use serde::{Deserialize, Serialize};

/// A raw dataset row as it appears on disk.
///
/// Column order in the files: id, Brand, Material, Size,
/// Compartments, Laptop Compartment, Waterproof, Style, Color,
/// Weight Capacity (kg), and (labelled files only) Price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagRecord {
    /// Row identifier, carried through to the prediction output
    pub id: i64,

    #[serde(rename = "Brand")]
    pub brand: Option<String>,

    #[serde(rename = "Material")]
    pub material: Option<String>,

    /// Ordinal categorical: Small / Medium / Large
    #[serde(rename = "Size")]
    pub size: Option<String>,

    #[serde(rename = "Compartments")]
    pub compartments: Option<f32>,

    /// Binary flag: Yes / No
    #[serde(rename = "Laptop Compartment")]
    pub laptop_compartment: Option<String>,

    /// Binary flag: Yes / No
    #[serde(rename = "Waterproof")]
    pub waterproof: Option<String>,

    #[serde(rename = "Style")]
    pub style: Option<String>,

    #[serde(rename = "Color")]
    pub color: Option<String>,

    #[serde(rename = "Weight Capacity (kg)")]
    pub weight_capacity: Option<f32>,

    /// Target price - present in labelled files, absent in test files
    #[serde(rename = "Price")]
    pub price: Option<f32>,
}
