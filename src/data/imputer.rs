// ============================================================
// Layer 4 - Missing-Value Imputer
// ============================================================
// Fills nulls with fixed, column-specific rules before any
// encoding happens.
//
// Fill rules, applied per row:
//   - Brand / Material / Style / Color: null -> "Missing"
//   - Size: null -> "Missing", then the ordinal map
//       {"Small": -1, "Medium": 0, "Large": 1, "Missing": 0}
//   - Compartments: null -> rounded median of observed counts
//   - Laptop Compartment / Waterproof: null -> "No", then
//       {"No": 0, "Yes": 1}
//   - Weight Capacity: null -> median of observed capacities
//
// The two medians are the only data-dependent part of the rules.
// They are fit once on the training corpus and stored inside the
// encoding artifacts, so test rows are filled with the exact same
// values the model saw during training.
//
// A second pass over already-filled rows is the identity: no null
// survives one pass and no new nulls are introduced.

use serde::{Deserialize, Serialize};

use crate::domain::record::BagRecord;

/// Sentinel substituted for null categorical values. The encoder
/// guarantees this value always holds a code.
pub const MISSING: &str = "Missing";

// ─── ImputeStats ──────────────────────────────────────────────────────────────
/// The fitted medians used by the fill rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputeStats {
    /// Rounded median of observed compartment counts
    pub compartments: f32,

    /// Median of observed weight capacities (kg)
    pub weight_capacity: f32,
}

impl ImputeStats {
    /// Compute the medians from the observed (non-null) values of
    /// the given rows.
    pub fn fit(records: &[BagRecord]) -> Self {
        let compartments = median(records.iter().filter_map(|r| r.compartments)).round();
        let weight_capacity = median(records.iter().filter_map(|r| r.weight_capacity));

        tracing::debug!(
            "Imputation medians: compartments={}, weight_capacity={:.3}",
            compartments,
            weight_capacity
        );
        Self { compartments, weight_capacity }
    }

    /// Apply every fill rule to one row.
    pub fn fill(&self, record: &BagRecord) -> FilledRecord {
        FilledRecord {
            id:                 record.id,
            brand:              fill_category(&record.brand),
            material:           fill_category(&record.material),
            style:              fill_category(&record.style),
            color:              fill_category(&record.color),
            size:               size_ordinal(record.size.as_deref()),
            compartments:       record.compartments.unwrap_or(self.compartments),
            laptop_compartment: flag_value(record.laptop_compartment.as_deref()),
            waterproof:         flag_value(record.waterproof.as_deref()),
            weight_capacity:    record.weight_capacity.unwrap_or(self.weight_capacity),
            price:              record.price,
        }
    }
}

// ─── FilledRecord ─────────────────────────────────────────────────────────────
/// A row with every null filled and the ordinal/flag columns already
/// mapped to numbers. The four categorical columns stay as strings
/// until the encoder assigns their codes.
#[derive(Debug, Clone)]
pub struct FilledRecord {
    pub id:                 i64,
    pub brand:              String,
    pub material:           String,
    pub style:              String,
    pub color:              String,
    pub size:               f32,
    pub compartments:       f32,
    pub laptop_compartment: f32,
    pub waterproof:         f32,
    pub weight_capacity:    f32,
    pub price:              Option<f32>,
}

/// null -> "Missing"; observed values pass through unchanged.
fn fill_category(value: &Option<String>) -> String {
    match value {
        Some(v) => v.clone(),
        None => MISSING.to_string(),
    }
}

/// {"Small": -1, "Medium": 0, "Large": 1}; null and any
/// unrecognized token take the "Missing" ordinal 0.
fn size_ordinal(value: Option<&str>) -> f32 {
    match value {
        Some("Small") => -1.0,
        Some("Large") => 1.0,
        _ => 0.0,
    }
}

/// {"No": 0, "Yes": 1}; null and any unrecognized token count as "No".
fn flag_value(value: Option<&str>) -> f32 {
    match value {
        Some("Yes") => 1.0,
        _ => 0.0,
    }
}

/// Median of the finite values in the iterator; 0.0 when empty.
fn median(values: impl Iterator<Item = f32>) -> f32 {
    let mut sorted: Vec<f32> = values.filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> BagRecord {
        BagRecord {
            id,
            brand:              Some("Nike".into()),
            material:           Some("Leather".into()),
            size:               Some("Small".into()),
            compartments:       Some(7.0),
            laptop_compartment: Some("Yes".into()),
            waterproof:         Some("No".into()),
            style:              Some("Tote".into()),
            color:              Some("Black".into()),
            weight_capacity:    Some(11.6),
            price:              Some(112.15),
        }
    }

    #[test]
    fn test_fill_leaves_complete_rows_unchanged() {
        let rows = vec![record(0), record(1)];
        let stats = ImputeStats::fit(&rows);
        let filled = stats.fill(&rows[0]);

        assert_eq!(filled.brand, "Nike");
        assert_eq!(filled.size, -1.0);
        assert_eq!(filled.compartments, 7.0);
        assert_eq!(filled.laptop_compartment, 1.0);
        assert_eq!(filled.waterproof, 0.0);
        assert_eq!(filled.weight_capacity, 11.6);
    }

    #[test]
    fn test_null_categoricals_become_missing() {
        let mut row = record(0);
        row.brand = None;
        row.color = None;

        let stats = ImputeStats::fit(&[record(1)]);
        let filled = stats.fill(&row);
        assert_eq!(filled.brand, MISSING);
        assert_eq!(filled.color, MISSING);
    }

    #[test]
    fn test_null_numericals_take_the_median() {
        let mut rows = vec![record(0), record(1), record(2)];
        rows[0].compartments = Some(2.0);
        rows[1].compartments = Some(5.0);
        rows[2].compartments = None;
        rows[0].weight_capacity = Some(10.0);
        rows[1].weight_capacity = Some(20.0);
        rows[2].weight_capacity = None;

        let stats = ImputeStats::fit(&rows);
        // Even count of observed values: median is the midpoint
        assert_eq!(stats.compartments, 4.0); // (2 + 5) / 2 = 3.5, rounded
        assert_eq!(stats.weight_capacity, 15.0);

        let filled = stats.fill(&rows[2]);
        assert_eq!(filled.compartments, 4.0);
        assert_eq!(filled.weight_capacity, 15.0);
    }

    #[test]
    fn test_size_ordinal_map() {
        assert_eq!(size_ordinal(Some("Small")), -1.0);
        assert_eq!(size_ordinal(Some("Medium")), 0.0);
        assert_eq!(size_ordinal(Some("Large")), 1.0);
        assert_eq!(size_ordinal(None), 0.0);
        // Unrecognized tokens take the Missing ordinal
        assert_eq!(size_ordinal(Some("Gigantic")), 0.0);
    }

    #[test]
    fn test_flag_defaults_to_no() {
        assert_eq!(flag_value(Some("Yes")), 1.0);
        assert_eq!(flag_value(Some("No")), 0.0);
        assert_eq!(flag_value(None), 0.0);
        assert_eq!(flag_value(Some("Maybe")), 0.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([3.0, 1.0, 2.0].into_iter()), 2.0);
        assert_eq!(median([4.0, 1.0, 2.0, 3.0].into_iter()), 2.5);
        assert_eq!(median(std::iter::empty()), 0.0);
    }
}
