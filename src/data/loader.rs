// ============================================================
// Layer 4 - CSV Loader
// ============================================================
// Reads one or more CSV files into typed BagRecord rows.
//
// Loading is the single place where the file schema is checked:
// the header row of every file must contain all required columns
// before any row is parsed. A file missing a column fails here,
// immediately, rather than producing half-encoded samples later.
//
// Empty cells deserialize to None on the Option fields of
// BagRecord; the imputer decides what to do with them.
//
// Reference: Rust Book §9 (Error Handling)
//            csv crate documentation

use anyhow::{Context, Result};
use std::{fs::File, path::{Path, PathBuf}};

use crate::domain::record::BagRecord;
use crate::domain::traits::RecordSource;

/// Every column a dataset file must carry. Price is intentionally
/// not listed: test files have no target column.
const REQUIRED_COLUMNS: [&str; 10] = [
    "id",
    "Brand",
    "Material",
    "Size",
    "Compartments",
    "Laptop Compartment",
    "Waterproof",
    "Style",
    "Color",
    "Weight Capacity (kg)",
];

/// Loads rows from a fixed list of CSV files, concatenated in order.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    paths: Vec<PathBuf>,
}

impl CsvLoader {
    /// Create a new CsvLoader over the given file paths.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<BagRecord>> {
        let mut records = Vec::new();

        for path in &self.paths {
            let rows = load_single_csv(path)?;
            tracing::debug!("Loaded {} rows from '{}'", rows.len(), path.display());
            records.extend(rows);
        }

        tracing::info!(
            "Loaded {} rows from {} file(s)",
            records.len(),
            self.paths.len()
        );
        Ok(records)
    }
}

/// Parse a single CSV file into typed rows.
/// Validates the header before touching any data row.
fn load_single_csv(path: &Path) -> Result<Vec<BagRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    // ── Header validation ─────────────────────────────────────────────────────
    let headers = reader
        .headers()
        .with_context(|| format!("Cannot read header row of '{}'", path.display()))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .copied()
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "'{}' is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        );
    }

    // ── Row parsing ───────────────────────────────────────────────────────────
    // Line numbers in errors are 1-based and account for the header row.
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<BagRecord>().enumerate() {
        let record = result
            .with_context(|| format!("Line {} of '{}'", index + 2, path.display()))?;
        rows.push(record);
    }

    Ok(rows)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,Brand,Material,Size,Compartments,Laptop Compartment,Waterproof,Style,Color,Weight Capacity (kg),Price";

    fn write_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn test_loads_all_rows() {
        let csv = format!(
            "{HEADER}\n\
             0,Nike,Leather,Small,7,Yes,No,Tote,Black,11.6,112.15\n\
             1,Adidas,Canvas,Medium,5,No,Yes,Messenger,Green,24.0,68.88\n"
        );
        let file = write_temp_csv(&csv);

        let records = CsvLoader::new([file.path()]).load_all().expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[1].brand.as_deref(), Some("Adidas"));
        assert_eq!(records[1].price, Some(68.88));
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = format!("{HEADER}\n0,,Leather,,7,,No,Tote,Black,,112.15\n");
        let file = write_temp_csv(&csv);

        let records = CsvLoader::new([file.path()]).load_all().expect("load");
        assert_eq!(records[0].brand, None);
        assert_eq!(records[0].size, None);
        assert_eq!(records[0].laptop_compartment, None);
        assert_eq!(records[0].weight_capacity, None);
    }

    #[test]
    fn test_missing_column_fails() {
        // No "Weight Capacity (kg)" column
        let csv = "id,Brand,Material,Size,Compartments,Laptop Compartment,Waterproof,Style,Color\n\
                   0,Nike,Leather,Small,7,Yes,No,Tote,Black\n";
        let file = write_temp_csv(csv);

        let err = CsvLoader::new([file.path()]).load_all().unwrap_err();
        assert!(err.to_string().contains("Weight Capacity (kg)"));
    }

    #[test]
    fn test_price_column_is_optional() {
        let csv = "id,Brand,Material,Size,Compartments,Laptop Compartment,Waterproof,Style,Color,Weight Capacity (kg)\n\
                   300000,Puma,Nylon,Large,3,No,No,Backpack,Red,18.2\n";
        let file = write_temp_csv(csv);

        let records = CsvLoader::new([file.path()]).load_all().expect("load");
        assert_eq!(records[0].price, None);
    }

    #[test]
    fn test_concatenates_multiple_files() {
        let a = write_temp_csv(&format!(
            "{HEADER}\n0,Nike,Leather,Small,7,Yes,No,Tote,Black,11.6,112.15\n"
        ));
        let b = write_temp_csv(&format!(
            "{HEADER}\n1,Puma,Nylon,Large,3,No,No,Backpack,Red,18.2,50.0\n"
        ));

        let records = CsvLoader::new([a.path(), b.path()]).load_all().expect("load");
        assert_eq!(records.len(), 2);
        // Source order is preserved
        assert_eq!(records[0].id, 0);
        assert_eq!(records[1].id, 1);
    }
}
