//! CSV-based write-off curve loader
//!
//! The write-off file has one column per score category and one row per
//! period, starting at period 0:
//!
//! ```text
//! good,bad
//! 0.000,0.000
//! 0.001,0.004
//! 0.002,0.008
//! ```

use super::{WriteOffCurve, WriteOffTable};
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Load the write-off table from a CSV file
pub fn load_write_off_table(path: &Path) -> Result<WriteOffTable, Box<dyn Error>> {
    let file = File::open(path)?;
    load_write_off_table_from_reader(file)
}

/// Load the write-off table from any reader
pub fn load_write_off_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<WriteOffTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let scores: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); scores.len()];

    for result in csv_reader.records() {
        let record = result?;
        if record.len() != scores.len() {
            return Err(format!(
                "write-off row has {} fields, expected {}",
                record.len(),
                scores.len()
            )
            .into());
        }
        for (col, field) in record.iter().enumerate() {
            let rate: f64 = field.trim().parse()?;
            columns[col].push(rate);
        }
    }

    let mut table = WriteOffTable::new();
    for (score, rates) in scores.into_iter().zip(columns) {
        let curve = WriteOffCurve::new(rates).map_err(|e| format!("column '{}': {}", score, e))?;
        table.insert(score, curve);
    }

    Ok(table)
}
