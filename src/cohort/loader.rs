//! Load loan cohorts from CSV

use super::Loan;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the cohort file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    amount: f64,
    term: u32,
    score: String,
    apr: f64,
}

impl CsvRow {
    fn to_loan(self) -> Loan {
        Loan::new(self.amount, self.term, self.score, self.apr)
    }
}

/// Load all loans from a CSV file
pub fn load_cohort<P: AsRef<Path>>(path: P) -> Result<Vec<Loan>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut loans = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.to_loan());
    }

    Ok(loans)
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_cohort_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Loan>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.to_loan());
    }

    Ok(loans)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
amount,term,score,apr
1000,12,good,0.20
2000,6,bad,0.25
";

    #[test]
    fn test_load_cohort_from_reader() {
        let loans = load_cohort_from_reader(SAMPLE.as_bytes()).expect("Failed to parse cohort");
        assert_eq!(loans.len(), 2);

        assert_eq!(loans[0].amount, 1000.0);
        assert_eq!(loans[0].term, 12);
        assert_eq!(loans[0].score, "good");
        assert_eq!(loans[0].apr, 0.20);

        assert_eq!(loans[1].term, 6);
        assert_eq!(loans[1].score, "bad");
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let bad = "amount,term,score,apr\nnot_a_number,12,good,0.20\n";
        assert!(load_cohort_from_reader(bad.as_bytes()).is_err());
    }
}
