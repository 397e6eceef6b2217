//! Extraction tables as CSV: `Date,Description,In,Out,Balance`.

use serde::Deserialize;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::{TransactionRecord, TransactionTable};

/// Write a table with a header row; an unknown balance is an empty cell.
pub fn write_table_csv<W: Write>(table: &TransactionTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in table {
        wtr.serialize(record)?;
    }
    if table.is_empty() {
        wtr.write_record(["Date", "Description", "In", "Out", "Balance"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_table_csv_path(table: &TransactionTable, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_table_csv(table, file)
}

/// Row as found on disk: any numeric cell may be blank or garbage.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "In", default, deserialize_with = "csv::invalid_option")]
    amount_in: Option<f64>,
    #[serde(rename = "Out", default, deserialize_with = "csv::invalid_option")]
    amount_out: Option<f64>,
    #[serde(rename = "Balance", default, deserialize_with = "csv::invalid_option")]
    balance: Option<f64>,
}

/// `NaN` and `inf` parse as floats but are not amounts.
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Read an extraction table back. Missing or non-finite in/out values become 0.
pub fn read_table_csv(path: impl AsRef<Path>) -> Result<TransactionTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let row: CsvRow = row?;
        records.push(TransactionRecord::new(
            row.date,
            row.description,
            finite(row.amount_in).unwrap_or(0.0),
            finite(row.amount_out).unwrap_or(0.0),
            finite(row.balance),
        ));
    }
    Ok(TransactionTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_fixed_columns() {
        let table = TransactionTable::new(vec![
            TransactionRecord::new("01 Jan", "SALARY, ACME", 2500.0, 0.0, Some(2500.0)),
            TransactionRecord::new("02 Jan", "RENT", 0.0, 800.0, None),
        ]);
        let mut buf = Vec::new();
        write_table_csv(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Date,Description,In,Out,Balance");
        assert_eq!(lines[1], "01 Jan,\"SALARY, ACME\",2500.0,0.0,2500.0");
        assert_eq!(lines[2], "02 Jan,RENT,0.0,800.0,");
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_table_csv(&TransactionTable::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "Date,Description,In,Out,Balance");
    }

    #[test]
    fn test_read_fills_missing_amounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(
            &path,
            "Date,Description,In,Out,Balance\n04 Sep19,Invoice,150.5,,\n05 Sep19,Fee,oops,2.5,99\n",
        )
        .unwrap();

        let table = read_table_csv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].amount_out, 0.0);
        assert_eq!(table.records()[0].balance, None);
        assert_eq!(table.records()[1].amount_in, 0.0);
        assert_eq!(table.records()[1].balance, Some(99.0));
    }

    #[test]
    fn test_read_rejects_non_finite_amounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(
            &path,
            "Date,Description,In,Out,Balance\n04 Sep19,Invoice,NaN,inf,-inf\n05 Sep19,Invoice,100,,NaN\n",
        )
        .unwrap();

        let table = read_table_csv(&path).unwrap();
        assert_eq!(table.records()[0].amount_in, 0.0);
        assert_eq!(table.records()[0].amount_out, 0.0);
        assert_eq!(table.records()[0].balance, None);
        assert_eq!(table.records()[1].balance, None);
        assert_eq!(table.total_in(), 100.0);
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = TransactionTable::new(vec![TransactionRecord::new(
            "Sep 4",
            "Stripe payout",
            2310.5,
            0.0,
            Some(12798.18),
        )]);
        write_table_csv_path(&table, &path).unwrap();
        assert_eq!(read_table_csv(&path).unwrap(), table);
    }
}
