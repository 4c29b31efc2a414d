//! CSV rendering of result tables.

use crate::domain::date_range::DATE_FORMAT;
use crate::domain::error::EtfError;
use crate::domain::table::ResultTable;
use std::io::Write;

/// Writes `date,<columns...>` followed by one line per row. Empty cells are
/// written as empty fields.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<(), EtfError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push("date".to_string());
    header.extend(table.columns().iter().cloned());
    wtr.write_record(&header).map_err(csv_error)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.format(DATE_FORMAT).to_string());
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record).map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &ResultTable) -> Result<String, EtfError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| EtfError::Io(std::io::Error::other(e)))
}

fn csv_error(e: csv::Error) -> EtfError {
    EtfError::Io(std::io::Error::other(e))
}
