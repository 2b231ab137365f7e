use std::io::Write;

use anyhow::Result;
use extracto_core::TabularRecord;
use extracto_parse::{ParsedStatement, StatementRecords};
use tracing::debug;

pub fn write_json<W: Write>(statement: &ParsedStatement, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, statement)?;
    writeln!(out)?;
    Ok(())
}

/// One CSV table in the bank's own column layout. Totals are not part of it.
pub fn write_csv<W: Write>(statement: &ParsedStatement, out: W) -> Result<()> {
    match &statement.records {
        StatementRecords::Bbva(rows) => write_rows(rows, out),
        StatementRecords::Banbajio(rows) => write_rows(rows, out),
        StatementRecords::Banamex(rows) => write_rows(rows, out),
        StatementRecords::Banorte(rows) => write_rows(rows, out),
    }
}

fn write_rows<R: TabularRecord, W: Write>(rows: &[R], out: W) -> Result<()> {
    debug!(sheet = R::SHEET_NAME, rows = rows.len(), "writing csv");
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}
