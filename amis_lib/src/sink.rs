//! Append-only CSV output.
//!
//! The file is opened, written and closed for every row. No handle is held
//! between rows, so an interrupted run leaves every row written so far on
//! disk. Rows from concurrent crawls are not coordinated: each row goes out
//! as one `write_all` on an append-mode handle, and nothing else orders them.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use amis_api::types::MarketRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::AmisError;

/// CSV output file with a fixed column projection.
#[derive(Clone, Debug)]
pub struct CsvSink {
    path: PathBuf,
    columns: Vec<String>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with a header row if it does not exist yet.
    ///
    /// An existing file is left untouched, whatever its header says. Returns
    /// whether the file was created.
    pub fn ensure_header(&self) -> Result<bool, AmisError> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let line = encode_row(self.columns.iter().map(String::as_str))?;
        file.write_all(&line)?;
        tracing::debug!("Created {} with header", self.path.display());
        Ok(true)
    }

    /// Appends one record, projected onto the configured columns.
    ///
    /// Records without a commodity are skipped and `Ok(false)` is returned.
    /// Unknown column names produce empty fields.
    pub fn append_record(&self, record: &MarketRecord) -> Result<bool, AmisError> {
        if !record.has_commodity() {
            return Ok(false);
        }
        let values = record.project(&self.columns);
        let line = encode_row(values.into_iter().map(|v| v.unwrap_or("")))?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(true)
    }
}

/// Encodes a single CSV row, terminator included.
fn encode_row<'a, I>(fields: I) -> Result<Vec<u8>, AmisError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    wtr.write_record(fields)?;
    wtr.into_inner().map_err(|e| AmisError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use amis_api::types::Column;

    fn record(commodity: Option<&str>) -> MarketRecord {
        MarketRecord {
            commodity: commodity.map(str::to_string),
            market: Some("Kongowea".into()),
            retail: Some("120.00".into()),
            ..MarketRecord::default()
        }
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::new(&path, Column::default_names());

        assert!(sink.ensure_header().unwrap());
        assert!(!sink.ensure_header().unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "commodity,classification,grade,market,wholesale,retail,supply_volume,county,date\r\n"
        );
    }

    #[test]
    fn existing_file_is_reused_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old,header\r\nx,y\r\n").unwrap();

        let sink = CsvSink::new(&path, vec!["commodity".into(), "market".into()]);
        assert!(!sink.ensure_header().unwrap());
        assert!(sink.append_record(&record(Some("Beans"))).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "old,header\r\nx,y\r\nBeans,Kongowea\r\n");
    }

    #[test]
    fn empty_commodity_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::new(&path, vec!["commodity".into()]);
        sink.ensure_header().unwrap();

        assert!(!sink.append_record(&record(None)).unwrap());
        assert!(!sink.append_record(&record(Some(""))).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "commodity\r\n");
    }

    #[test]
    fn projection_order_and_unknown_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::new(
            &path,
            vec![
                "retail".into(),
                "bogus".into(),
                " commodity".into(),
                "supply_volume".into(),
                "grade".into(),
            ],
        );
        sink.append_record(&record(Some("Beans"))).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "120.00,,Beans,N/A,\r\n");
    }

    #[test]
    fn fields_are_quoted_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::new(&path, vec!["commodity".into(), "market".into()]);
        let mut rec = record(Some("Maize, dry"));
        rec.market = Some("Say \"hi\"".into());
        sink.append_record(&rec).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"Maize, dry\",\"Say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn append_creates_missing_file_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.csv");
        let sink = CsvSink::new(&path, vec!["commodity".into()]);
        sink.append_record(&record(Some("Rice"))).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Rice\r\n");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("nope/out.csv"), vec!["commodity".into()]);
        assert!(matches!(sink.ensure_header(), Err(AmisError::Io(_))));
    }
}
