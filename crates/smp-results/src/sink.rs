//! Output sinks for per-time-point result slices.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::types::{ResultRow, TimeSlice};
use crate::{ResultsError, ResultsResult};

pub const CSV_HEADER: &str = "Time,State_i,State_j,P_ij(t)";

/// Destination for result slices, written in ascending time order.
pub trait ResultSink {
    /// Write every row of one time point.
    fn write_slice(&mut self, slice: &TimeSlice) -> ResultsResult<()>;

    /// Flush buffered output.
    fn finish(&mut self) -> ResultsResult<()> {
        Ok(())
    }

    /// Rows written so far.
    fn rows_written(&self) -> usize;
}

/// Comma-separated sink with a `Time,State_i,State_j,P_ij(t)` header.
pub struct CsvSink<W: Write> {
    writer: W,
    rows_written: usize,
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`, creating parent directories.
    pub fn create(path: &Path) -> ResultsResult<Self> {
        let create_err = |source| ResultsError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_err)?;
        }
        let file = File::create(path).map_err(create_err)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(mut writer: W) -> ResultsResult<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn write_slice(&mut self, slice: &TimeSlice) -> ResultsResult<()> {
        for row in &slice.rows {
            writeln!(
                self.writer,
                "{},{},{},{}",
                row.time, row.from, row.to, row.probability
            )?;
        }
        self.rows_written += slice.rows.len();
        Ok(())
    }

    fn finish(&mut self) -> ResultsResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }
}

/// Keeps every row in memory; used by tests and library callers.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub slices: Vec<TimeSlice>,
}

impl MemorySink {
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.slices.iter().flat_map(|s| s.rows.iter())
    }
}

impl ResultSink for MemorySink {
    fn write_slice(&mut self, slice: &TimeSlice) -> ResultsResult<()> {
        self.slices.push(slice.clone());
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.slices.iter().map(|s| s.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(time: f64) -> TimeSlice {
        TimeSlice {
            time,
            rows: vec![
                ResultRow {
                    time,
                    from: 0,
                    to: 1,
                    probability: 0.25,
                },
                ResultRow {
                    time,
                    from: 2,
                    to: 0,
                    probability: 1.0,
                },
            ],
            dropped_non_positive: 4,
            unconverged: 0,
        }
    }

    #[test]
    fn csv_sink_writes_header_and_rows() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.write_slice(&slice(0.5)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.rows_written(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "Time,State_i,State_j,P_ij(t)\n0.5,0,1,0.25\n0.5,2,0,1\n"
        );
    }

    #[test]
    fn empty_slice_writes_nothing() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.write_slice(&TimeSlice::default()).unwrap();
        assert_eq!(sink.rows_written(), 0);
        assert_eq!(sink.into_inner(), format!("{CSV_HEADER}\n").into_bytes());
    }

    #[test]
    fn memory_sink_keeps_slices_in_order() {
        let mut sink = MemorySink::default();
        sink.write_slice(&slice(0.0)).unwrap();
        sink.write_slice(&slice(1.0)).unwrap();
        assert_eq!(sink.rows_written(), 4);
        let times: Vec<f64> = sink.rows().map(|r| r.time).collect();
        assert_eq!(times, vec![0.0, 0.0, 1.0, 1.0]);
    }
}
