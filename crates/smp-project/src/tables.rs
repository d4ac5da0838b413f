//! Line-oriented CSV tables: the edge list and the initial-probability matrix.
//!
//! Blank lines and lines starting with `#` are skipped in both tables. Any
//! other line that does not parse is an error carrying its 1-based line number.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("Failed to open table {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{}: expected {expected} rows, found {found}", .path.display())]
    RowCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// One `from,to,probability` row of the edge table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub from: usize,
    pub to: usize,
    pub probability: f64,
}

/// Data lines with their 1-based line numbers.
fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn read_table(path: &Path) -> TableResult<String> {
    std::fs::read_to_string(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_real(field: &str, what: &str) -> Result<f64, String> {
    let value: f64 = field
        .parse()
        .map_err(|_| format!("invalid {what} '{field}'"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite {what} '{field}'"))
    }
}

fn parse_state(field: &str, what: &str, states: usize) -> Result<usize, String> {
    let index: usize = field
        .parse()
        .map_err(|_| format!("invalid {what} index '{field}'"))?;
    if index < states {
        Ok(index)
    } else {
        Err(format!("{what} index {index} out of range for {states} states"))
    }
}

fn parse_edge_line(line: &str, states: usize) -> Result<EdgeRow, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(format!(
            "expected 3 fields (from,to,probability), found {}",
            fields.len()
        ));
    }
    Ok(EdgeRow {
        from: parse_state(fields[0], "from", states)?,
        to: parse_state(fields[1], "to", states)?,
        probability: parse_real(fields[2], "probability")?,
    })
}

/// Parse edge-table content; `source` is only used in error messages.
pub fn parse_edges(content: &str, source: &Path, states: usize) -> TableResult<Vec<EdgeRow>> {
    data_lines(content)
        .map(|(line_no, line)| {
            parse_edge_line(line, states).map_err(|reason| TableError::Malformed {
                path: source.to_path_buf(),
                line: line_no,
                reason,
            })
        })
        .collect()
}

pub fn load_edges(path: &Path, states: usize) -> TableResult<Vec<EdgeRow>> {
    parse_edges(&read_table(path)?, path, states)
}

/// Parse initial-matrix content into `states` rows of `states` values.
pub fn parse_initial(content: &str, source: &Path, states: usize) -> TableResult<Vec<Vec<f64>>> {
    let mut rows = Vec::with_capacity(states);
    for (line_no, line) in data_lines(content) {
        let malformed = |reason: String| TableError::Malformed {
            path: source.to_path_buf(),
            line: line_no,
            reason,
        };
        let row = line
            .split(',')
            .map(|field| parse_real(field.trim(), "probability"))
            .collect::<Result<Vec<f64>, String>>()
            .map_err(malformed)?;
        if row.len() != states {
            return Err(malformed(format!(
                "expected {states} columns, found {}",
                row.len()
            )));
        }
        rows.push(row);
    }
    if rows.len() != states {
        return Err(TableError::RowCount {
            path: source.to_path_buf(),
            expected: states,
            found: rows.len(),
        });
    }
    Ok(rows)
}

pub fn load_initial(path: &Path, states: usize) -> TableResult<Vec<Vec<f64>>> {
    parse_initial(&read_table(path)?, path, states)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src() -> &'static Path {
        Path::new("edges.csv")
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let with_noise = "# from,to,probability\n\n0,1,0.5\n  \n1,2,0.25\n";
        let plain = "0,1,0.5\n1,2,0.25\n";
        let a = parse_edges(with_noise, src(), 3).unwrap();
        let b = parse_edges(plain, src(), 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a[1],
            EdgeRow {
                from: 1,
                to: 2,
                probability: 0.25
            }
        );
    }

    #[test]
    fn whitespace_and_crlf_are_tolerated() {
        let rows = parse_edges(" 0 , 2 , 1.0 \r\n", src(), 3).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to, 2);
    }

    #[test]
    fn malformed_edge_reports_line() {
        let err = parse_edges("0,1,0.5\n\n1;2;0.5\n", src(), 3).unwrap_err();
        match err {
            TableError::Malformed { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("3 fields"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_indices_and_values() {
        assert!(parse_edges("0,3,0.5\n", src(), 3).is_err());
        assert!(parse_edges("-1,0,0.5\n", src(), 3).is_err());
        assert!(parse_edges("0,1,abc\n", src(), 3).is_err());
        assert!(parse_edges("0,1,NaN\n", src(), 3).is_err());
        let err = parse_edges("0,5,0.5\n", src(), 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "edges.csv:1: to index 5 out of range for 3 states"
        );
    }

    #[test]
    fn initial_matrix_parses_rows() {
        let rows = parse_initial("1,0\n\n0.25, 0.75\n", Path::new("init.csv"), 2).unwrap();
        assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.25, 0.75]]);
    }

    #[test]
    fn initial_matrix_shape_is_checked() {
        let path = Path::new("init.csv");
        assert!(matches!(
            parse_initial("1,0,0\n0,1,0\n", path, 2),
            Err(TableError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_initial("1,0\n", path, 2),
            Err(TableError::RowCount {
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(parse_initial("1,x\n0,1\n", path, 2).is_err());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let path = std::env::temp_dir().join("smp_tables_missing").join("nope.csv");
        let err = load_edges(&path, 2).unwrap_err();
        let message = err.to_string();
        match err {
            TableError::Open { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
                assert!(message.ends_with(&source.to_string()), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
