//! CSV sample matrices
//!
//! Headerless, comma separated, one row per sample and one column per channel.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub fn read_matrix<R: Read>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV at row {}", line + 1))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().with_context(|| {
                    format!("Invalid number {:?} at row {}, column {}", field, line + 1, col + 1)
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn write_matrix<W: Write>(writer: W, data: &[Vec<f64>]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in data {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_matrix_file(path: &Path) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_matrix(BufReader::new(file)).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to `path`, or stdout when no path is given
pub fn write_matrix_to(path: Option<&Path>, data: &[Vec<f64>]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_matrix(BufWriter::new(file), data)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => write_matrix(io::stdout().lock(), data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_matrix() {
        let csv = "1,2.5,-3\n4, 5e-1 ,6\n";
        let data = read_matrix(Cursor::new(csv)).unwrap();
        assert_eq!(data, vec![vec![1.0, 2.5, -3.0], vec![4.0, 0.5, 6.0]]);
    }

    #[test]
    fn test_read_empty() {
        assert!(read_matrix(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_text() {
        let err = read_matrix(Cursor::new("1,2\n3,abc\n")).unwrap_err();
        assert!(format!("{:#}", err).contains("row 2, column 2"));
    }

    #[test]
    fn test_read_rejects_ragged_rows() {
        assert!(read_matrix(Cursor::new("1,2\n3\n")).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let data = vec![vec![0.1, -2.0], vec![1e-300, 150.25]];
        let mut buf = Vec::new();
        write_matrix(&mut buf, &data).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().next(), Some("0.1,-2"));
        assert_eq!(read_matrix(Cursor::new(buf)).unwrap(), data);
    }
}
