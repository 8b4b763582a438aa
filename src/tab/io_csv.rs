use std::path::Path;

use snafu::prelude::*;

use survey_pipeline::RawTable;

use crate::tab::{CsvLineParseSnafu, OpeningCsvSnafu, TabResult};

/// Reads a csv file into a raw table. `header_row` is 1-based: lines before
/// it are discarded, the line itself becomes the headers and every later
/// line a row. Short and long rows are accepted as is.
pub fn read_csv_table(path: &Path, header_row: usize) -> TabResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu {
            path: path.display().to_string(),
        })?;
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let lineno = idx + 1;
        let record = result.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if lineno < header_row {
            continue;
        } else if lineno == header_row {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_the_smoke_fixture() {
        let path = format!("{}/testdata/smoke_survey.csv", env!("CARGO_MANIFEST_DIR"));
        let table = read_csv_table(Path::new(&path), 1).unwrap();
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.rows.len(), 6);
    }

    #[test]
    fn header_row_skips_preamble_lines() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "exported 2023-06-01").unwrap();
        writeln!(f, "a,b").unwrap();
        writeln!(f, "1,2").unwrap();
        f.flush().unwrap();
        let table = read_csv_table(f.path(), 2).unwrap();
        assert_eq!(table.headers, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "a,b").unwrap();
        writeln!(f, "\"one, two\",3").unwrap();
        f.flush().unwrap();
        let table = read_csv_table(f.path(), 1).unwrap();
        assert_eq!(table.rows[0][0], "one, two");
    }

    #[test]
    fn missing_file_is_an_error() {
        let res = read_csv_table(Path::new("/nonexistent/survey.csv"), 1);
        assert!(res.is_err());
    }
}
