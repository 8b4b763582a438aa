use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::prelude::*;

use survey_pipeline::RawTable;

use crate::tab::{EmptyExcelSnafu, OpeningExcelSnafu, TabResult};

/// Reads one worksheet of an xlsx workbook into a raw table. Defaults to the
/// first worksheet. `header_row` is 1-based, as in the excel user interface.
pub fn read_xlsx_table(
    path: &Path,
    worksheet: Option<&str>,
    header_row: usize,
) -> TabResult<RawTable> {
    let p = path.display().to_string();
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path: p.clone() })?;
    let range = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let range = match range {
        Some(r) => r.context(OpeningExcelSnafu { path: p })?,
        None => return EmptyExcelSnafu { path: p }.fail(),
    };
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in range.rows().enumerate() {
        let lineno = idx + 1;
        let cells: Vec<String> = row.iter().map(read_cell).collect();
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

// Excel stores the recommendation scores as floats. Whole floats print as
// integers so that "9.0" and "9" parse the same downstream.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::String(s) => s.clone(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => f.to_string(),
        DataType::Error(_) | DataType::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(read_cell(&DataType::Float(9.0)), "9");
        assert_eq!(read_cell(&DataType::Float(7.5)), "7.5");
        assert_eq!(read_cell(&DataType::Int(10)), "10");
    }

    #[test]
    fn empty_and_error_cells_are_blank() {
        assert_eq!(read_cell(&DataType::Empty), "");
        assert_eq!(
            read_cell(&DataType::Error(calamine::CellErrorType::Div0)),
            ""
        );
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(
            read_cell(&DataType::String("Case Manager".to_string())),
            "Case Manager"
        );
        assert_eq!(read_cell(&DataType::Bool(true)), "true");
    }
}
