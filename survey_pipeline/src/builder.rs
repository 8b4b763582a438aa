pub use crate::model::RawTable;

/// A builder for assembling a raw table programmatically, mostly useful for
/// tests and for embedding the pipeline without a file loader.
///
/// ```
/// use survey_pipeline::TableBuilder;
///
/// let table = TableBuilder::new(&["role/department", "ethnic identity"])
///     .row(&["Coordinator", "Black, White"])
///     .row(&["Case Manager"])
///     .build();
/// assert_eq!(table.rows.len(), 2);
/// ```
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> TableBuilder {
        TableBuilder {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends one row. Short rows are allowed, the missing cells read as
    /// empty when the record extractor consumes the table.
    pub fn row(mut self, values: &[&str]) -> TableBuilder {
        self.rows
            .push(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn build(self) -> RawTable {
        RawTable {
            headers: self.headers,
            rows: self.rows,
        }
    }
}
