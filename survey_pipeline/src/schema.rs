//! Schema binding: resolving the canonical survey fields against the header
//! row of a raw table, once, at the start of a pipeline run.

use log::{debug, warn};

use crate::model::*;

/// The canonical fields of a survey record, in positional order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Field {
    Role,
    Ethnicity,
    Disability,
    Fulfillment,
    Recommendation,
    Recognition,
    Growth,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Role,
        Field::Ethnicity,
        Field::Disability,
        Field::Fulfillment,
        Field::Recommendation,
        Field::Recognition,
        Field::Growth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Role => "role",
            Field::Ethnicity => "ethnicity",
            Field::Disability => "disability",
            Field::Fulfillment => "fulfillment",
            Field::Recommendation => "recommendation",
            Field::Recognition => "recognition",
            Field::Growth => "growth",
        }
    }

    pub fn from_name(s: &str) -> Option<Field> {
        Field::ALL
            .iter()
            .find(|fld| fld.name().eq_ignore_ascii_case(s.trim()))
            .copied()
    }

    /// The phrase searched for in the header row when binding by name.
    pub fn default_phrase(&self) -> &'static str {
        match self {
            Field::Role => "role/department",
            Field::Ethnicity => "ethnic identity",
            Field::Disability => "disabili",
            Field::Fulfillment => "fulfilling and rewarding",
            Field::Recommendation => "recommend Homes First",
            Field::Recognition => "acknowledged and recognized",
            Field::Growth => "potential for growth",
        }
    }
}

/// A field together with the header phrase that identifies its column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnSpec {
    pub field: Field,
    pub phrase: String,
}

pub fn default_specs() -> Vec<ColumnSpec> {
    Field::ALL
        .iter()
        .map(|fld| ColumnSpec {
            field: *fld,
            phrase: fld.default_phrase().to_string(),
        })
        .collect()
}

/// The resolved column index of every canonical field.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SchemaBinding {
    cols: [usize; 7],
}

impl SchemaBinding {
    pub fn column(&self, field: Field) -> usize {
        let idx = Field::ALL
            .iter()
            .position(|fld| *fld == field)
            .expect("field is a member of Field::ALL");
        self.cols[idx]
    }
}

/// Binds every canonical field by case-insensitive substring search of its
/// phrase against the header row. Zero or multiple matches for a phrase are
/// a configuration error, not something to guess around.
///
/// `specs` may cover a subset of the fields, the default phrases apply to
/// the rest.
pub fn bind_columns(headers: &[String], specs: &[ColumnSpec]) -> Result<SchemaBinding, SchemaError> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut cols = [0usize; 7];
    for (idx, field) in Field::ALL.iter().enumerate() {
        let phrase: String = specs
            .iter()
            .find(|s| s.field == *field)
            .map(|s| s.phrase.clone())
            .unwrap_or_else(|| field.default_phrase().to_string());
        let needle = phrase.to_lowercase();
        let matches: Vec<usize> = lowered
            .iter()
            .enumerate()
            .filter_map(|(col, h)| if h.contains(&needle) { Some(col) } else { None })
            .collect();
        match matches.as_slice() {
            [col] => {
                debug!(
                    "bind_columns: field {:?} -> column {} ({:?})",
                    field, col, headers[*col]
                );
                cols[idx] = *col;
            }
            [] => {
                return Err(SchemaError::MissingColumn { phrase });
            }
            many => {
                return Err(SchemaError::AmbiguousColumn {
                    phrase,
                    matches: many.iter().map(|col| headers[*col].clone()).collect(),
                });
            }
        }
    }
    Ok(SchemaBinding { cols })
}

/// Binds the first seven columns to the canonical fields in order.
pub fn bind_positional(ncols: usize) -> Result<SchemaBinding, SchemaError> {
    let expected = Field::ALL.len();
    if ncols < expected {
        return Err(SchemaError::TooFewColumns {
            expected,
            actual: ncols,
        });
    }
    Ok(SchemaBinding {
        cols: [0, 1, 2, 3, 4, 5, 6],
    })
}

/// Copies the bound columns into survey records, values untouched except for
/// score parsing. Record ids follow the `<file label>-<lineno>` convention,
/// with line numbers continuing the source file (the header is line 1).
pub fn extract_records(
    table: &RawTable,
    binding: &SchemaBinding,
    file_label: &str,
) -> Vec<SurveyRecord> {
    let mut res: Vec<SurveyRecord> = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let lineno = idx + 2;
        let id = format!("{}-{:08}", file_label, lineno);
        let cell = |field: Field| -> String {
            row.get(binding.column(field)).cloned().unwrap_or_default()
        };
        let recommendation_score = parse_score(&cell(Field::Recommendation), &id);
        res.push(SurveyRecord {
            role: cell(Field::Role),
            ethnicity_raw: cell(Field::Ethnicity),
            disability_raw: cell(Field::Disability),
            fulfillment_text: cell(Field::Fulfillment),
            recognition_text: cell(Field::Recognition),
            growth_text: cell(Field::Growth),
            recommendation_score,
            id,
        });
    }
    res
}

/// An in-range integer, or missing. Out-of-range and non-numeric values are
/// logged and coerced to missing; clamping them would fabricate data.
fn parse_score(raw: &str, id: &str) -> Option<u8> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    match t.parse::<f64>() {
        Ok(x) if x.fract() == 0.0 && (0.0..=10.0).contains(&x) => Some(x as u8),
        Ok(x) => {
            warn!(
                "record {}: recommendation score {} is not an integer in [0, 10], treating as missing",
                id, x
            );
            None
        }
        Err(_) => {
            warn!(
                "record {}: recommendation score {:?} is not numeric, treating as missing",
                id, t
            );
            None
        }
    }
}
