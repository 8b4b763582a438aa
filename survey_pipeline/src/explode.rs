//! Multi-value explode: one output row per selected value of a multi-select
//! field, all other fields shared with the source record.

use crate::model::*;

/// The delimiters observed in the source workbook.
pub const DEFAULT_DELIMITERS: [char; 2] = [',', ';'];

/// Splits `raw` on the delimiters, trims each token and drops empty ones.
pub(crate) fn split_tokens(raw: &str, delimiters: &[char]) -> Vec<String> {
    raw.split(|c: char| delimiters.contains(&c))
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

pub fn explode(records: &[NormalizedRecord], field: MultiField) -> Vec<ExplodedRecord<'_>> {
    explode_with(records, field, &DEFAULT_DELIMITERS)
}

/// Explodes `field` into one row per non-empty token. A record whose field
/// holds no token still emits a single [NO_RESPONSE] row: respondents do not
/// silently disappear from exploded aggregates.
pub fn explode_with<'a>(
    records: &'a [NormalizedRecord],
    field: MultiField,
    delimiters: &[char],
) -> Vec<ExplodedRecord<'a>> {
    let mut res: Vec<ExplodedRecord<'a>> = Vec::with_capacity(records.len());
    for record in records.iter() {
        let raw = match field {
            MultiField::Ethnicity => &record.ethnicity_raw,
            MultiField::Disability => &record.disability_raw,
        };
        let tokens = split_tokens(raw, delimiters);
        if tokens.is_empty() {
            res.push(ExplodedRecord {
                value: NO_RESPONSE.to_string(),
                record,
            });
        } else {
            for value in tokens {
                res.push(ExplodedRecord { value, record });
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_records, SurveyMappings};

    fn record(id: &str, ethnicity: &str, disability: &str) -> NormalizedRecord {
        let raw = SurveyRecord {
            id: id.to_string(),
            role: "Coordinator".to_string(),
            ethnicity_raw: ethnicity.to_string(),
            disability_raw: disability.to_string(),
            fulfillment_text: "".to_string(),
            recognition_text: "".to_string(),
            growth_text: "".to_string(),
            recommendation_score: None,
        };
        normalize_records(&[raw], &SurveyMappings::defaults())
            .pop()
            .unwrap()
    }

    #[test]
    fn comma_list_becomes_one_row_per_value() {
        let recs = vec![record("a", "Black, White", "")];
        let exploded = explode(&recs, MultiField::Ethnicity);
        assert_eq!(exploded.len(), 2);
        assert_eq!(exploded[0].value, "Black");
        assert_eq!(exploded[1].value, "White");
        // All other fields are shared with the source record.
        assert_eq!(exploded[0].record.id, "a");
        assert_eq!(exploded[1].record.id, "a");
    }

    #[test]
    fn mixed_delimiters_and_whitespace() {
        let recs = vec![record("a", " Black ;White,  Latino ", "")];
        let exploded = explode(&recs, MultiField::Ethnicity);
        let values: Vec<&str> = exploded.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["Black", "White", "Latino"]);
    }

    #[test]
    fn empty_field_emits_a_sentinel_row() {
        let recs = vec![record("a", "", " ; , "), record("b", "Asian", "ADHD")];
        let eth = explode(&recs, MultiField::Ethnicity);
        assert_eq!(eth.len(), 2);
        assert_eq!(eth[0].value, NO_RESPONSE);
        assert_eq!(eth[0].record.id, "a");
        let dis = explode(&recs, MultiField::Disability);
        // Delimiters-only content has no token, same sentinel.
        assert_eq!(dis[0].value, NO_RESPONSE);
        assert_eq!(dis[1].value, "ADHD");
    }

    #[test]
    fn explosion_preserves_respondents_and_token_totals() {
        let recs = vec![
            record("a", "Black, White", ""),
            record("b", "", ""),
            record("c", "Latino; Asian; Black", ""),
        ];
        let exploded = explode(&recs, MultiField::Ethnicity);
        // Token counts per respondent: 2 + 1 (sentinel) + 3.
        assert_eq!(exploded.len(), 6);
        let mut ids: Vec<&str> = exploded.iter().map(|e| e.record.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn custom_delimiters() {
        let recs = vec![record("a", "Black|White", "")];
        let exploded = explode_with(&recs, MultiField::Ethnicity, &['|']);
        assert_eq!(exploded.len(), 2);
        // The default delimiters do not split on pipes.
        let exploded = explode(&recs, MultiField::Ethnicity);
        assert_eq!(exploded.len(), 1);
        assert_eq!(exploded[0].value, "Black|White");
    }
}
