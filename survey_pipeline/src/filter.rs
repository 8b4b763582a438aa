//! Respondent filters, the library-side counterpart of the dashboard's
//! sidebar selections.

use crate::explode::{split_tokens, DEFAULT_DELIMITERS};
use crate::model::*;

/// Filter selections over role, ethnicity and disability. An absent field is
/// no constraint. Ethnicity and disability match when any exploded token of
/// the record equals the selection, so a filter of [NO_RESPONSE] selects the
/// respondents with an empty field.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Filter {
    pub role: Option<String>,
    pub ethnicity: Option<String>,
    pub disability: Option<String>,
}

impl Filter {
    pub fn none() -> Filter {
        Filter::default()
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.ethnicity.is_none() && self.disability.is_none()
    }

    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        if let Some(role) = &self.role {
            if record.role != *role {
                return false;
            }
        }
        if let Some(sel) = &self.ethnicity {
            if !multi_field_matches(&record.ethnicity_raw, sel) {
                return false;
            }
        }
        if let Some(sel) = &self.disability {
            if !multi_field_matches(&record.disability_raw, sel) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[NormalizedRecord]) -> Vec<NormalizedRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

fn multi_field_matches(raw: &str, selection: &str) -> bool {
    let tokens = split_tokens(raw, &DEFAULT_DELIMITERS);
    if tokens.is_empty() {
        return selection == NO_RESPONSE;
    }
    tokens.iter().any(|t| t == selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_records, SurveyMappings};

    fn records() -> Vec<NormalizedRecord> {
        let raw = vec![
            SurveyRecord {
                id: "a".to_string(),
                role: "Coordinator".to_string(),
                ethnicity_raw: "Black, White".to_string(),
                disability_raw: "".to_string(),
                fulfillment_text: "".to_string(),
                recognition_text: "".to_string(),
                growth_text: "".to_string(),
                recommendation_score: Some(9),
            },
            SurveyRecord {
                id: "b".to_string(),
                role: "Case Manager".to_string(),
                ethnicity_raw: "White".to_string(),
                disability_raw: "ADHD".to_string(),
                fulfillment_text: "".to_string(),
                recognition_text: "".to_string(),
                growth_text: "".to_string(),
                recommendation_score: Some(4),
            },
        ];
        normalize_records(&raw, &SurveyMappings::defaults())
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let recs = records();
        assert_eq!(Filter::none().apply(&recs), recs);
    }

    #[test]
    fn role_filter_matches_validated_role() {
        let recs = records();
        let f = Filter {
            role: Some("Coordinator".to_string()),
            ..Filter::default()
        };
        let out = f.apply(&recs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn multi_select_filter_matches_any_token() {
        let recs = records();
        let f = Filter {
            ethnicity: Some("White".to_string()),
            ..Filter::default()
        };
        assert_eq!(f.apply(&recs).len(), 2);
        let f = Filter {
            ethnicity: Some("Black".to_string()),
            ..Filter::default()
        };
        assert_eq!(f.apply(&recs).len(), 1);
    }

    #[test]
    fn no_response_selects_empty_fields() {
        let recs = records();
        let f = Filter {
            disability: Some(NO_RESPONSE.to_string()),
            ..Filter::default()
        };
        let out = f.apply(&recs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn filters_combine_conjunctively() {
        let recs = records();
        let f = Filter {
            role: Some("Case Manager".to_string()),
            ethnicity: Some("White".to_string()),
            disability: Some("ADHD".to_string()),
        };
        assert_eq!(f.apply(&recs).len(), 1);
        let f = Filter {
            role: Some("Case Manager".to_string()),
            ethnicity: Some("Black".to_string()),
            ..Filter::default()
        };
        assert!(f.apply(&recs).is_empty());
    }
}
