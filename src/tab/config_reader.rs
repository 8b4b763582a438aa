//! Serialization and deserialization of the survey configuration and of the
//! summary output.

use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use survey_pipeline::*;

use crate::tab::{OpeningJsonSnafu, ParsingJsonSnafu, TabError, TabResult};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    pub survey_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

/// One header phrase override. `field` is the canonical field name (`role`,
/// `ethnicity`, ...) and `phrase` the substring to look for in the headers.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSetting {
    pub field: String,
    pub phrase: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SourceSettings {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excel_worksheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_row_index: Option<usize>,
    /// `byName` (the default) or `positional`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnSetting>>,
}

/// Answer-sentence overrides, keyed by the raw sentence, valued by a category
/// label such as `High` or `No (want more)`. Entries add to the built-in
/// vocabulary, they do not replace it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MappingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<HashMap<String, String>>,
    /// Replaces the known role vocabulary when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SurveyConfig {
    pub output_settings: OutputSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings: Option<MappingSettings>,
}

/// The configuration echoed at the top of the summary output.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub survey: String,
    pub input: String,
    pub role: Option<String>,
    pub ethnicity: Option<String>,
    pub disability: Option<String>,
}

pub fn read_config(path: &str) -> TabResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> TabResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// The column specs to bind against the headers: the defaults, with any
/// phrase overridden by the configuration.
pub fn column_specs(config: &Option<SurveyConfig>) -> TabResult<Vec<ColumnSpec>> {
    let mut specs = default_specs();
    let settings = match config
        .as_ref()
        .and_then(|c| c.source.as_ref())
        .and_then(|s| s.columns.as_ref())
    {
        Some(cols) => cols,
        None => return Ok(specs),
    };
    for setting in settings.iter() {
        let field = match Field::from_name(&setting.field) {
            Some(f) => f,
            None => whatever!("unknown field name {:?} in the columns settings", setting.field),
        };
        if let Some(spec) = specs.iter_mut().find(|s| s.field == field) {
            spec.phrase = setting.phrase.clone();
        }
    }
    Ok(specs)
}

/// The category maps to normalize with: the built-in vocabulary, extended by
/// the configuration overrides.
pub fn build_mappings(config: &Option<SurveyConfig>) -> TabResult<SurveyMappings> {
    let mut mappings = SurveyMappings::defaults();
    let settings = match config.as_ref().and_then(|c| c.mappings.as_ref()) {
        Some(m) => m,
        None => return Ok(mappings),
    };
    if let Some(table) = &settings.fulfillment {
        for (sentence, label) in table.iter() {
            let category = parse_label(Fulfillment::from_label(label), "fulfillment", label)?;
            mappings.fulfillment.insert(sentence, category);
        }
    }
    if let Some(table) = &settings.recognition {
        for (sentence, label) in table.iter() {
            let category = parse_label(Recognition::from_label(label), "recognition", label)?;
            mappings.recognition.insert(sentence, category);
        }
    }
    if let Some(table) = &settings.growth {
        for (sentence, label) in table.iter() {
            let category = parse_label(Growth::from_label(label), "growth", label)?;
            mappings.growth.insert(sentence, category);
        }
    }
    if let Some(roles) = &settings.roles {
        mappings.roles = roles.clone();
    }
    Ok(mappings)
}

fn parse_label<C>(parsed: Option<C>, question: &str, label: &str) -> TabResult<C> {
    parsed.ok_or_else(|| TabError::UnknownCategoryLabel {
        question: question.to_string(),
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = r#"
{
  "outputSettings": {
    "surveyName": "staff survey 2023",
    "outputDirectory": "out"
  },
  "source": {
    "filePath": "responses.xlsx",
    "provider": "xlsx",
    "excelWorksheetName": "Form responses",
    "headerRowIndex": 2,
    "columns": [
      { "field": "role", "phrase": "which team" }
    ]
  },
  "mappings": {
    "fulfillment": {
      "Love it": "High"
    },
    "roles": ["Team A", "Team B"]
  }
}
"#;

    #[test]
    fn parse_full_config() {
        let config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        assert_eq!(config.output_settings.survey_name, "staff survey 2023");
        let source = config.source.as_ref().unwrap();
        assert_eq!(source.provider.as_deref(), Some("xlsx"));
        assert_eq!(source.header_row_index, Some(2));
        assert_eq!(source.columns.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn column_phrase_override() {
        let config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        let specs = column_specs(&Some(config)).unwrap();
        let role = specs.iter().find(|s| s.field == Field::Role).unwrap();
        assert_eq!(role.phrase, "which team");
        // The other fields keep their default phrase.
        let growth = specs.iter().find(|s| s.field == Field::Growth).unwrap();
        assert_eq!(growth.phrase, Field::Growth.default_phrase());
    }

    #[test]
    fn mapping_overrides_extend_the_defaults() {
        let config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        let mappings = build_mappings(&Some(config)).unwrap();
        assert_eq!(mappings.fulfillment.normalize("Love it"), Fulfillment::High);
        // The built-in sentences are still there.
        assert_eq!(
            mappings.fulfillment.normalize("Moderately"),
            Fulfillment::Medium
        );
        assert_eq!(mappings.validate_role("team a"), "Team A");
        assert_eq!(mappings.validate_role("Coordinator"), OTHER_ROLE);
    }

    #[test]
    fn unknown_category_label_is_rejected() {
        let mut config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        config
            .mappings
            .as_mut()
            .unwrap()
            .fulfillment
            .as_mut()
            .unwrap()
            .insert("Meh".to_string(), "Mediocre".to_string());
        let res = build_mappings(&Some(config));
        assert!(
            matches!(res, Err(TabError::UnknownCategoryLabel { .. })),
            "{:?}",
            res
        );
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let mut config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        config.source.as_mut().unwrap().columns = Some(vec![ColumnSetting {
            field: "favourite color".to_string(),
            phrase: "color".to_string(),
        }]);
        let res = column_specs(&Some(config));
        assert!(matches!(res, Err(TabError::Whatever { .. })), "{:?}", res);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config: SurveyConfig = serde_json::from_str(CONF).unwrap();
        let js = serde_json::to_string(&config).unwrap();
        let config2: SurveyConfig = serde_json::from_str(&js).unwrap();
        assert_eq!(
            config2.output_settings.survey_name,
            config.output_settings.survey_name
        );
    }
}
