// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Sentinel category for free text that does not match any known survey answer.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel group for respondents whose multi-select field is empty.
///
/// A respondent with no ethnicity (or disability) selection still contributes
/// one exploded row carrying this label, so that group-wise aggregates keep
/// accounting for every respondent.
pub const NO_RESPONSE: &str = "No response";

/// Fallback label for roles outside the known role vocabulary.
pub const OTHER_ROLE: &str = "Other/Unknown";

/// A raw tabular file, as produced by the file readers: one header row and
/// zero or more data rows. Values are untouched cell contents.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One row per respondent, with the raw answer text still attached.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyRecord {
    /// Identifier assigned by the loader, `<file label>-<lineno>`.
    pub id: String,
    pub role: String,
    /// Delimiter-separated list of self-identified categories.
    pub ethnicity_raw: String,
    /// Delimiter-separated list, or a single descriptive sentence.
    pub disability_raw: String,
    pub fulfillment_text: String,
    pub recognition_text: String,
    pub growth_text: String,
    /// NPS-style rating in [0, 10]. Out-of-range or non-numeric input is
    /// treated as missing, never clamped.
    pub recommendation_score: Option<u8>,
}

// ********* Category vocabularies ***********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Fulfillment {
    High,
    Medium,
    Low,
    Unknown,
}

impl Fulfillment {
    pub const ALL: [Fulfillment; 4] = [
        Fulfillment::High,
        Fulfillment::Medium,
        Fulfillment::Low,
        Fulfillment::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Fulfillment::High => "High",
            Fulfillment::Medium => "Medium",
            Fulfillment::Low => "Low",
            Fulfillment::Unknown => UNKNOWN,
        }
    }

    /// Ordinal encoding used for correlation only. This is a separate table
    /// from the text mapping and must stay that way.
    pub fn ordinal(&self) -> Option<i64> {
        match self {
            Fulfillment::High => Some(3),
            Fulfillment::Medium => Some(2),
            Fulfillment::Low => Some(1),
            Fulfillment::Unknown => None,
        }
    }

    pub fn from_label(s: &str) -> Option<Fulfillment> {
        Fulfillment::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .copied()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Recognition {
    Yes,
    Somewhat,
    Rare,
    NoWantMore,
    NoPrefer,
    Unknown,
}

impl Recognition {
    pub const ALL: [Recognition; 6] = [
        Recognition::Yes,
        Recognition::Somewhat,
        Recognition::Rare,
        Recognition::NoWantMore,
        Recognition::NoPrefer,
        Recognition::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Recognition::Yes => "Yes",
            Recognition::Somewhat => "Somewhat",
            Recognition::Rare => "Rare",
            Recognition::NoWantMore => "No (want more)",
            Recognition::NoPrefer => "No (prefer not)",
            Recognition::Unknown => UNKNOWN,
        }
    }

    pub fn ordinal(&self) -> Option<i64> {
        match self {
            Recognition::Yes => Some(4),
            Recognition::Somewhat => Some(3),
            Recognition::Rare => Some(2),
            Recognition::NoWantMore => Some(1),
            Recognition::NoPrefer => Some(0),
            Recognition::Unknown => None,
        }
    }

    pub fn from_label(s: &str) -> Option<Recognition> {
        Recognition::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .copied()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Growth {
    Yes,
    Some,
    Limited,
    VeryLimited,
    NotInterested,
    Unknown,
}

impl Growth {
    pub const ALL: [Growth; 6] = [
        Growth::Yes,
        Growth::Some,
        Growth::Limited,
        Growth::VeryLimited,
        Growth::NotInterested,
        Growth::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Growth::Yes => "Yes",
            Growth::Some => "Some",
            Growth::Limited => "Limited",
            Growth::VeryLimited => "Very limited",
            Growth::NotInterested => "Not interested",
            Growth::Unknown => UNKNOWN,
        }
    }

    pub fn ordinal(&self) -> Option<i64> {
        match self {
            Growth::Yes => Some(4),
            Growth::Some => Some(3),
            Growth::Limited => Some(2),
            Growth::VeryLimited => Some(1),
            Growth::NotInterested => Some(0),
            Growth::Unknown => None,
        }
    }

    pub fn from_label(s: &str) -> Option<Growth> {
        Growth::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .copied()
    }
}

/// Bands of the 0-10 recommendation score. Undefined when the score is
/// missing, which is why normalized records carry an `Option<ScoreBand>`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ScoreBand {
    Detractor0To3,
    Detractor4To6,
    Passive7To8,
    Promoter9To10,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 4] = [
        ScoreBand::Detractor0To3,
        ScoreBand::Detractor4To6,
        ScoreBand::Passive7To8,
        ScoreBand::Promoter9To10,
    ];

    pub fn from_score(score: u8) -> ScoreBand {
        match score {
            0..=3 => ScoreBand::Detractor0To3,
            4..=6 => ScoreBand::Detractor4To6,
            7..=8 => ScoreBand::Passive7To8,
            _ => ScoreBand::Promoter9To10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Detractor0To3 => "0-3",
            ScoreBand::Detractor4To6 => "4-6",
            ScoreBand::Passive7To8 => "7-8",
            ScoreBand::Promoter9To10 => "9-10",
        }
    }
}

/// A survey record together with its derived categorical fields.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NormalizedRecord {
    pub id: String,
    /// Raw role text, as found in the source table.
    pub role_raw: String,
    /// Role validated against the known vocabulary, or [OTHER_ROLE].
    pub role: String,
    pub ethnicity_raw: String,
    pub disability_raw: String,
    pub fulfillment_text: String,
    pub recognition_text: String,
    pub growth_text: String,
    pub recommendation_score: Option<u8>,
    pub fulfillment: Fulfillment,
    pub recognition: Recognition,
    pub growth: Growth,
    pub score_band: Option<ScoreBand>,
}

/// One row per (respondent x selected value) of a multi-select field.
///
/// The number of exploded rows is not the number of respondents and must
/// never be reported as total responses.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExplodedRecord<'a> {
    pub value: String,
    pub record: &'a NormalizedRecord,
}

// ********* Aggregation dimensions ***********

/// Grouping dimensions for cross-tabulations. Ethnicity and disability are
/// multi-select fields and are exploded before grouping.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Dimension {
    Role,
    Ethnicity,
    Disability,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Role, Dimension::Ethnicity, Dimension::Disability];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Role => "Role",
            Dimension::Ethnicity => "Ethnicity",
            Dimension::Disability => "Disability",
        }
    }
}

/// The multi-select fields that can be exploded.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MultiField {
    Ethnicity,
    Disability,
}

/// Survey questions that produce a categorical answer per respondent.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Question {
    Fulfillment,
    Recognition,
    Growth,
    ScoreBand,
}

impl Question {
    pub const ALL: [Question; 4] = [
        Question::Fulfillment,
        Question::Recognition,
        Question::Growth,
        Question::ScoreBand,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Question::Fulfillment => "Fulfillment",
            Question::Recognition => "Recognition",
            Question::Growth => "Growth",
            Question::ScoreBand => "ScoreBand",
        }
    }

    /// The fixed vocabulary of this question, in display order.
    pub fn categories(&self) -> Vec<&'static str> {
        match self {
            Question::Fulfillment => Fulfillment::ALL.iter().map(|c| c.label()).collect(),
            Question::Recognition => Recognition::ALL.iter().map(|c| c.label()).collect(),
            Question::Growth => Growth::ALL.iter().map(|c| c.label()).collect(),
            Question::ScoreBand => ScoreBand::ALL.iter().map(|c| c.label()).collect(),
        }
    }
}

// ******** Output data structures *********

/// One cell of a row-normalized cross-tabulation.
#[derive(PartialEq, Debug, Clone)]
pub struct DistributionCell {
    pub group: String,
    pub category: String,
    pub count: u64,
    /// Share of the group, in percent. Within a group the percentages sum
    /// to 100 up to floating-point rounding.
    pub percentage: f64,
}

/// A row-normalized cross-tabulation for one (dimension, question) pair.
///
/// Groups appear in alphabetical order, categories in vocabulary order.
/// Groups with zero rows are omitted entirely.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregationResult {
    pub dimension: String,
    pub question: String,
    pub cells: Vec<DistributionCell>,
}

impl AggregationResult {
    /// The distinct groups, in output order.
    pub fn groups(&self) -> Vec<&str> {
        let mut res: Vec<&str> = Vec::new();
        for cell in self.cells.iter() {
            if res.last() != Some(&cell.group.as_str()) {
                res.push(cell.group.as_str());
            }
        }
        res
    }

    pub fn group_cells(&self, group: &str) -> Vec<&DistributionCell> {
        self.cells.iter().filter(|c| c.group == group).collect()
    }
}

/// Summary statistics over the recommendation scores that are present.
#[derive(PartialEq, Debug, Clone)]
pub struct ScalarSummary {
    /// Number of records with a present score.
    pub count: u64,
    pub mean: Option<f64>,
    /// Net promoter score in [-100, 100], `None` when no score is present.
    pub nps: Option<f64>,
    pub promoters: u64,
    pub detractors: u64,
}

/// The KPI block consumed by the presentation layer.
#[derive(PartialEq, Debug, Clone)]
pub struct KpiSummary {
    pub total_responses: u64,
    pub avg_recommendation: Option<f64>,
    pub nps: Option<f64>,
    /// Share of all respondents whose fulfillment category is High.
    pub pct_high_fulfillment: Option<f64>,
}

/// Pearson correlation over the ordinal-encoded question scores.
///
/// Symmetric by construction with a unit diagonal. Cells with zero variance
/// on either side are `None`, not NaN.
#[derive(PartialEq, Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Which (dimension x question) tables to compute.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StatsOptions {
    pub dimensions: Vec<Dimension>,
    pub questions: Vec<Question>,
}

impl Default for StatsOptions {
    fn default() -> StatsOptions {
        StatsOptions {
            dimensions: Dimension::ALL.to_vec(),
            questions: Question::ALL.to_vec(),
        }
    }
}

/// Everything the pipeline derives from one set of normalized records.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyAnalysis {
    pub kpis: KpiSummary,
    pub scores: ScalarSummary,
    /// Observed recommendation scores and their counts, ascending.
    pub histogram: Vec<(u8, u64)>,
    pub distributions: Vec<AggregationResult>,
    /// Respondent counts per group, one entry per requested dimension,
    /// descending by count. Counts over exploded rows for the multi-select
    /// dimensions.
    pub respondent_mix: Vec<(Dimension, Vec<(String, u64)>)>,
    pub correlation: Option<CorrelationMatrix>,
}

// ********* Errors **********

/// Schema binding failures. These are configuration mismatches: they are
/// fatal and surface immediately, the binder never guesses around them.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SchemaError {
    MissingColumn {
        phrase: String,
    },
    AmbiguousColumn {
        phrase: String,
        matches: Vec<String>,
    },
    TooFewColumns {
        expected: usize,
        actual: usize,
    },
}

impl Error for SchemaError {}

impl Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingColumn { phrase } => {
                write!(f, "no column matches the phrase {:?}", phrase)
            }
            SchemaError::AmbiguousColumn { phrase, matches } => {
                write!(
                    f,
                    "multiple columns match the phrase {:?}: {:?}",
                    phrase, matches
                )
            }
            SchemaError::TooFewColumns { expected, actual } => {
                write!(
                    f,
                    "positional binding needs {} columns, the table has {}",
                    expected, actual
                )
            }
        }
    }
}
