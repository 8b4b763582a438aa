mod builder;
mod explode;
mod filter;
pub mod manual;
mod model;
mod normalize;
pub mod quick_start;
mod schema;

use std::collections::BTreeMap;

use log::info;

pub use crate::builder::TableBuilder;
pub use crate::explode::{explode, explode_with, DEFAULT_DELIMITERS};
pub use crate::filter::Filter;
pub use crate::model::*;
pub use crate::normalize::{normalize_records, CategoryMap, SurveyMappings};
pub use crate::schema::{
    bind_columns, bind_positional, default_specs, extract_records, ColumnSpec, Field, SchemaBinding,
};

/// Row-normalized cross-tabulation over (group, category) pairs.
///
/// Groups come out in alphabetical order. Within a group, categories follow
/// `category_order`, then any category outside that vocabulary in
/// alphabetical order. Only observed cells are emitted: a group with zero
/// rows does not appear at all.
pub fn distribution(
    pairs: &[(String, String)],
    dimension: &str,
    question: &str,
    category_order: &[&str],
) -> AggregationResult {
    let mut counts: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
    for (group, category) in pairs.iter() {
        *counts
            .entry(group.as_str())
            .or_default()
            .entry(category.as_str())
            .or_insert(0) += 1;
    }
    let mut cells: Vec<DistributionCell> = Vec::new();
    for (group, cats) in counts.iter() {
        let total: u64 = cats.values().sum();
        let mut ordered: Vec<&str> = Vec::new();
        for c in category_order.iter() {
            if cats.contains_key(c) {
                ordered.push(c);
            }
        }
        for c in cats.keys() {
            if !category_order.contains(c) {
                ordered.push(c);
            }
        }
        for category in ordered {
            let count = cats[category];
            cells.push(DistributionCell {
                group: group.to_string(),
                category: category.to_string(),
                count,
                percentage: count as f64 * 100.0 / total as f64,
            });
        }
    }
    AggregationResult {
        dimension: dimension.to_string(),
        question: question.to_string(),
        cells,
    }
}

fn question_label(record: &NormalizedRecord, question: Question) -> Option<String> {
    match question {
        Question::Fulfillment => Some(record.fulfillment.label().to_string()),
        Question::Recognition => Some(record.recognition.label().to_string()),
        Question::Growth => Some(record.growth.label().to_string()),
        // The band is undefined when the score is missing, such records do
        // not contribute a pair.
        Question::ScoreBand => record.score_band.map(|b| b.label().to_string()),
    }
}

/// Cross-tabulation of one question grouped by one dimension. The
/// multi-select dimensions are exploded first, so their group totals count
/// tokens, not respondents.
pub fn distribution_by(
    records: &[NormalizedRecord],
    dimension: Dimension,
    question: Question,
) -> AggregationResult {
    let pairs: Vec<(String, String)> = match dimension {
        Dimension::Role => records
            .iter()
            .filter_map(|r| question_label(r, question).map(|c| (r.role.clone(), c)))
            .collect(),
        Dimension::Ethnicity => explode(records, MultiField::Ethnicity)
            .iter()
            .filter_map(|e| question_label(e.record, question).map(|c| (e.value.clone(), c)))
            .collect(),
        Dimension::Disability => explode(records, MultiField::Disability)
            .iter()
            .filter_map(|e| question_label(e.record, question).map(|c| (e.value.clone(), c)))
            .collect(),
    };
    distribution(
        &pairs,
        dimension.label(),
        question.label(),
        &question.categories(),
    )
}

/// Mean, promoter/detractor counts and NPS over the scores that are present.
/// `mean` and `nps` are `None` on empty input, never a fabricated zero.
pub fn scalar_summary(records: &[NormalizedRecord]) -> ScalarSummary {
    let scores: Vec<u8> = records
        .iter()
        .filter_map(|r| r.recommendation_score)
        .collect();
    let count = scores.len() as u64;
    if count == 0 {
        return ScalarSummary {
            count: 0,
            mean: None,
            nps: None,
            promoters: 0,
            detractors: 0,
        };
    }
    let promoters = scores.iter().filter(|s| **s >= 9).count() as u64;
    let detractors = scores.iter().filter(|s| **s <= 6).count() as u64;
    let mean = scores.iter().map(|s| *s as f64).sum::<f64>() / count as f64;
    let nps = (promoters as f64 - detractors as f64) / count as f64 * 100.0;
    ScalarSummary {
        count,
        mean: Some(mean),
        nps: Some(nps),
        promoters,
        detractors,
    }
}

/// The KPI block of the dashboard header.
pub fn kpi_summary(records: &[NormalizedRecord]) -> KpiSummary {
    let total = records.len() as u64;
    let scores = scalar_summary(records);
    let pct_high_fulfillment = if total == 0 {
        None
    } else {
        let high = records
            .iter()
            .filter(|r| r.fulfillment == Fulfillment::High)
            .count();
        Some(high as f64 * 100.0 / total as f64)
    };
    KpiSummary {
        total_responses: total,
        avg_recommendation: scores.mean,
        nps: scores.nps,
        pct_high_fulfillment,
    }
}

/// Observed recommendation scores and their counts, ascending by score.
pub fn score_histogram(records: &[NormalizedRecord]) -> Vec<(u8, u64)> {
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    for r in records.iter() {
        if let Some(score) = r.recommendation_score {
            *counts.entry(score).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// Respondent counts by group, descending by count, ties alphabetical.
/// Multi-select dimensions count exploded tokens.
pub fn group_counts(records: &[NormalizedRecord], dimension: Dimension) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    match dimension {
        Dimension::Role => {
            for r in records.iter() {
                *counts.entry(r.role.clone()).or_insert(0) += 1;
            }
        }
        Dimension::Ethnicity => {
            for e in explode(records, MultiField::Ethnicity) {
                *counts.entry(e.value).or_insert(0) += 1;
            }
        }
        Dimension::Disability => {
            for e in explode(records, MultiField::Disability) {
                *counts.entry(e.value).or_insert(0) += 1;
            }
        }
    }
    let mut res: Vec<(String, u64)> = counts.into_iter().collect();
    res.sort_by(|(ga, ca), (gb, cb)| cb.cmp(ca).then_with(|| ga.cmp(gb)));
    res
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x) * (x - mean_x);
        var_y += (y - mean_y) * (y - mean_y);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Pearson correlation over the four ordinal-encoded question scores, using
/// the rows where all four values are present. `None` when fewer than two
/// complete rows exist. The upper triangle is computed once and mirrored, so
/// the matrix is symmetric by construction; the diagonal is exactly 1.0.
pub fn correlation_matrix(records: &[NormalizedRecord]) -> Option<CorrelationMatrix> {
    let rows: Vec<[f64; 4]> = records
        .iter()
        .filter_map(|r| {
            Some([
                r.fulfillment.ordinal()? as f64,
                r.recognition.ordinal()? as f64,
                r.growth.ordinal()? as f64,
                r.recommendation_score? as f64,
            ])
        })
        .collect();
    if rows.len() < 2 {
        return None;
    }
    let labels: Vec<String> = ["fulfillment", "recognition", "growth", "recommendation"]
        .iter()
        .map(|l| l.to_string())
        .collect();
    let n = labels.len();
    let mut values: Vec<Vec<Option<f64>>> = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let xs: Vec<f64> = rows.iter().map(|row| row[i]).collect();
            let ys: Vec<f64> = rows.iter().map(|row| row[j]).collect();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Some(CorrelationMatrix { labels, values })
}

/// Runs every aggregation over the given records.
///
/// This is the one-call orchestrator behind the CLI: KPI block, scalar
/// summary, score histogram, one cross-tabulation per requested
/// (dimension, question) pair, respondent mix and the correlation matrix.
/// It is infallible: empty input produces empty tables and `None` scalars.
pub fn run_survey_stats(records: &[NormalizedRecord], options: &StatsOptions) -> SurveyAnalysis {
    info!(
        "run_survey_stats: processing {} records, {} dimensions x {} questions",
        records.len(),
        options.dimensions.len(),
        options.questions.len()
    );
    let mut distributions: Vec<AggregationResult> = Vec::new();
    for dimension in options.dimensions.iter() {
        for question in options.questions.iter() {
            distributions.push(distribution_by(records, *dimension, *question));
        }
    }
    let respondent_mix: Vec<(Dimension, Vec<(String, u64)>)> = options
        .dimensions
        .iter()
        .map(|d| (*d, group_counts(records, *d)))
        .collect();
    SurveyAnalysis {
        kpis: kpi_summary(records),
        scores: scalar_summary(records),
        histogram: score_histogram(records),
        distributions,
        respondent_mix,
        correlation: correlation_matrix(records),
    }
}
