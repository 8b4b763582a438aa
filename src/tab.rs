use log::{info, warn};

use snafu::{prelude::*, Snafu};
use survey_pipeline::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tab::cache::TableCache;
use crate::tab::config_reader::*;
use crate::tab::io_common::simplify_file_name;

pub mod cache;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum TabError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no usable worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening csv file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Could not parse line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing json"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error reading metadata of {path}"))]
    ReadingMetadata {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing output {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing csv export {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Schema binding failed: {source}"))]
    Schema { source: SchemaError },
    #[snafu(display("Unknown category label {label:?} in the {question} mapping"))]
    UnknownCategoryLabel { question: String, label: String },
    #[snafu(display("Unknown input type {provider:?}"))]
    UnknownProvider { provider: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TabResult<T> = Result<T, TabError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum InputType {
    Csv,
    Xlsx,
}

fn parse_input_type(s: &str) -> TabResult<InputType> {
    match s {
        "csv" => Ok(InputType::Csv),
        "xlsx" | "xls" | "excel" => Ok(InputType::Xlsx),
        other => Err(TabError::UnknownProvider {
            provider: other.to_string(),
        }),
    }
}

fn resolve_input_type(
    args: &Args,
    source: Option<&SourceSettings>,
    input_path: &str,
) -> TabResult<InputType> {
    if let Some(s) = &args.input_type {
        return parse_input_type(s);
    }
    if let Some(provider) = source.and_then(|s| s.provider.as_deref()) {
        return parse_input_type(provider);
    }
    match io_common::infer_input_type(input_path) {
        Some(s) => parse_input_type(s),
        None => Err(TabError::UnknownProvider {
            provider: format!("(extension of {})", input_path),
        }),
    }
}

/// Loads the survey responses, normalizes them and writes the requested
/// outputs. This is the whole pipeline behind the command line interface.
pub fn run_analysis(args: &Args) -> TabResult<()> {
    let config: Option<SurveyConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    // Relative source paths resolve against the configuration file.
    let config_dir: Option<PathBuf> = args
        .config
        .as_ref()
        .and_then(|p| Path::new(p).parent().map(|d| d.to_path_buf()));

    let input_path: String = match (&args.input, &config) {
        (Some(p), _) => p.clone(),
        (None, Some(cfg)) => match &cfg.source {
            Some(src) => match &config_dir {
                Some(dir) => dir.join(&src.file_path).display().to_string(),
                None => src.file_path.clone(),
            },
            None => {
                whatever!("the configuration has no source section and no --input was provided")
            }
        },
        (None, None) => whatever!("no input file provided; use --input or --config"),
    };
    info!("run_analysis: reading survey responses from {:?}", input_path);

    let source = config.as_ref().and_then(|c| c.source.as_ref());
    let input_type = resolve_input_type(args, source, &input_path)?;
    let worksheet: Option<String> = args
        .excel_worksheet_name
        .clone()
        .or_else(|| source.and_then(|s| s.excel_worksheet_name.clone()));
    let header_row = args
        .header_row
        .or_else(|| source.and_then(|s| s.header_row_index))
        .unwrap_or(1);

    let mut tables = TableCache::new();
    let table: &RawTable = tables.load_with(Path::new(&input_path), |p| match input_type {
        InputType::Csv => io_csv::read_csv_table(p, header_row),
        InputType::Xlsx => io_xlsx::read_xlsx_table(p, worksheet.as_deref(), header_row),
    })?;

    let column_mode = source
        .and_then(|s| s.column_mode.as_deref())
        .unwrap_or("byName");
    let binding = match column_mode {
        "positional" => bind_positional(table.headers.len()),
        "byName" => bind_columns(&table.headers, &column_specs(&config)?),
        other => whatever!("unknown column mode {:?}", other),
    }
    .context(SchemaSnafu {})?;

    let file_label = simplify_file_name(&input_path);
    let records = extract_records(table, &binding, &file_label);
    let mappings = build_mappings(&config)?;
    let normalized = normalize_records(&records, &mappings);
    let loaded = normalized.len();

    let filter = Filter {
        role: args.role.clone(),
        ethnicity: args.ethnicity.clone(),
        disability: args.disability.clone(),
    };
    let filtered = if filter.is_empty() {
        normalized
    } else {
        filter.apply(&normalized)
    };
    info!(
        "run_analysis: {} records after filtering ({} loaded)",
        filtered.len(),
        loaded
    );

    let analysis = run_survey_stats(&filtered, &StatsOptions::default());

    // Assemble the final json
    let summary_js = build_summary_js(&config, &file_label, &filter, &analysis);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    let out_target: Option<String> = args.out.clone().or_else(|| {
        config
            .as_ref()
            .and_then(|c| c.output_settings.output_directory.as_ref())
            .map(|dir| Path::new(dir).join("summary.json").display().to_string())
    });
    match out_target.as_deref() {
        None | Some("") | Some("stdout") => println!("{}", pretty_js),
        Some(path) => {
            fs::write(path, &pretty_js).context(WritingOutputSnafu { path })?;
            info!("run_analysis: summary written to {:?}", path);
        }
    }

    if let Some(path) = &args.export {
        write_normalized_csv(path, &filtered)?;
        info!("run_analysis: normalized records exported to {:?}", path);
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between computed summary and reference summary");
        }
    }

    Ok(())
}

// Percentages and means are rounded at the output boundary only.
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn opt_to_json(x: &Option<f64>) -> JSValue {
    match x {
        Some(v) => json!(round1(*v)),
        None => JSValue::Null,
    }
}

fn kpis_to_json(k: &KpiSummary) -> JSValue {
    json!({
        "totalResponses": k.total_responses,
        "avgRecommendation": opt_to_json(&k.avg_recommendation),
        "nps": opt_to_json(&k.nps),
        "pctHighFulfillment": opt_to_json(&k.pct_high_fulfillment),
    })
}

fn scores_to_json(s: &ScalarSummary) -> JSValue {
    json!({
        "count": s.count,
        "mean": opt_to_json(&s.mean),
        "nps": opt_to_json(&s.nps),
        "promoters": s.promoters,
        "detractors": s.detractors,
    })
}

fn histogram_to_json(histogram: &[(u8, u64)]) -> JSValue {
    let entries: Vec<JSValue> = histogram
        .iter()
        .map(|(score, count)| json!({"score": score, "count": count}))
        .collect();
    json!(entries)
}

fn distribution_to_json(d: &AggregationResult) -> JSValue {
    let mut groups: JSMap<String, JSValue> = JSMap::new();
    for group in d.groups() {
        let mut cats: JSMap<String, JSValue> = JSMap::new();
        for cell in d.group_cells(group) {
            cats.insert(
                cell.category.clone(),
                json!({"count": cell.count, "percent": round1(cell.percentage)}),
            );
        }
        groups.insert(group.to_string(), JSValue::Object(cats));
    }
    json!({"dimension": d.dimension, "question": d.question, "groups": groups})
}

fn mix_to_json(mix: &[(Dimension, Vec<(String, u64)>)]) -> JSValue {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    for (dimension, counts) in mix.iter() {
        let groups: Vec<JSValue> = counts
            .iter()
            .map(|(group, count)| json!({"group": group, "count": count}))
            .collect();
        res.insert(dimension.label().to_string(), json!(groups));
    }
    JSValue::Object(res)
}

fn correlation_to_json(m: &Option<CorrelationMatrix>) -> JSValue {
    match m {
        None => JSValue::Null,
        Some(m) => {
            let values: Vec<Vec<JSValue>> = m
                .values
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| match v {
                            Some(x) => json!((x * 1000.0).round() / 1000.0),
                            None => JSValue::Null,
                        })
                        .collect()
                })
                .collect();
            json!({"labels": m.labels, "values": values})
        }
    }
}

fn build_summary_js(
    config: &Option<SurveyConfig>,
    input_file: &str,
    filter: &Filter,
    analysis: &SurveyAnalysis,
) -> JSValue {
    let c = OutputConfig {
        survey: config
            .as_ref()
            .map(|cfg| cfg.output_settings.survey_name.clone())
            .unwrap_or_else(|| "survey".to_string()),
        input: input_file.to_string(),
        role: filter.role.clone(),
        ethnicity: filter.ethnicity.clone(),
        disability: filter.disability.clone(),
    };
    json!({
        "config": c,
        "kpis": kpis_to_json(&analysis.kpis),
        "scores": scores_to_json(&analysis.scores),
        "histogram": histogram_to_json(&analysis.histogram),
        "distributions": analysis.distributions.iter().map(distribution_to_json).collect::<Vec<JSValue>>(),
        "respondentMix": mix_to_json(&analysis.respondent_mix),
        "correlation": correlation_to_json(&analysis.correlation),
    })
}

fn write_normalized_csv(path: &str, records: &[NormalizedRecord]) -> TabResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path })?;
    wtr.write_record([
        "id",
        "role",
        "role_raw",
        "ethnicity",
        "disability",
        "fulfillment_text",
        "fulfillment",
        "recognition_text",
        "recognition",
        "growth_text",
        "growth",
        "recommendation_score",
        "score_band",
    ])
    .context(WritingCsvSnafu { path })?;
    for r in records.iter() {
        let score = r
            .recommendation_score
            .map(|s| s.to_string())
            .unwrap_or_default();
        let band = r.score_band.map(|b| b.label()).unwrap_or("");
        wtr.write_record([
            r.id.as_str(),
            r.role.as_str(),
            r.role_raw.as_str(),
            r.ethnicity_raw.as_str(),
            r.disability_raw.as_str(),
            r.fulfillment_text.as_str(),
            r.fulfillment.label(),
            r.recognition_text.as_str(),
            r.recognition.label(),
            r.growth_text.as_str(),
            r.growth.label(),
            score.as_str(),
            band,
        ])
        .context(WritingCsvSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(())
}
