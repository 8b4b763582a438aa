/*!

# Quick start

`survey_pipeline` turns one raw survey table into normalized records and
aggregated statistics. The flow is strictly one way: raw table -> schema
binding -> survey records -> normalized records -> aggregates. Every stage is
a pure function of its input and a fixed mapping table, nothing is cached
between calls.

The example below builds a table programmatically; the `crosstab` command
line tool does the same from a CSV or Excel workbook.

```
use survey_pipeline::*;

let table = TableBuilder::new(&[
    "What is your role/department?",
    "What is your ethnic identity?",
    "Do you identify as having a disability?",
    "How fulfilling and rewarding do you find your work?",
    "How likely are you to recommend Homes First as a good place to work?",
    "Do you feel acknowledged and recognized for your contribution at work?",
    "Do you feel there is potential for growth at Homes First?",
])
.row(&[
    "Coordinator",
    "Black, White",
    "I do not identify as having a disability",
    "I find the work I do extremely fulfilling and rewarding",
    "9",
    "Yes, I feel acknowledged and recognized for my contribution",
    "Yes, I see potential for growth at Homes First",
])
.row(&[
    "Case Manager",
    "Latino",
    "ADHD",
    "I find the work I do somewhat fulfilling and rewarding",
    "7",
    "Rarely acknowledged or recognized",
    "Limited potential for growth",
])
.build();

// Bind the canonical fields against the header row, once. Zero or multiple
// matches for a phrase would be a configuration error here.
let binding = bind_columns(&table.headers, &default_specs())?;

let records = extract_records(&table, &binding, "quick-start");
let normalized = normalize_records(&records, &SurveyMappings::defaults());
let analysis = run_survey_stats(&normalized, &StatsOptions::default());

assert_eq!(analysis.kpis.total_responses, 2);
assert_eq!(analysis.scores.promoters, 1);
# Ok::<(), SchemaError>(())
```

Unmapped free text never aborts the run: it lands in the `Unknown` category
and the row stays. Only schema binding can fail, and it fails loudly.

To narrow the records before aggregating, use [crate::Filter]:

```
use survey_pipeline::*;

let filter = Filter {
    role: Some("Coordinator".to_string()),
    ..Filter::default()
};
let narrowed = filter.apply(&[]);
assert!(narrowed.is_empty());
```

*/
