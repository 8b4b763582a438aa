/*!

This is the long-form manual for `survey_pipeline` and `crosstab`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, one line per respondent
* `xlsx` Excel workbooks, for example as exported by Microsoft Forms or Google Forms

### `csv`

One header line, then one line per respondent. The header row does not have to
be the first line of the file: pass `--header-row` (or `headerRowIndex` in the
configuration) when the export tool writes preamble lines above it. Short rows
are padded with empty cells.

### `xlsx`

The first worksheet is used unless `--excel-worksheet-name` (or
`excelWorksheetName`) names another one. Whole numeric cells are read as
integers, so a recommendation score stored as `9.0` parses the same as `9`.

## Columns

Seven fields are extracted from every row:

| field            | default header phrase        |
|------------------|------------------------------|
| `role`           | `role/department`            |
| `ethnicity`      | `ethnic identity`            |
| `disability`     | `disabili`                   |
| `fulfillment`    | `fulfilling and rewarding`   |
| `recommendation` | `recommend Homes First`      |
| `recognition`    | `acknowledged and recognized`|
| `growth`         | `potential for growth`       |

In the default `byName` mode, each phrase is matched case-insensitively as a
substring of the header row, and binding fails loudly when a phrase matches
zero or several headers. The `positional` mode skips the matching and takes
the first seven columns in the order of the table above, for exports with
unstable header wording.

## Normalization

Free-text answers are mapped to fixed categories by exact string lookup after
trimming. An answer outside the vocabulary never drops the row: it lands in
the `Unknown` category. Substring matching is deliberately not offered, a
sentence such as "I do not find the work extremely fulfilling" must not be
classified as `High` because it contains a keyword.

Recommendation scores must be whole numbers between 0 and 10. Anything else
(fractions, out-of-range values, free text) is treated as missing with a
warning; scores are never clamped.

Multi-select answers (ethnicity, disability) are split on `,` and `;` when
counting. A respondent who selected nothing is counted once under
`No response`.

## Configuration

The configuration is a JSON file:

```json
{
  "outputSettings": {
    "surveyName": "staff survey 2023",
    "outputDirectory": "out"
  },
  "source": {
    "filePath": "responses.xlsx",
    "provider": "xlsx",
    "excelWorksheetName": "Form responses",
    "headerRowIndex": 1,
    "columnMode": "byName",
    "columns": [
      { "field": "role", "phrase": "which team" }
    ]
  },
  "mappings": {
    "fulfillment": { "Love it": "High" },
    "roles": ["Team A", "Team B"]
  }
}
```

* `outputSettings.surveyName` is echoed in the summary output.
* `outputSettings.outputDirectory` (optional): when no `--out` is passed, the
  summary is written to `summary.json` inside this directory.
* `source.filePath` is resolved relative to the configuration file.
* `source.columns` (optional) overrides the header phrase of individual
  fields.
* `mappings.fulfillment`, `mappings.recognition` and `mappings.growth`
  (optional) add answer sentences to the built-in vocabulary. The values are
  the category labels (`High`, `Medium`, `Low`, `Yes`, `Somewhat`, `Rare`,
  `No (want more)`, `No (prefer not)`, `Some`, `Limited`, `Very limited`,
  `Not interested`). An unknown label aborts the run.
* `mappings.roles` (optional) replaces the known role vocabulary. A role
  outside the vocabulary is reported as `Other/Unknown`.

Command line flags override the `source` section, so the same configuration
works for ad-hoc runs against other exports of the same survey.

## Filters

`--role`, `--ethnicity` and `--disability` narrow the records before any
aggregation, and combine as a conjunction. For the multi-select fields the
filter matches when any selected token equals the filter value; respondents
who selected nothing match the value `No response`.

## Output

The summary is a single JSON document with the configuration echo, the KPI
block, the score statistics and histogram, one cross-tabulation per
(dimension, question) pair, the respondent mix and the correlation matrix.
Every percentage in a cross-tabulation is row-normalized: the categories of a
group sum to 100 within rounding. Rounding (one decimal for percentages and
means, three for correlations) happens only when writing the output, never
inside the pipeline.

`--export` additionally writes the normalized records as CSV, one row per
respondent, with both the raw text and the normalized category for each
question. This is the input a spreadsheet audit would start from.

`--reference` replays a previous summary and fails the run when the computed
summary differs, printing a line diff.

*/
