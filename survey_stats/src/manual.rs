/*!

This is the long-form manual for `survey_stats` and `surveydash`.

## Input formats

The following formats are supported:
* `xlsx` Excel workbooks, as exported or synchronised by Microsoft Forms
* `csv` Comma Separated Values, as exported by Google Forms

### `xlsx`

The responses worksheet of Microsoft Forms: one row per response, the first row
holds the labels of the questions.

|    | ID | Start time | ... | Faixa Etária | Modo de trabalho  | Produtividade |
|----|----|------------|-----|--------------|-------------------|---------------|
| 2  | 1  | 10/2/24    | ... | 18-24 anos   | Híbrido           | 4             |
| 3  | 2  | 10/2/24    | ... | 25-34 anos   | Totalmente remoto | 5             |

If the workbook contains several worksheets, the name of the worksheet should be
provided. Otherwise the first worksheet is used.

### `csv`

Same layout as `xlsx`. No header is assumed: it is detected per column.

## Columns

A column is referenced either by its letter (`G`, `AB`), by its number starting
at 1 (`7`), or by the label in its first row (`Faixa Etária`). A short uppercase
reference such as `ID` is looked up in the first row before being read as letters.

Only the rows before the first completely empty row are read. Empty cells are
ignored. The first cell of a column is treated as the header and dropped when it
is some text that contains none of the header tokens of the field. By default
the header tokens are the categories of the field, lowercased.

## Fields

Each field has a kind:
* `categorical`: the answer must be exactly one of the categories (same case,
 same accents, no extra whitespace). Any other answer is counted as `Other`.
* `integer`: the answer is converted to an integer first. Numbers are truncated
 and text is parsed. Answers that cannot be converted are dropped and counted
 in `skippedCells`. Integers that are not one of the categories are counted as
 `Other`.

The distribution lists the categories in the order of the configuration, then
the answers that are not part of it (`Other`). Categories without any answer
are not listed.

### Weighted mean

If `midpoints` is provided, the weighted mean of the field is computed: every
answer counts for the midpoint of its category. Categories that do not have a
midpoint (including `Other`) are left out of the mean altogether and listed in
`excludedFromMean`; they do not pull the mean towards zero.

The built-in age brackets use the middle of each bracket, with 16 for
`Menos de 18 anos` and 70 for `65 anos ou mais`.

## Configuration

```text
{
  "outputSettings": { "surveyName": "Trabalho remoto", "outputPath": "summary.json" },
  "source": { "provider": "xlsx", "filePath": "planilha.xlsx" },
  "fields": [
    {
      "name": "Faixa Etária",
      "column": "G",
      "kind": "categorical",
      "categories": ["18-24 anos", "25-34 anos"],
      "headerTokens": ["ano", "18-"],
      "midpoints": { "18-24 anos": 21.0, "25-34 anos": 29.5 }
    }
  ]
}
```

Options for `source`:
 - `provider` (string): `xlsx` or `csv`
 - `filePath` (string): the local snapshot, relative to the configuration file
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of the worksheet
 - `remotePath` (string, optional): the location of the workbook in the document
   library. When provided, the snapshot is refreshed before the analysis.

Options for `outputSettings`:
 - `surveyName` (string): copied into the summary
 - `outputPath` (string, optional): where to write the summary, or `stdout`

Without a configuration file, the built-in survey is used: age brackets in column
`G`, work mode in column `H`, productivity (1 to 5) in column `I`.

## Output

The summary is a JSON document, in the order of the fields:

```text
{
  "config": { "survey": "Trabalho remoto", "source": "planilha.xlsx" },
  "results": [
    {
      "field": "Faixa Etária",
      "column": "G",
      "totalObservations": 3,
      "skippedCells": 0,
      "headerDropped": true,
      "distribution": [
        { "category": "18-24 anos", "count": 2, "percentage": "66.7%" },
        { "category": "25-34 anos", "count": 1, "percentage": "33.3%" }
      ],
      "mode": "18-24 anos",
      "modeCount": 2,
      "modePercentage": "66.7%",
      "weightedMean": 23.833
    }
  ]
}
```

A field without any usable answer is reported as `"noData": true`.

 */
