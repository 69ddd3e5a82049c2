use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Metric, Record, TechDataset};

const COUNTRY: &str = "Country";
const YEAR: &str = "Year";
const TECH_SECTOR: &str = "Tech Sector";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the record store from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row `Country, Year, Tech Sector, <metric labels…>`
/// * `.json`    – `[{ "Country": "China", "Year": 2020, ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<TechDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = TechDataset::from_records(records);
    if let Some((first, last)) = dataset.year_bounds() {
        log::info!(
            "Loaded {} records ({} countries, {} sectors, {first}–{last}) from {}",
            dataset.len(),
            dataset.countries.len(),
            dataset.tech_sectors.len(),
            path.display()
        );
    } else {
        log::warn!("{} contains no records", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Empty cells are `None`; `,` grouping is accepted.
fn parse_number(raw: &str) -> Result<Option<f64>> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("'{raw}' is not a number"))
}

/// Every record carries all four metrics; a gap is rejected here rather than
/// surfacing later as a chart that cannot be drawn.
fn require_metric(metric: Metric, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) => Ok(v),
        None => bail!("empty '{metric}' cell"),
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .with_context(|| format!("'{raw}' is not a valid year"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row before numeric coercion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Tech Sector")]
    tech_sector: String,
    #[serde(rename = "Market Share (%)")]
    market_share: Option<String>,
    #[serde(rename = "R&D Investment (in USD)")]
    rd_investment: Option<String>,
    #[serde(rename = "Number of Patents Filed (Annual)")]
    patents_filed: Option<String>,
    #[serde(rename = "Tech Exports (in USD)")]
    tech_exports: Option<String>,
}

impl CsvRow {
    fn into_record(self) -> Result<Record> {
        let mut metrics = BTreeMap::new();
        let cells = [
            (Metric::MarketShare, self.market_share),
            (Metric::RdInvestment, self.rd_investment),
            (Metric::PatentsFiled, self.patents_filed),
            (Metric::TechExports, self.tech_exports),
        ];
        for (metric, cell) in cells {
            let value = match cell {
                Some(cell) => parse_number(&cell).with_context(|| format!("column '{metric}'"))?,
                None => None,
            };
            metrics.insert(metric, require_metric(metric, value)?);
        }

        Ok(Record {
            country: self.country.trim().to_string(),
            year: parse_year(&self.year)?,
            tech_sector: self.tech_sector.trim().to_string(),
            metrics,
        })
    }
}

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV header")?;
    for metric in Metric::ALL {
        if !headers.iter().any(|h| h.trim() == metric.label()) {
            bail!("CSV is missing the '{metric}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record().with_context(|| format!("CSV row {row_no}"))?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "Country": "China",
///     "Year": 2020,
///     "Tech Sector": "AI",
///     "Market Share (%)": 41.5,
///     "R&D Investment (in USD)": "1,250,000"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| json_to_record(row).with_context(|| format!("Row {i}")))
        .collect()
}

fn json_to_record(row: &JsonValue) -> Result<Record> {
    let obj = row.as_object().context("not a JSON object")?;

    let text = |key: &str| -> Result<String> {
        match obj.get(key) {
            Some(JsonValue::String(s)) => Ok(s.trim().to_string()),
            Some(other) => bail!("'{key}' must be a string, got {other}"),
            None => bail!("missing '{key}'"),
        }
    };

    let year = match obj.get(YEAR) {
        Some(JsonValue::Number(n)) => match n.as_i64().map(i32::try_from) {
            Some(Ok(y)) => y,
            _ => bail!("'{n}' is not a valid year"),
        },
        Some(JsonValue::String(s)) => parse_year(s)?,
        _ => bail!("missing '{YEAR}'"),
    };

    let mut metrics = BTreeMap::new();
    for metric in Metric::ALL {
        let value = match obj.get(metric.label()) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::Number(n)) => n.as_f64(),
            Some(JsonValue::String(s)) => {
                parse_number(s).with_context(|| format!("column '{metric}'"))?
            }
            Some(other) => bail!("'{metric}' must be numeric, got {other}"),
        };
        metrics.insert(metric, require_metric(metric, value)?);
    }

    Ok(Record {
        country: text(COUNTRY)?,
        year,
        tech_sector: text(TECH_SECTOR)?,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Expected schema:
/// - `Country`, `Tech Sector`: Utf8 or LargeUtf8
/// - `Year`: Int32 or Int64
/// - metric columns (by label): Float64, Float32, Int32 or Int64, no nulls
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let country_col = required_column(&batch, COUNTRY)?;
        let year_col = required_column(&batch, YEAR)?;
        let sector_col = required_column(&batch, TECH_SECTOR)?;

        let metric_cols = Metric::ALL
            .into_iter()
            .map(|m| required_column(&batch, m.label()).map(|col| (m, col)))
            .collect::<Result<Vec<(Metric, &ArrayRef)>>>()?;

        for row in 0..batch.num_rows() {
            let year = extract_f64(year_col, row)
                .and_then(|v| v.context("null year"))
                .with_context(|| format!("Row {row}: failed to read '{YEAR}'"))?;
            if year.fract() != 0.0 {
                bail!("Row {row}: '{year}' is not a valid year");
            }

            let mut metrics = BTreeMap::new();
            for (metric, col) in &metric_cols {
                let value = extract_f64(col, row)
                    .and_then(|v| require_metric(*metric, v))
                    .with_context(|| format!("Row {row}: failed to read '{metric}'"))?;
                metrics.insert(*metric, value);
            }

            records.push(Record {
                country: extract_string(country_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{COUNTRY}'"))?,
                year: year as i32,
                tech_sector: extract_string(sector_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{TECH_SECTOR}'"))?,
                metrics,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn required_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).trim().to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).trim().to_string()),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

/// Numeric cell as `f64`; `None` for nulls.
fn extract_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row)
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            arr.value(row) as f64
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            arr.value(row) as f64
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            arr.value(row) as f64
        }
        DataType::Utf8 => return parse_number(col.as_string::<i32>().value(row)),
        other => bail!("Expected numeric column, got {other:?}"),
    };
    Ok(Some(value))
}
