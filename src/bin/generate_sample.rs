use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COUNTRIES: [(&str, f64); 2] = [("China", 1.0), ("Japan", 0.8)];
const SECTORS: [(&str, f64); 5] = [
    ("AI", 1.4),
    ("Semiconductors", 1.2),
    ("Telecommunications", 0.9),
    ("Robotics", 1.0),
    ("Consumer Electronics", 0.7),
];
const YEARS: std::ops::RangeInclusive<i64> = 2000..=2023;

const HEADERS: [&str; 7] = [
    "Country",
    "Year",
    "Tech Sector",
    "Market Share (%)",
    "R&D Investment (in USD)",
    "Number of Patents Filed (Annual)",
    "Tech Exports (in USD)",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    country: &'static str,
    year: i64,
    sector: &'static str,
    share: f64,
    rd: f64,
    patents: f64,
    exports: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (country, country_scale) in COUNTRIES {
        for (sector, sector_scale) in SECTORS {
            for year in YEARS {
                let t = (year - YEARS.start()) as f64;
                // China grows faster over the period; Japan starts higher.
                let growth = if country == "China" { 1.0 + 0.09 * t } else { 1.6 + 0.02 * t };
                let scale = country_scale * sector_scale * growth;
                let noise = rng.gauss(1.0, 0.08).max(0.5);

                rows.push(Row {
                    country,
                    year,
                    sector,
                    share: ((8.0 * scale * noise).min(95.0) * 100.0).round() / 100.0,
                    rd: (2.5e9 * scale * rng.gauss(1.0, 0.1).max(0.5)).round(),
                    patents: (1200.0 * scale * rng.gauss(1.0, 0.12).max(0.4)).round(),
                    exports: (9.0e9 * scale * noise).round(),
                });
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer.write_record(HEADERS).expect("Failed to write header");
    for r in rows {
        writer
            .write_record([
                r.country.to_string(),
                r.year.to_string(),
                r.sector.to_string(),
                r.share.to_string(),
                r.rd.to_string(),
                r.patents.to_string(),
                r.exports.to_string(),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");
}

fn write_parquet(path: &Path, rows: &[Row]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Int64, false),
        Field::new(HEADERS[2], DataType::Utf8, false),
        Field::new(HEADERS[3], DataType::Float64, false),
        Field::new(HEADERS[4], DataType::Float64, false),
        Field::new(HEADERS[5], DataType::Float64, false),
        Field::new(HEADERS[6], DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.country).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.sector).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.share).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.rd).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.patents).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.exports).collect::<Vec<_>>())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tech_sample.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(path, &rows),
        _ => write_csv(path, &rows),
    }

    println!(
        "Wrote {} records ({} countries × {} sectors × {} years) to {}",
        rows.len(),
        COUNTRIES.len(),
        SECTORS.len(),
        YEARS.count(),
        path.display()
    );
}
