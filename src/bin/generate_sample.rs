use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use venture_dashboard::data::model::Record;

const INDUSTRIES: [&str; 14] = [
    "software",
    "biotech",
    "enterprise",
    "mobile",
    "ecommerce",
    "advertising",
    "games_video",
    "cleantech",
    "hardware",
    "health",
    "education",
    "social",
    "finance",
    "consulting",
];

/// (country code, weight)
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 0.55),
    ("GBR", 0.09),
    ("CAN", 0.07),
    ("DEU", 0.06),
    ("FRA", 0.06),
    ("IND", 0.07),
    ("ISR", 0.05),
    ("CHN", 0.05),
];

/// Snapshot year used to compute the age of surviving startups.
const SNAPSHOT_YEAR: i32 = 2015;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn pick_weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for &(item, weight) in items {
            if roll < weight {
                return item;
            }
            roll -= weight;
        }
        items[items.len() - 1].0
    }
}

fn generate_record(i: usize, rng: &mut SimpleRng) -> Record {
    // Formation grows roughly quadratically towards the snapshot.
    let founded_year = 1990 + (rng.next_f64().sqrt() * 25.0).floor().min(24.0) as i32;
    let industry = rng.pick(&INDUSTRIES);
    let country_code = rng.pick_weighted(&COUNTRIES);

    // Consumer-facing sectors fail more often.
    let risk = match industry {
        "advertising" | "social" | "games_video" | "ecommerce" => 0.32,
        "biotech" | "enterprise" => 0.12,
        _ => 0.2,
    };
    let roll = rng.next_f64();
    let status = if roll < risk {
        "closed"
    } else if roll < risk + 0.03 {
        "ipo"
    } else if roll < risk + 0.16 {
        "acquired"
    } else {
        "operating"
    };
    let failed = status == "closed";

    let funding_total_usd = if rng.next_f64() < 0.12 {
        None
    } else if rng.next_f64() < 0.03 {
        Some(0.0)
    } else {
        let bump = match status {
            "ipo" => 2.0,
            "acquired" => 0.8,
            "closed" => -0.5,
            _ => 0.0,
        };
        Some(rng.gauss(15.0 + bump, 1.8).exp().round())
    };

    let max_age = (SNAPSHOT_YEAR - founded_year) as f64;
    let startup_age_years = if failed {
        Some((rng.next_f64() * max_age).max(0.5).min(max_age.max(0.5)))
    } else {
        Some(max_age + rng.next_f64())
    };

    Record {
        name: format!("Startup {i:05}"),
        primary_category: industry.to_string(),
        country_code: country_code.to_string(),
        founded_year,
        funding_total_usd,
        startup_age_years: startup_age_years.map(|a| (a * 10.0).round() / 10.0),
        failed,
        status: status.to_string(),
    }
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("primary_category", DataType::Utf8, false),
        Field::new("country_code", DataType::Utf8, false),
        Field::new("founded_year", DataType::Int64, false),
        Field::new("funding_total_usd", DataType::Float64, true),
        Field::new("startup_age_years", DataType::Float64, true),
        Field::new("failed", DataType::Int64, false),
        Field::new("status", DataType::Utf8, false),
    ]));

    let strings = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<ArrayRef> = vec![
        strings(|r| r.name.as_str()),
        strings(|r| r.primary_category.as_str()),
        strings(|r| r.country_code.as_str()),
        Arc::new(Int64Array::from_iter_values(
            records.iter().map(|r| r.founded_year as i64),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.funding_total_usd).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.startup_age_years).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from_iter_values(
            records.iter().map(|r| r.failed as i64),
        )),
        strings(|r| r.status.as_str()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "clean_startup_data.csv".to_string()),
    );
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 5000,
    };

    let mut rng = SimpleRng::new(42);
    let records: Vec<Record> = (0..rows).map(|i| generate_record(i, &mut rng)).collect();

    let is_parquet = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output, &records)?;
    } else {
        write_csv(&output, &records)?;
    }

    log::info!("Wrote {} startups to {}", records.len(), output.display());
    println!("Wrote {} startups to {}", records.len(), output.display());
    Ok(())
}
