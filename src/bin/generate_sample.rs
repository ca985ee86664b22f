use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic salary dataset for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic data-salary dataset")]
struct Args {
    /// Output path; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "sample_salaries.csv")]
    output: PathBuf,

    /// Number of rows
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const YEARS: [i64; 5] = [2020, 2021, 2022, 2023, 2024];
const SENIORITY: [(&str, f64); 4] = [
    ("junior", 0.55),
    ("pleno", 0.8),
    ("senior", 1.0),
    ("executivo", 1.45),
];
const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const SIZES: [&str; 3] = ["pequena", "media", "grande"];
const ROLES: [(&str, f64); 8] = [
    ("Data Scientist", 145_000.0),
    ("Data Engineer", 140_000.0),
    ("Data Analyst", 100_000.0),
    ("Machine Learning Engineer", 165_000.0),
    ("Analytics Engineer", 130_000.0),
    ("Research Scientist", 170_000.0),
    ("Data Architect", 160_000.0),
    ("BI Developer", 95_000.0),
];
const REMOTE: [&str; 3] = ["remoto", "presencial", "hibrido"];
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("CAN", 0.85),
    ("GBR", 0.75),
    ("DEU", 0.72),
    ("BRA", 0.4),
    ("IND", 0.3),
    ("ESP", 0.55),
    ("PRT", 0.5),
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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(serde::Serialize)]
struct Row {
    ano: i64,
    senioridade: &'static str,
    contrato: &'static str,
    tamanho_empresa: &'static str,
    cargo: &'static str,
    usd: f64,
    remoto: &'static str,
    residencia_iso3: &'static str,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Row> {
    (0..rows)
        .map(|_| {
            let ano = *rng.pick(&YEARS);
            let (senioridade, level) = *rng.pick(&SENIORITY);
            let (cargo, base) = *rng.pick(&ROLES);
            let (residencia_iso3, country) = *rng.pick(&COUNTRIES);
            let growth = 1.0 + 0.04 * (ano - 2020) as f64;
            let usd = rng
                .gauss(base * level * country * growth, 15_000.0)
                .max(12_000.0)
                .round();
            Row {
                ano,
                senioridade,
                contrato: *rng.pick(&CONTRACTS),
                tamanho_empresa: *rng.pick(&SIZES),
                cargo,
                usd,
                remoto: *rng.pick(&REMOTE),
                residencia_iso3,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("ano", DataType::Int64, false),
        Field::new("senioridade", DataType::Utf8, false),
        Field::new("contrato", DataType::Utf8, false),
        Field::new("tamanho_empresa", DataType::Utf8, false),
        Field::new("cargo", DataType::Utf8, false),
        Field::new("usd", DataType::Float64, false),
        Field::new("remoto", DataType::Utf8, false),
        Field::new("residencia_iso3", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.ano).collect::<Vec<_>>())),
            text(|r| r.senioridade),
            text(|r| r.contrato),
            text(|r| r.tamanho_empresa),
            text(|r| r.cargo),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.usd).collect::<Vec<_>>())),
            text(|r| r.remoto),
            text(|r| r.residencia_iso3),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let rows = generate(args.rows, &mut rng);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    println!("Wrote {} salary records to {}", rows.len(), args.output.display());
    Ok(())
}
