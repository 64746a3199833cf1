use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use enigh_dashboard::data::catalog;
use parquet::arrow::ArrowWriter;

const VARIABLES: [&str; 8] = [
    "electricidad",
    "gas_lp",
    "gas_natural",
    "lena",
    "carbon",
    "gasolina",
    "petroleo",
    "paneles_solares",
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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

struct Household {
    folio: i64,
    entidad: i64,
    sexo_jefe: i64,
    integrantes: i64,
    ingreso: f64,
    gasto_energia: f64,
}

fn households(rng: &mut SimpleRng, n: usize, first_folio: i64) -> Vec<Household> {
    let regions: Vec<i64> = catalog::codes().collect();
    (0..n)
        .map(|i| {
            let integrantes = rng.range(1, 8);
            let ingreso = (rng.gauss(48_000.0, 18_000.0)).max(3_000.0);
            Household {
                folio: first_folio + i as i64,
                entidad: regions[rng.range(0, regions.len() as i64 - 1) as usize],
                // Code 3 shows up occasionally in the raw survey exports.
                sexo_jefe: if rng.next_f64() < 0.01 { 3 } else { rng.range(1, 2) },
                integrantes,
                ingreso,
                gasto_energia: ingreso * (0.04 + 0.03 * rng.next_f64()),
            }
        })
        .collect()
}

fn write_outputs(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let homes = households(rng, 800, 100_013_601);

    let prep: Vec<Vec<String>> = homes
        .iter()
        .map(|h| {
            let pc1 = (h.ingreso - 48_000.0) / 18_000.0 + rng.gauss(0.0, 0.4);
            let pc2 = (h.integrantes as f64 - 4.0) / 2.0 + rng.gauss(0.0, 0.4);
            vec![
                h.folio.to_string(),
                h.entidad.to_string(),
                h.sexo_jefe.to_string(),
                h.integrantes.to_string(),
                format!("{:.2}", h.ingreso),
                format!("{:.2}", h.gasto_energia),
                format!("{pc1:.6}"),
                format!("{pc2:.6}"),
            ]
        })
        .collect();
    write_csv(
        &dir.join("01_preparacion_pca.csv"),
        &[
            "folioviv",
            "entidad",
            "sexo_jefe",
            "tot_integ",
            "ingreso_real",
            "gasto_real",
            "PC1",
            "PC2",
        ],
        &prep,
    )?;

    let explained = [0.342, 0.187, 0.121, 0.094, 0.071, 0.052];
    let mut acc = 0.0;
    let variance: Vec<Vec<String>> = explained
        .iter()
        .enumerate()
        .map(|(i, v)| {
            acc += v;
            vec![format!("PC{}", i + 1), format!("{v:.3}"), format!("{acc:.3}")]
        })
        .collect();
    write_csv(
        &dir.join("02_varianza_explicada_pca.csv"),
        &["Componente", "Varianza_explicada", "Varianza_acumulada"],
        &variance,
    )?;

    let nodes: Vec<Vec<String>> = VARIABLES
        .iter()
        .map(|v| vec![v.to_string(), rng.range(1, 7).to_string()])
        .collect();
    write_csv(&dir.join("03_red_nodos.csv"), &["variable", "grado"], &nodes)?;

    let mut edges = Vec::new();
    for (i, a) in VARIABLES.iter().enumerate() {
        for b in &VARIABLES[i + 1..] {
            let weight = rng.next_f64();
            if weight > 0.35 {
                edges.push(vec![a.to_string(), b.to_string(), format!("{weight:.4}")]);
            }
        }
    }
    write_csv(&dir.join("03_red_aristas.csv"), &["origen", "destino", "peso"], &edges)?;

    let centrality: Vec<Vec<String>> = VARIABLES
        .iter()
        .map(|v| {
            vec![
                v.to_string(),
                format!("{:.4}", rng.next_f64()),
                format!("{:.4}", rng.next_f64() * 0.5),
                format!("{:.4}", 0.3 + rng.next_f64() * 0.7),
            ]
        })
        .collect();
    write_csv(
        &dir.join("04_centralidad.csv"),
        &["variable", "grado", "intermediacion", "cercania"],
        &centrality,
    )?;

    let master: Vec<Vec<String>> = homes
        .iter()
        .map(|h| {
            vec![
                h.folio.to_string(),
                "1".to_string(),
                h.integrantes.to_string(),
                rng.range(0, (h.integrantes - 1).max(0)).to_string(),
                rng.range(18, 90).to_string(),
                h.sexo_jefe.to_string(),
            ]
        })
        .collect();
    write_csv(
        &dir.join("estructura_familiar_2024.csv"),
        &["folioviv", "foliohog", "tot_integ", "hijos", "edad_jefe", "sexo_jefe"],
        &master,
    )
}

fn write_raw_year(dir: &Path, year: u16, rng: &mut SimpleRng) -> Result<()> {
    let year_dir = dir.join(year.to_string());
    std::fs::create_dir_all(&year_dir)?;
    let homes = households(rng, 300, i64::from(year) * 1_000_000);

    let rows: Vec<Vec<String>> = homes
        .iter()
        .map(|h| {
            vec![
                h.folio.to_string(),
                "1".to_string(),
                h.entidad.to_string(),
                h.sexo_jefe.to_string(),
                h.integrantes.to_string(),
                format!("{:.2}", h.ingreso),
                format!("{:.2}", h.gasto_energia),
                format!("{:.2}", h.gasto_energia * 0.6),
                format!("{:.2}", h.gasto_energia * 0.4),
            ]
        })
        .collect();
    write_csv(
        &year_dir.join("concentradohogar.csv"),
        &[
            "folioviv",
            "foliohog",
            "entidad",
            "sexo_jefe",
            "tot_integ",
            "ing_cor",
            "energia",
            "electricidad",
            "gas",
        ],
        &rows,
    )?;

    write_dwellings_parquet(&year_dir.join("viviendas.parquet"), &homes, rng)
}

fn write_dwellings_parquet(path: &Path, homes: &[Household], rng: &mut SimpleRng) -> Result<()> {
    let folio = Int64Array::from(homes.iter().map(|h| h.folio).collect::<Vec<_>>());
    let rooms = Int64Array::from(homes.iter().map(|_| rng.range(1, 6)).collect::<Vec<_>>());
    let fuel = StringArray::from(
        homes
            .iter()
            .map(|_| VARIABLES[rng.range(0, 3) as usize])
            .collect::<Vec<_>>(),
    );
    let kwh = Float64Array::from(
        homes
            .iter()
            .map(|h| (h.gasto_energia / 3.1).round())
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("folioviv", DataType::Int64, false),
        Field::new("cuart_dorm", DataType::Int64, false),
        Field::new("combustible", DataType::Utf8, false),
        Field::new("consumo_kwh", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(folio),
            Arc::new(rooms),
            Arc::new(fuel),
            Arc::new(kwh),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {} rows to {}", batch.num_rows(), path.display());
    println!("{}", pretty_format_batches(&[batch.slice(0, 3)])?);
    Ok(())
}

fn main() -> Result<()> {
    let base: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_base".to_string())
        .into();
    let mut rng = SimpleRng::new(42);

    write_outputs(&base.join("outputs"), &mut rng)?;
    for year in [2022, 2024] {
        write_raw_year(&base.join("ENIGH"), year, &mut rng)?;
    }

    println!(
        "Sample base directory ready; run with ENIGH_DASHBOARD_BASE={}",
        base.display()
    );
    Ok(())
}
