use rand::seq::SliceRandom;
use std::hint::black_box;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cep::{load_csv_path, Cep};
use crate::error::BenchError;
use crate::hash_table::{Keyed, OpenTable, Probe};
use crate::perf::Measurement;

pub const OCCUPANCY_RATES: [f32; 10] = [
    0.10, 0.20, 0.30, 0.40, 0.50, 0.60, 0.70, 0.80, 0.90, 0.99,
];

/// Slot count a growing table starts from in the insertion overhead test.
pub const GROWING_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub capacity: usize,
    pub rates: Vec<f32>,
    pub lookups: usize,
    pub repetitions: usize,
    pub max_records: usize,
    pub shuffle: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            capacity: 6100,
            rates: OCCUPANCY_RATES.to_vec(),
            lookups: 1000,
            repetitions: 1000,
            max_records: 50_000,
            shuffle: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmokeCheck {
    pub found: Option<Cep>,
    pub removed: Option<Cep>,
    pub len_after_remove: usize,
}

/// Inserts three known records, looks one of them up and removes another.
pub fn run_smoke_check() -> Result<SmokeCheck, BenchError> {
    let mut table = OpenTable::new(100, 0.75, Probe::Simple)?;
    table.insert(Cep::new("01310", "São Paulo", "SP"));
    table.insert(Cep::new("20040", "Rio de Janeiro", "RJ"));
    table.insert(Cep::new("30112", "Belo Horizonte", "MG"));

    let found = table.search("01310").cloned();
    match &found {
        Some(cep) => println!("CEP {} encontrado: {}, {}", cep.code, cep.city, cep.state),
        None => tracing::warn!("smoke check could not find 01310"),
    }

    let removed = table.remove("20040");
    if removed.is_none() || table.search("20040").is_some() {
        tracing::warn!("smoke check could not remove 20040");
    }
    // searches step over the tombstone
    if table.search("30112").is_none() {
        tracing::warn!("smoke check lost 30112 after removal");
    }

    Ok(SmokeCheck {
        found,
        removed,
        len_after_remove: table.len(),
    })
}

fn time_searches(table: &OpenTable<Cep>, keys: &[String], repetitions: usize) -> Duration {
    let start = Instant::now();
    for _ in 0..repetitions {
        for key in keys {
            black_box(table.search(black_box(key)));
        }
    }
    start.elapsed()
}

/// Times repeated searches in a simple and a double hashing table filled to
/// each occupancy rate, returning one measurement per strategy and rate.
pub fn run_occupancy_test(
    path: &Path,
    config: &RunConfig,
) -> Result<Vec<Measurement<'static>>, BenchError> {
    let mut measurements = Vec::with_capacity(config.rates.len() * 2);

    println!("Taxa\tHash Simples (s)\tHash Duplo (s)");

    for &rate in &config.rates {
        let target = (config.capacity as f32 * rate) as usize;

        let mut simple = OpenTable::new(config.capacity, 1.0, Probe::Simple)?;
        load_csv_path(path, &mut simple, target)?;

        let mut double = OpenTable::new(config.capacity, 1.0, Probe::Double)?;
        load_csv_path(path, &mut double, target)?;

        let mut keys: Vec<String> = simple
            .iter()
            .take(config.lookups)
            .map(|cep| cep.key().to_string())
            .collect();
        if config.shuffle {
            keys.shuffle(&mut rand::thread_rng());
        }

        if simple.is_empty() {
            tracing::warn!(rate, "no records loaded, timing empty tables");
        }

        tracing::debug!(
            rate,
            target,
            keys = keys.len(),
            simple_len = simple.len(),
            double_len = double.len(),
            simple_load = simple.load_factor(),
            double_load = double.load_factor(),
            "tables filled"
        );

        let time_simple = time_searches(&simple, &keys, config.repetitions);
        let time_double = time_searches(&double, &keys, config.repetitions);

        println!(
            "{:.0}%\t{:.6}\t\t{:.6}",
            rate * 100.0,
            time_simple.as_secs_f64(),
            time_double.as_secs_f64()
        );

        let occupancy = (rate * 100.0).round() as u32;
        measurements.push(Measurement {
            name: Probe::Simple.name(),
            occupancy,
            seconds: time_simple.as_secs_f64(),
        });
        measurements.push(Measurement {
            name: Probe::Double.name(),
            occupancy,
            seconds: time_double.as_secs_f64(),
        });
    }

    Ok(measurements)
}

#[derive(Debug, Clone, Copy)]
pub struct InsertionOverhead {
    pub preallocated_capacity: usize,
    pub preallocated: Duration,
    pub growing: Duration,
}

impl InsertionOverhead {
    /// Extra time spent by the growing table, relative to the preallocated one.
    pub fn overhead_percent(&self) -> f64 {
        let base = self.preallocated.as_secs_f64();
        (self.growing.as_secs_f64() - base) / base * 100.0
    }
}

fn time_load(path: &Path, capacity: usize, max_records: usize) -> Result<Duration, BenchError> {
    let start = Instant::now();
    let mut table = OpenTable::new(capacity, 0.75, Probe::Simple)?;
    let loaded = load_csv_path(path, &mut table, max_records)?;
    drop(table);
    let elapsed = start.elapsed();
    tracing::debug!(capacity, loaded, ?elapsed, "load timed");
    Ok(elapsed)
}

/// Compares loading into a table sized up front against one that starts at
/// [`GROWING_CAPACITY`] slots and resizes on the way.
pub fn run_insertion_overhead(
    path: &Path,
    config: &RunConfig,
) -> Result<InsertionOverhead, BenchError> {
    println!();
    println!("Testando overhead de inserção...");

    let preallocated = time_load(path, config.capacity, config.max_records)?;
    let growing = time_load(path, GROWING_CAPACITY, config.max_records)?;

    let result = InsertionOverhead {
        preallocated_capacity: config.capacity,
        preallocated,
        growing,
    };

    println!(
        "Tempo para inserir {} buckets: {:.6} segundos",
        result.preallocated_capacity,
        preallocated.as_secs_f64()
    );
    println!(
        "Tempo para inserir {} buckets: {:.6} segundos",
        GROWING_CAPACITY,
        growing.as_secs_f64()
    );
    println!("Overhead estrutura dinâmica: {:.2}%", result.overhead_percent());

    Ok(result)
}
