use perf_search::RunConfig;
use placeholder_data::{OCCUPANCY_RATES, SEARCH_TIMES_DOUBLE, SEARCH_TIMES_SIMPLE};
use std::error::Error;
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use thousands::Separable;
use tracing_subscriber::EnvFilter;

mod cep;
mod error;
mod hash_table;
mod perf;
mod perf_search;
mod placeholder_data;
mod plot;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "hash-probe-bench",
    about = "Charts search time of simple vs double hashing against table occupancy"
)]
struct Opt {
    /// Chart width in pixels [default: 800]
    #[structopt(long)]
    width: Option<u32>,

    /// Chart height in pixels [default: 400]
    #[structopt(long)]
    height: Option<u32>,

    #[structopt(subcommand)]
    cmd: Option<Command>,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Chart the built-in sample search times
    Plot {
        /// Chart file to write [default: search-time.svg]
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,

        /// Open the chart in the default viewer once written
        #[structopt(long)]
        open: bool,
    },
    /// Load postal codes from a CSV file, time searches and chart the result
    Bench {
        /// CSV file with a header line and CEP,CIDADE,ESTADO rows
        #[structopt(parse(from_os_str))]
        csv: PathBuf,

        /// Chart file to write [default: search-time.svg]
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,

        /// Initial slot count of the measured tables
        #[structopt(long, default_value = "6100")]
        capacity: usize,

        /// Number of keys searched per pass
        #[structopt(long, default_value = "1000")]
        lookups: usize,

        /// Passes over the key set per measurement
        #[structopt(long, default_value = "1000")]
        repetitions: usize,

        /// Records loaded by the insertion overhead test
        #[structopt(long, default_value = "50000")]
        records: usize,

        /// Search keys in random order instead of slot order
        #[structopt(long)]
        shuffle: bool,

        #[structopt(long)]
        open: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = Opt::from_args();
    let size = (
        opt.width.unwrap_or(plot::PLOT_WIDTH),
        opt.height.unwrap_or(plot::PLOT_HEIGHT),
    );

    let cmd = opt.cmd.unwrap_or(Command::Plot {
        output: None,
        open: false,
    });

    match cmd {
        Command::Plot { output, open } => {
            let output = output_path(output);
            let fig = plot::search_time_figure(
                &OCCUPANCY_RATES,
                &SEARCH_TIMES_SIMPLE,
                &SEARCH_TIMES_DOUBLE,
            )?;
            fig.save_svg(&output, size)?;
            present(&output, open)?;
        }
        Command::Bench {
            csv,
            output,
            capacity,
            lookups,
            repetitions,
            records,
            shuffle,
            open,
        } => {
            let config = RunConfig {
                capacity,
                lookups,
                repetitions,
                max_records: records,
                shuffle,
                ..RunConfig::default()
            };
            let output = output_path(output);
            run_bench(&csv, &config, &output, size)?;
            present(&output, open)?;
        }
    }

    Ok(())
}

fn run_bench(
    csv: &Path,
    config: &RunConfig,
    output: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        csv = %csv.display(),
        capacity = %config.capacity.separate_with_commas(),
        repetitions = %config.repetitions.separate_with_commas(),
        "starting benchmark"
    );

    let smoke = perf_search::run_smoke_check()?;
    tracing::info!(
        found = smoke.found.is_some(),
        removed = smoke.removed.is_some(),
        remaining = smoke.len_after_remove,
        "smoke check done"
    );

    let measurements = perf_search::run_occupancy_test(csv, config)?;
    let mut fig = plot::measurements_figure(&measurements)?;
    fig.set_caption(&format!(
        "Busca ({} chaves x {})",
        config.lookups.separate_with_commas(),
        config.repetitions.separate_with_commas()
    ));
    fig.save_svg(output, size)?;

    perf_search::run_insertion_overhead(csv, config)?;
    Ok(())
}

fn output_path(output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(plot::DEFAULT_OUTPUT))
}

fn present(path: &Path, open: bool) -> Result<(), Box<dyn Error>> {
    if open {
        plot::show(path)?;
    } else {
        println!("Chart saved to {}", path.display());
    }
    Ok(())
}
