use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use motor_catalog::config::Config;
use motor_catalog::logging;
use motor_catalog::metrics;
use motor_catalog::pipeline::{build_catalog, discover_documents, BuildOptions, Catalog, VendorTable};

#[derive(Parser)]
#[command(name = "motor_catalog")]
#[command(about = "Normalize vendor thrust-curve files into one motor catalog")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every vendor document and write the catalog
    Build {
        #[command(flatten)]
        run: RunArgs,
        /// Catalog output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the normalization without writing anything
    Check {
        #[command(flatten)]
        run: RunArgs,
    },
    /// List known vendor documents and their manufacturer ids
    Vendors,
    /// Summarize an existing catalog
    Inspect {
        /// Catalog to read (defaults to the configured output)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// List motor names for one manufacturer
        #[arg(long)]
        manufacturer: Option<String>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Directory holding the vendor .rse documents
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Reject records whose fields contradict each other
    #[arg(long)]
    strict: bool,
    /// Process documents in parallel (output order is unchanged)
    #[arg(long)]
    parallel: bool,
    /// Write Prometheus text-format metrics for the run to this file
    #[arg(long)]
    metrics_file: Option<PathBuf>,
}

impl RunArgs {
    fn options(&self, config: &Config) -> BuildOptions {
        BuildOptions {
            strict: self.strict || config.validation.strict,
            parallel: self.parallel || config.pipeline.parallel,
        }
    }

    fn input_dir<'a>(&'a self, config: &'a Config) -> &'a Path {
        self.input_dir.as_deref().unwrap_or(config.paths.input_dir.as_path())
    }
}

fn build(run: &RunArgs, config: &Config, table: &VendorTable) -> anyhow::Result<Catalog> {
    let metrics_handle = match &run.metrics_file {
        Some(_) => Some(metrics::install_recorder().context("failed to install metrics recorder")?),
        None => None,
    };

    let input_dir = run.input_dir(config);
    let result = discover_documents(input_dir)
        .with_context(|| format!("failed to list documents in '{}'", input_dir.display()))
        .and_then(|documents| {
            info!(count = documents.len(), dir = %input_dir.display(), "building catalog");
            let catalog = build_catalog(&documents, table, run.options(config))?;
            println!("Documents: {}", documents.len());
            println!("Motors:    {}", catalog.len());
            Ok(catalog)
        });

    // Metrics are written for failed runs too
    if let (Some(handle), Some(path)) = (metrics_handle, &run.metrics_file) {
        fs::write(path, handle.render())
            .with_context(|| format!("failed to write metrics to '{}'", path.display()))?;
    }
    result
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let table = VendorTable::with_extra(&config.vendors);

    match cli.command {
        Commands::Build { run, output } => {
            let catalog = build(&run, &config, &table)?;
            let output = output.as_deref().unwrap_or(config.paths.output.as_path());
            let digest = catalog
                .write_atomic(output)
                .with_context(|| format!("failed to write catalog to '{}'", output.display()))?;
            println!("Output:    {}", output.display());
            println!("SHA-256:   {}", digest);
        }
        Commands::Check { run } => {
            build(&run, &config, &table)?;
            println!("Check passed; no catalog written");
        }
        Commands::Vendors => {
            for (identity, manufacturer) in table.entries() {
                println!("{:<20} {}", identity, manufacturer);
            }
        }
        Commands::Inspect { catalog, manufacturer } => {
            let path = catalog.as_deref().unwrap_or(config.paths.output.as_path());
            let catalog = Catalog::read(path)
                .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
            match manufacturer {
                Some(mfg) => {
                    for motor in catalog.by_manufacturer(&mfg) {
                        println!("{:<16} {:<8} {:>6} mm  {:>8.1} N", motor.name, motor.motor_type, motor.diameter, motor.avg_thrust);
                    }
                }
                None => {
                    for (mfg, count) in catalog.manufacturer_counts() {
                        println!("{:<12} {}", mfg, count);
                    }
                    println!("{:<12} {}", "total", catalog.len());
                }
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    // Keep the guard alive so file logs are flushed on exit
    let _guard = logging::init_logging(&config.paths.log_dir);

    run(cli, config).inspect_err(|e| error!("{:#}", e))
}
