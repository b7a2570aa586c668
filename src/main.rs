use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use mgwgen::config::GeneratorConfig;
use mgwgen::config_loader::{self, ParamOverrides};
use mgwgen::{lgf, pipeline, topology};

/// Mobile gateway pipeline graph generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an MGW pipeline LGF from workload parameters
    Generate {
        /// Path to a YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of users
        #[arg(short = 'u', long)]
        usernum: Option<usize>,

        /// Number of bearers
        #[arg(short = 'b', long)]
        bearernum: Option<usize>,

        /// Number of bearer0 users
        #[arg(short = 'B', long)]
        bearer0user: Option<usize>,

        /// Number of CPUs
        #[arg(short = 'c', long)]
        cpunum: Option<usize>,

        /// CPU capacity
        #[arg(short = 'C', long)]
        cpucapacity: Option<f64>,

        /// Number of CPU failures to cover
        #[arg(short = 'l', long)]
        conflictnum: Option<usize>,

        /// Outfile (LGF)
        #[arg(short, long)]
        outfile: Option<String>,

        /// Do not print LGF to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert a pipeline topology dump (YAML/JSON) into LGF
    Convert {
        /// Topology dump: module name -> { successors: [...] }
        #[arg(short, long)]
        topology: PathBuf,

        /// Outfile (LGF)
        #[arg(short, long)]
        outfile: Option<PathBuf>,

        /// Do not print LGF to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse and validate an LGF file
    Check {
        /// LGF file to check
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Generate {
            config,
            usernum,
            bearernum,
            bearer0user,
            cpunum,
            cpucapacity,
            conflictnum,
            outfile,
            quiet,
        } => {
            let overrides = ParamOverrides {
                user_num: usernum,
                bearer_num: bearernum,
                bearer0_user: bearer0user,
                cpu_num: cpunum,
                cpu_capacity: cpucapacity,
                conflict_num: conflictnum,
                output: outfile,
                quiet,
            };
            run_generate(config, &overrides)
        }
        Commands::Convert { topology, outfile, quiet } => run_convert(&topology, outfile, quiet),
        Commands::Check { file, json } => run_check(&file, json),
    }
}

fn run_generate(config_path: Option<PathBuf>, overrides: &ParamOverrides) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => config_loader::load_config(path)?,
        None => GeneratorConfig::default(),
    };
    config_loader::apply_overrides(&mut config, overrides)?;

    let graph = pipeline::expand(&config.params).wrap_err("Pipeline generation failed")?;
    info!(
        "Generated {} modules, {} arcs, {} flows, {} conflicts",
        graph.modules().len(),
        graph.arcs().len(),
        graph.flows().len(),
        graph.conflicts().len()
    );

    if !config.output.quiet {
        print!("{}", graph.to_lgf());
    }
    if let Some(path) = &config.output.path {
        graph.write_lgf(path)?;
    }
    Ok(())
}

fn run_convert(topology_path: &PathBuf, outfile: Option<PathBuf>, quiet: bool) -> Result<()> {
    let entries = topology::load_topology(topology_path)?;
    let graph = topology::from_topology(&entries).wrap_err("Topology conversion failed")?;

    if !quiet {
        print!("{}", graph.to_lgf());
    }
    if let Some(path) = outfile {
        graph.write_lgf(path)?;
    }
    Ok(())
}

fn run_check(path: &PathBuf, json: bool) -> Result<()> {
    let doc = lgf::parse_lgf_file(path)?;
    lgf::validate_document(&doc).map_err(|e| eyre!("{}: {}", path.display(), e))?;
    let summary = doc.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}: OK", path.display());
    println!("  nodes:        {}", summary.nodes);
    println!("  arcs:         {}", summary.arcs);
    println!("  flows:        {}", summary.flows);
    println!("  conflicts:    {}", summary.conflicts);
    println!("  total weight: {}", summary.total_weight);
    for (key, value) in &summary.attributes {
        println!("  {}: {}", key, value);
    }
    Ok(())
}
