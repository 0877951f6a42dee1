use clap::{Parser, Subcommand, ValueEnum};
use crystgeom::config::Config;
use crystgeom::utils::{logger, report};
use crystgeom::{io, CoordSystem, PeriodicNeighborFinder, PeriodicTable, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "crystgeom")]
#[command(about = "Crystal structure geometry: conversions, supercells and neighbor shells")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: the per-user settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Direct,
    Cartesian,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a structure: lattice constants, volume, density
    Info { input: PathBuf },
    /// Replicate the cell along a, b and c
    Supercell {
        input: PathBuf,
        #[arg(short, long, required = true, num_args = 3, value_names = ["P", "Q", "R"])]
        multipliers: Vec<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Displace one atom (0-based global index)
    Permute {
        input: PathBuf,
        #[arg(short, long)]
        atom: usize,
        #[arg(
            long,
            required = true,
            num_args = 3,
            allow_negative_numbers = true,
            value_names = ["DX", "DY", "DZ"]
        )]
        by: Vec<f64>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Switch the coordinate system of the stored positions
    Convert {
        input: PathBuf,
        #[arg(long, value_enum)]
        to: Target,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List every periodic image within the cutoff
    Neighbors {
        input: PathBuf,
        #[arg(short, long)]
        atom: usize,
        #[arg(short, long)]
        cutoff: Option<f64>,
    },
    /// Print the active settings, optionally writing them to the per-user settings file
    Config {
        #[arg(long)]
        save: bool,
    },
    /// Show one neighbor shell (1 = nearest)
    Shell {
        input: PathBuf,
        #[arg(short, long)]
        atom: usize,
        #[arg(short, long, default_value_t = 1)]
        shell: usize,
        #[arg(short, long)]
        cutoff: Option<f64>,
        #[arg(short, long)]
        tol: Option<f64>,
    },
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| crystgeom::CrystalError::Validation(format!("JSON output: {}", e)))
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let table = PeriodicTable::global();

    match cli.command {
        Commands::Info { input } => {
            let s = io::load_structure(&input)?;
            if cli.json {
                println!("{}", to_json(&s.lattice_constants())?);
            } else {
                print!("{}", report::structure_summary(&s, &input.display().to_string(), table));
            }
        }
        Commands::Supercell {
            input,
            multipliers,
            output,
        } => {
            let mut s = io::load_structure(&input)?;
            s.supercell_in_place([multipliers[0], multipliers[1], multipliers[2]])?;
            io::save_structure(&output, &s)?;
        }
        Commands::Permute {
            input,
            atom,
            by,
            output,
        } => {
            let mut s = io::load_structure(&input)?;
            s.permute_atom_in_place(atom, [by[0], by[1], by[2]])?;
            io::save_structure(&output, &s)?;
        }
        Commands::Convert { input, to, output } => {
            let mut s = io::load_structure(&input)?;
            s.convert_to(match to {
                Target::Direct => CoordSystem::Direct,
                Target::Cartesian => CoordSystem::Cartesian,
            })?;
            io::save_structure(&output, &s)?;
        }
        Commands::Neighbors {
            input,
            atom,
            cutoff,
        } => {
            let cutoff = cutoff.unwrap_or(config.neighbors.cutoff);
            let finder = PeriodicNeighborFinder::new(io::load_structure(&input)?)?;
            let neighbors = finder.neighbors(atom, cutoff)?;
            if cli.json {
                println!("{}", to_json(&neighbors)?);
            } else {
                print!("{}", report::neighbor_table(finder.structure(), &neighbors));
            }
        }
        Commands::Config { save } => {
            println!("{}", to_json(&config)?);
            if save {
                let path = config.save()?;
                println!("Saved to {}", path.display());
            }
        }
        Commands::Shell {
            input,
            atom,
            shell,
            cutoff,
            tol,
        } => {
            let cutoff = cutoff.unwrap_or(config.neighbors.cutoff);
            let tol = tol.unwrap_or(config.neighbors.tol);
            let finder = PeriodicNeighborFinder::new(io::load_structure(&input)?)?;
            let members = finder.neighbors_shell(atom, shell, cutoff, tol)?;
            if let Some(first) = members.first() {
                info!(
                    "Shell {} of atom {}: {} neighbors at {:.5} Å",
                    shell,
                    atom,
                    members.len(),
                    first.distance
                );
            }
            if cli.json {
                println!("{}", to_json(&members)?);
            } else {
                print!("{}", report::neighbor_table(finder.structure(), &members));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_msg) = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load(),
    };

    // Initialize logging
    logger::init(&config.log_level, cli.verbose);
    debug!("{}", config_msg);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
