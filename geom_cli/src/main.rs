//! # geom CLI
//!
//! Command-line front-end for `geom_core`: compute shape properties, save
//! them to the record store, browse history and run the arithmetic helpers.
//!
//! Results go to stdout as JSON; logs go to stderr (`RUST_LOG` controls the
//! level, `info` by default). A failure is reported once on stderr, as JSON
//! when it is a `GeomError`. Exit status is 2 for a retryable failure (the
//! store is locked) and 1 otherwise.
//!
//! ```text
//! geom box --length 2 --width 3 --height 4 --material steel --save
//! geom history
//! geom root 27 3
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use geom_core::arithmetic::{fast_power, fast_square, nth_root_newton};
use geom_core::materials::{self, Material};
use geom_core::{GeomError, Parallelepiped, RecordStore, Settings, Shape, Solid, Sphere, Tetrahedron};

/// Volume, surface area and mass calculator for 3D shapes.
#[derive(Parser)]
#[command(name = "geom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Record store file (overrides settings and GEOM_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// JSON settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rectangular box
    #[command(name = "box", alias = "parallelepiped")]
    Parallelepiped {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[command(flatten)]
        common: ShapeArgs,
    },

    /// Regular tetrahedron
    Tetrahedron {
        #[arg(long)]
        edge: f64,
        #[command(flatten)]
        common: ShapeArgs,
    },

    /// Sphere
    Sphere {
        #[arg(long)]
        radius: f64,
        /// Multiply the radius by this factor before computing
        #[arg(long)]
        scale: Option<f64>,
        #[command(flatten)]
        common: ShapeArgs,
    },

    /// List saved calculations, newest first
    History,

    /// Aggregate counts over saved calculations
    Stats,

    /// List the materials reference table
    Materials,

    /// base^exponent by repeated squaring
    Power {
        #[arg(allow_negative_numbers = true)]
        base: f64,
        #[arg(allow_negative_numbers = true)]
        exponent: i64,
    },

    /// Square of an integer by doubling
    Square {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// nth root by Newton's method
    Root {
        #[arg(allow_negative_numbers = true)]
        number: f64,
        n: u32,
        /// Convergence threshold (defaults to the configured precision)
        #[arg(long)]
        precision: Option<f64>,
    },
}

#[derive(Args)]
struct ShapeArgs {
    /// Built-in material name (Steel, Aluminum, Copper)
    #[arg(long)]
    material: Option<String>,

    /// Save the result to the record store
    #[arg(long)]
    save: bool,
}

fn main() -> ExitCode {
    // Logs on stderr so stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::from(exit_status(&err))
        }
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.settings.as_deref()).context("loading settings")?;
    if let Some(store) = cli.store {
        settings.store_path = store;
    }
    run(cli.command, &settings)
}

/// Error JSON for a `GeomError` anywhere in the chain, plain text otherwise.
fn render_error(err: &anyhow::Error) -> String {
    err.downcast_ref::<GeomError>()
        .and_then(|geom_err| serde_json::to_string_pretty(geom_err).ok())
        .unwrap_or_else(|| format!("Error: {err:#}"))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<GeomError>() {
        Some(geom_err) if geom_err.is_recoverable() => 2,
        _ => 1,
    }
}

fn run(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::Parallelepiped { length, width, height, common } => {
            let shape = Parallelepiped::new(length, width, height)?;
            calculate(shape.into(), &common, settings)
        }
        Commands::Tetrahedron { edge, common } => {
            let shape = Tetrahedron::new(edge)?;
            calculate(shape.into(), &common, settings)
        }
        Commands::Sphere { radius, scale, common } => {
            let mut shape = Solid::from(Sphere::new(radius)?);
            if let Some(factor) = scale {
                shape = shape.scaled(factor)?;
            }
            calculate(shape, &common, settings)
        }
        Commands::History => {
            let store = RecordStore::from_settings(settings)?;
            print_json(&store.list_all()?)
        }
        Commands::Stats => {
            let store = RecordStore::from_settings(settings)?;
            print_json(&store.statistics()?)
        }
        Commands::Materials => {
            let store = RecordStore::from_settings(settings)?;
            print_json(&store.materials()?)
        }
        Commands::Power { base, exponent } => print_json(&fast_power(base, exponent)),
        Commands::Square { value } => print_json(&fast_square(value)),
        Commands::Root { number, n, precision } => {
            let precision = precision.unwrap_or(settings.root_precision);
            print_json(&nth_root_newton(number, n, precision)?)
        }
    }
}

fn calculate(mut shape: Solid, args: &ShapeArgs, settings: &Settings) -> anyhow::Result<()> {
    if let Some(material) = resolve_material(args.material.as_deref(), settings)? {
        shape.set_material(Rc::new(material));
    }

    if args.save {
        let store = RecordStore::from_settings(settings)?;
        let record = store
            .save_shape(&shape)
            .with_context(|| format!("saving to {}", store.path().display()))?;
        tracing::info!(id = record.id, "saved {}", shape);
    }

    print_json(&shape.summary())
}

fn resolve_material(name: Option<&str>, settings: &Settings) -> anyhow::Result<Option<Material>> {
    match name {
        Some(name) => Ok(Some(materials::find_builtin(name)?)),
        None => Ok(settings.default_material()?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
