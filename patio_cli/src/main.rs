//! # Patio Planner CLI
//!
//! Thin command-line caller of `patio_core`: normalizes extents, lists the
//! active catalogs and runs a sample deck through the controller.

mod args;

use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, error, info, LevelFilter};
use serde::Serialize;

use patio_core::controller::status_message;
use patio_core::{
    Dimensions, DisplayUnits, ElementKind, EngineConfig, Intent, PatioError, PatioResult, UnitSystem,
    Vector3,
};

use args::{Args, Command};

/// JSON report for `normalize`
#[derive(Serialize)]
struct NormalizeReport<'a> {
    designation: Option<String>,
    board_feet: Option<f64>,
    warnings: Vec<String>,
    dimensions: &'a Dimensions,
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting patio CLI");
    debug!(args:?; "Parsed arguments");

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", status_message(&e));
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> PatioResult<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match &args.command {
        Command::Normalize {
            width,
            height,
            depth,
            units,
            precision,
        } => {
            let mut display = config.display_units()?;
            if let Some(system) = units {
                display = display.with_system(UnitSystem::from_str(system)?);
            }
            if let Some(precision) = precision {
                display = DisplayUnits::new(display.system(), *precision)?;
            }
            normalize(&config, Vector3::new(*width, *height, *depth)?, display)
        }
        Command::Catalog => print_catalogs(&config),
        Command::Demo => demo(&config),
    }
}

fn normalize(config: &EngineConfig, extent: Vector3, units: DisplayUnits) -> PatioResult<()> {
    let engine = config.engine()?;
    let dimensions = engine.from_extent_in(extent, units)?;

    let report = NormalizeReport {
        designation: dimensions.designation().ok(),
        board_feet: dimensions.board_feet(),
        warnings: dimensions.nominal_errors().into_iter().map(status_message).collect(),
        dimensions: &dimensions,
    };
    print_json(&report)
}

fn print_catalogs(config: &EngineConfig) -> PatioResult<()> {
    let catalogs = config.catalog_set()?;
    for axis in patio_core::Axis::ALL {
        let catalog = catalogs.for_axis(axis);
        println!("{} ({})", catalog.name(), axis);
        for entry in catalog.entries() {
            match entry.nominal_in {
                Some(nominal) => println!("  {:>8}  {:>9.2} mm  (nominal {}\")", entry.label, entry.actual_mm, nominal),
                None => println!("  {:>8}  {:>9.2} mm", entry.label, entry.actual_mm),
            }
        }
        println!();
    }
    Ok(())
}

fn demo(config: &EngineConfig) -> PatioResult<()> {
    let mut controller = config.controller("Demo deck")?;

    // 12' x 8' deck: ledger, two posts, a beam, three joists and one over-long rim
    let plan = [
        ("L-1", ElementKind::Ledger, (0.0, 900.0, 0.0), (38.1, 234.95, 3657.6)),
        ("P-1", ElementKind::Post, (0.0, 0.0, 2400.0), (88.9, 88.9, 900.0)),
        ("P-2", ElementKind::Post, (3600.0, 0.0, 2400.0), (88.9, 88.9, 900.0)),
        ("B-1", ElementKind::Beam, (0.0, 900.0, 2400.0), (76.2, 234.95, 3657.6)),
        ("J-1", ElementKind::Joist, (0.0, 900.0, 0.0), (38.1, 184.15, 2438.4)),
        ("J-2", ElementKind::Joist, (406.4, 900.0, 0.0), (38.1, 184.15, 2438.4)),
        ("J-3", ElementKind::Joist, (812.8, 900.0, 0.0), (38.1, 184.15, 2438.4)),
        ("R-1", ElementKind::Other, (0.0, 900.0, 2438.4), (38.1, 184.15, 7315.2)),
    ];

    for (label, kind, (px, py, pz), (ex, ey, ez)) in plan {
        let intent = Intent::Add {
            position: Vector3::new(px, py, pz)?,
            extent: Vector3::new(ex, ey, ez)?,
            label: label.to_string(),
            kind,
        };
        match controller.apply(intent) {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    println!("{}: {}", label, status_message(warning));
                }
            }
            Err(e) => println!("{}: {}", label, status_message(&e)),
        }
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  ELEMENTS");
    println!("═══════════════════════════════════════");
    for element in controller.patio().list_all() {
        let dims = element.dimensions();
        println!(
            "  #{:<3} {:<4} {:<8} {:<28} {}",
            element.id().to_string(),
            element.label(),
            element.kind().display_name(),
            dims.actual().display(),
            dims.designation().unwrap_or_else(|_| "no stock size".to_string())
        );
    }

    let takeoff = controller.patio().takeoff();
    println!();
    println!("═══════════════════════════════════════");
    println!("  MATERIAL TAKEOFF");
    println!("═══════════════════════════════════════");
    for line in &takeoff.lines {
        println!("  {:>3} x {:<12} {:>7.2} bf", line.count, line.designation, line.board_feet);
    }
    println!("  Total: {:.2} bf", takeoff.total_board_feet);
    if !takeoff.non_stock.is_empty() {
        let ids: Vec<String> = takeoff.non_stock.iter().map(|id| id.to_string()).collect();
        println!("  Needs special order: #{}", ids.join(", #"));
    }

    println!();
    println!("JSON Output:");
    print_json(&takeoff)
}

fn print_json<T: Serialize>(value: &T) -> PatioResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| PatioError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
